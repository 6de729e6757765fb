use treeweave::parser::{LineParser, ParsingErrorType};

// --- TESTS RECORD SHAPES ---
#[test]
fn test_internal_node() {
    let record = LineParser::new().parse_line("1 2 3 root", 1).unwrap();
    assert_eq!(record.id, 1);
    assert_eq!(record.left, Some(2));
    assert_eq!(record.right, Some(3));
    assert_eq!(record.label.as_deref(), Some("root"));
}

#[test]
fn test_leaf_with_multi_word_label() {
    let record = LineParser::new().parse_line("7 the quick  fox", 1).unwrap();
    assert_eq!(record.id, 7);
    assert_eq!(record.left, None);
    assert_eq!(record.right, None);
    assert_eq!(record.label.as_deref(), Some("the quick  fox"));
}

#[test]
fn test_missing_label_is_empty_not_absent() {
    let record = LineParser::new().parse_line("1 2 3", 1).unwrap();
    assert_eq!(record.label.as_deref(), Some(""));
    assert!(!record.is_placeholder());

    let record = LineParser::new().parse_line("4", 1).unwrap();
    assert_eq!(record.label.as_deref(), Some(""));
}

#[test]
fn test_third_integer_starts_label() {
    let record = LineParser::new().parse_line("1 2 3 4 five", 1).unwrap();
    assert_eq!((record.left, record.right), (Some(2), Some(3)));
    assert_eq!(record.label.as_deref(), Some("4 five"));
}

#[test]
fn test_negative_ids_and_extra_spaces() {
    let record = LineParser::new().parse_line("  -1   -2 3  x", 1).unwrap();
    assert_eq!(record.id, -1);
    assert_eq!((record.left, record.right), (Some(-2), Some(3)));
    assert_eq!(record.label.as_deref(), Some("x"));
}

// --- TESTS COMPLETE-TREE FOLDING ---
#[test]
fn test_lone_child_folded_into_label() {
    let record = LineParser::new().parse_line("5 9 hello world", 1).unwrap();
    assert_eq!(record.id, 5);
    assert_eq!(record.left, None);
    assert_eq!(record.right, None);
    assert_eq!(record.label.as_deref(), Some("9 hello world"));
}

#[test]
fn test_lone_child_kept_in_incomplete_mode() {
    let parser = LineParser::new().with_complete_tree(false);
    let record = parser.parse_line("5 9 hello world", 1).unwrap();
    assert_eq!(record.id, 5);
    assert_eq!(record.left, Some(9));
    assert_eq!(record.right, None);
    assert_eq!(record.label.as_deref(), Some("hello world"));
}

#[test]
fn test_lone_child_without_label_is_kept() {
    let record = LineParser::new().parse_line("5 9", 1).unwrap();
    assert_eq!(record.left, Some(9));
    assert_eq!(record.label.as_deref(), Some(""));
}

#[test]
fn test_folded_token_kept_verbatim() {
    let record = LineParser::new().parse_line("5 +09 x", 1).unwrap();
    assert_eq!(record.left, None);
    assert_eq!(record.label.as_deref(), Some("+09 x"));
}

// --- TESTS ERRORS ---
#[test]
fn test_invalid_node_id() {
    let err = LineParser::new().parse_line("x 1 2 label", 3).unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::InvalidNodeId);
    assert_eq!(err.line(), 3);
    assert_eq!(err.context(), "x 1 2 label");
}

#[test]
fn test_blank_line() {
    let err = LineParser::new().parse_line("    ", 2).unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::EmptyLine);
}

#[test]
fn test_line_too_long() {
    let parser = LineParser::new();
    let long = format!("1 {}", "a".repeat(1022));
    assert_eq!(long.len(), 1024);
    let err = parser.parse_line(&long, 1).unwrap_err();
    assert_eq!(
        err.kind(),
        &ParsingErrorType::LineTooLong {
            len: 1024,
            max: 1024
        }
    );

    let fits = format!("1 {}", "a".repeat(1021));
    assert!(parser.parse_line(&fits, 1).is_ok());
}

#[test]
fn test_custom_line_limit() {
    let parser = LineParser::new().with_max_line_len(8);
    assert!(parser.parse_line("1 2 3 ab", 1).is_err());
    assert!(parser.parse_line("1 2 3 a", 1).is_ok());
}
