//! Pre-flight check of input files.

use crate::parser::parsing_error::ParsingError;
use std::fs;
use std::path::Path;

/// Default maximum input file size: 100 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Checks that `path` is a readable regular file of at most `max_size` bytes.
///
/// # Returns
/// The file size in bytes.
///
/// # Errors
/// * [NotAccessible](crate::parser::ParsingErrorType::NotAccessible) if the
///   path cannot be stat-ed or is not a regular file
/// * [InputTooLarge](crate::parser::ParsingErrorType::InputTooLarge) if the
///   file exceeds `max_size`
pub fn check_file<P: AsRef<Path>>(path: P, max_size: u64) -> Result<u64, ParsingError> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)
        .map_err(|e| ParsingError::not_accessible(format!("{}: {}", path.display(), e)))?;

    if !metadata.is_file() {
        return Err(ParsingError::not_accessible(format!(
            "{}: not a regular file",
            path.display()
        )));
    }

    let size = metadata.len();
    if size > max_size {
        return Err(ParsingError::input_too_large(size, max_size));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsingErrorType;
    use std::io::Write;

    #[test]
    fn test_regular_file_within_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"1 root\n").unwrap();
        assert_eq!(check_file(file.path(), DEFAULT_MAX_FILE_SIZE).unwrap(), 7);
    }

    #[test]
    fn test_file_too_large() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"1 2 3 root\n").unwrap();
        let err = check_file(file.path(), 4).unwrap_err();
        assert_eq!(
            err.kind(),
            &ParsingErrorType::InputTooLarge { size: 11, max: 4 }
        );
    }

    #[test]
    fn test_directory_and_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_file(dir.path(), DEFAULT_MAX_FILE_SIZE).unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::NotAccessible(_)));

        let missing = dir.path().join("missing.txt");
        let err = check_file(&missing, DEFAULT_MAX_FILE_SIZE).unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::NotAccessible(_)));
    }
}
