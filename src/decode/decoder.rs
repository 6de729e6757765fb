//! Driver connecting input, line parser and resolver.

use crate::decode::config::DecodeConfig;
use crate::model::{DecodedTree, DecodedTreeBuilder, TreeBuilder};
use crate::parser::{ParsingError, check_file};
use crate::resolver::{MemoryStats, ResolveError, Resolver};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

// =#========================================================================#=
// DECODE ERROR
// =#========================================================================$=
/// Failure of a whole decode.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Input could not be read (file check or IO)
    #[error(transparent)]
    Input(#[from] ParsingError),

    /// Records could not be linked into one tree
    #[error("{}{}", at_line(.line), .source)]
    Resolve {
        /// Line of the record that failed, `None` if failing at end of input
        line: Option<usize>,
        source: ResolveError,
    },
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|l| format!("line {l}: ")).unwrap_or_default()
}

impl From<ResolveError> for DecodeError {
    fn from(source: ResolveError) -> Self {
        DecodeError::Resolve { line: None, source }
    }
}

impl DecodeError {
    /// Returns the resolution error, if this is one.
    pub fn resolve_error(&self) -> Option<&ResolveError> {
        match self {
            DecodeError::Resolve { source, .. } => Some(source),
            DecodeError::Input(_) => None,
        }
    }
}

/// Counters of the last decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Physical lines read, empty ones included
    pub lines_read: usize,
    /// Lines skipped because they could not be parsed
    pub lines_skipped: usize,
    /// Records handed to the resolver successfully
    pub records_ingested: usize,
    /// Node allocation counters of the resolver
    pub memory: MemoryStats,
}

// =#========================================================================#=
// DECODER
// =#========================================================================#=
/// Decodes line-based node descriptions into a [DecodedTree].
///
/// Each decode runs a fresh [Resolver]; a decoder can be reused and keeps
/// the [DecodeStats] of its last decode.
///
/// # Example
/// ```
/// use treeweave::decode::{DecodeConfig, Decoder};
///
/// let mut decoder = Decoder::new(DecodeConfig::new());
/// let tree = decoder.decode_str("2 left\n1 2 3 root\n3 right\n").unwrap();
/// assert_eq!(tree.in_order_labels(), "left root right ");
/// assert_eq!(decoder.stats().records_ingested, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecodeConfig,
    stats: DecodeStats,
}

impl Decoder {
    /// Creates a decoder with the given configuration.
    pub fn new(config: DecodeConfig) -> Self {
        Self {
            config,
            stats: DecodeStats::default(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Returns the counters of the last decode.
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// Checks and decodes a file.
    ///
    /// # Errors
    /// * [DecodeError::Input] if the file is not accessible, too large or
    ///   cannot be read
    /// * [DecodeError::Resolve] if the records do not form one tree
    pub fn decode_file<P: AsRef<Path>>(&mut self, path: P) -> Result<DecodedTree, DecodeError> {
        let path = path.as_ref();
        check_file(path, self.config.max_file_size)?;
        let file = File::open(path).map_err(ParsingError::from)?;
        self.decode_reader(BufReader::new(file))
    }

    /// Decodes an in-memory string.
    pub fn decode_str(&mut self, input: &str) -> Result<DecodedTree, DecodeError> {
        self.decode_reader(input.as_bytes())
    }

    /// Decodes everything readable from `reader`.
    pub fn decode_reader<R: BufRead>(&mut self, reader: R) -> Result<DecodedTree, DecodeError> {
        self.decode_reader_with(reader, &mut DecodedTreeBuilder::new())
    }

    /// Decodes everything readable from `reader`, handing the resolved nodes
    /// to a custom [TreeBuilder].
    pub fn decode_reader_with<R: BufRead, B: TreeBuilder>(
        &mut self,
        mut reader: R,
        builder: &mut B,
    ) -> Result<B::Tree, DecodeError> {
        self.stats = DecodeStats::default();
        let parser = self.config.line_parser();
        let mut resolver = Resolver::with_config(self.config.resolver_config());
        let mut buffer = Vec::new();

        let result = loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) => break resolver.finalize_with(builder).map_err(DecodeError::from),
                Ok(_) => {}
                Err(e) => break Err(DecodeError::Input(ParsingError::from(e))),
            }
            self.stats.lines_read += 1;
            let line_number = self.stats.lines_read;

            let line = trim_line_end(&buffer);
            if line.is_empty() {
                continue;
            }

            let record = match parser.parse_bytes(line, line_number) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Skipping line {}: {}", line_number, e.kind());
                    self.stats.lines_skipped += 1;
                    continue;
                }
            };

            if let Err(source) = resolver.ingest(record) {
                break Err(DecodeError::Resolve {
                    line: Some(line_number),
                    source,
                });
            }
        };

        resolver.dispose();
        self.stats.records_ingested = resolver.records_ingested();
        self.stats.memory = resolver.memory_stats();
        tracing::info!(
            "Decode finished: {} lines read, {} skipped, {} records, {} nodes allocated",
            self.stats.lines_read,
            self.stats.lines_skipped,
            self.stats.records_ingested,
            self.stats.memory.allocated
        );
        result
    }
}

/// Strips a trailing `\n` and `\r`.
fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_line_end() {
        assert_eq!(trim_line_end(b"1 a\r\n"), b"1 a");
        assert_eq!(trim_line_end(b"1 a\n"), b"1 a");
        assert_eq!(trim_line_end(b"1 a"), b"1 a");
        assert_eq!(trim_line_end(b"\n"), b"");
    }

    #[test]
    fn test_stats_count_physical_lines() {
        let mut decoder = Decoder::new(DecodeConfig::new());
        let tree = decoder
            .decode_str("1 2 3 root\n\nfoo\n2 left\r\n3 right")
            .unwrap();
        assert_eq!(tree.num_vertices(), 3);

        let stats = decoder.stats();
        assert_eq!(stats.lines_read, 5);
        assert_eq!(stats.lines_skipped, 1);
        assert_eq!(stats.records_ingested, 3);
        assert!(stats.memory.is_balanced());
    }

    #[test]
    fn test_resolve_error_carries_line() {
        let mut decoder = Decoder::new(DecodeConfig::new());
        let err = decoder
            .decode_str("1 2 3 root\n2 a\n3 b\n2 c\n")
            .unwrap_err();
        match err {
            DecodeError::Resolve { line, .. } => assert_eq!(line, Some(4)),
            other => panic!("Unexpected error {other}"),
        }
        assert!(decoder.stats().memory.is_balanced());
    }
}
