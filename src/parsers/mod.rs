//! Source parsing and graph construction

pub mod extractor;
pub mod graph_builder;
pub mod occurrences;
pub mod source_parser;

pub use graph_builder::{BuildOutcome, GraphBuilder};
pub use source_parser::{LineIndex, ParsedFile, RawImport, SourceParser};
