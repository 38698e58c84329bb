//! Report rendering and graph export

pub mod formatters;
pub mod graph_export;
pub mod progress;
pub mod writers;

pub use formatters::{format_report_json, format_report_text};
pub use graph_export::{EdgeExport, GraphExport, NodeExport};
pub use progress::ProgressReporter;
pub use writers::write_output;
