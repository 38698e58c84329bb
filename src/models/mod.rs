//! Data models for the Ripple engine

pub mod change_set;
pub mod config;
pub mod graph;
pub mod module;
pub mod operation;
pub mod report;

pub use change_set::{ChangeSet, TextEdit};
pub use config::{OutputFormat, PartialSettings, Settings};
pub use graph::{DependencyGraph, EdgeRef, GraphSummary, ImportEdge, ImportedName};
pub use module::{Module, ModuleId, SourceSpan, SymbolDef, SymbolKind};
pub use operation::RefactorOperation;
pub use report::{
    AnalysisReport, Diagnostic, DiagnosticKind, ImpactMetrics, RiskAssessment, RiskLevel,
};
