#![feature(error_generic_member_access)]
//! Ripple - refactoring-impact analysis for JavaScript/TypeScript projects
//!
//! This library builds a whole-project import graph and answers what a
//! proposed structural change (rename, move, split) would affect: the
//! dependent files, the import cycles it touches, a risk tier, and the
//! exact line-level edits - all without mutating any file.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use error::{handle_error, ErrorSeverity, OptionExt, Result, ResultExt, RippleError};
pub use models::{
    AnalysisReport, ChangeSet, DependencyGraph, ImpactMetrics, RefactorOperation, RiskAssessment,
    RiskLevel, Settings, TextEdit,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
