//! Analysis result structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::change_set::ChangeSet;
use super::graph::GraphSummary;
use super::operation::RefactorOperation;

/// Impact metrics derived for one `(graph, operation)` pair.
///
/// Recomputed per analysis request, never cached across requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactMetrics {
    /// Modules that transitively depend on the operation target
    pub affected_module_count: usize,
    /// Import statements across those dependents that reference the target
    pub import_statement_count: usize,
    /// Import cycles containing the target module
    pub cycle_count: usize,
    /// Length of the longest cycle containing the target (modules per lap)
    pub max_cycle_length: usize,
}

/// Coarse classification of how disruptive an operation is likely to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Raise the tier by one level; High stays High.
    pub fn bump(self) -> RiskLevel {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium => RiskLevel::High,
            RiskLevel::High => RiskLevel::High,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Advisory risk classification for one operation.
///
/// Purely informational; it never blocks the preview engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub metrics: ImpactMetrics,
    pub warnings: Vec<String>,
}

/// Kind of per-file problem surfaced in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// File could not be parsed and was skipped
    ParseFailure,
    /// An import specifier could not be mapped to a project module
    UnresolvedImport,
    /// Directory traversal problem (permissions, broken link)
    ScanError,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::ParseFailure => write!(f, "parse failure"),
            DiagnosticKind::UnresolvedImport => write!(f, "unresolved import"),
            DiagnosticKind::ScanError => write!(f, "scan error"),
        }
    }
}

/// A per-file problem recorded during analysis.
///
/// The report must always state which files could not be analyzed and
/// why, rather than silently omitting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub path: PathBuf,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Aggregate result of one orchestrated analysis run.
///
/// Owned solely by the caller of the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub project_root: PathBuf,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub operation: RefactorOperation,
    pub graph: GraphSummary,
    pub diagnostics: Vec<Diagnostic>,
    /// Import cycles as closed walks of module names (first == last)
    pub cycles: Vec<Vec<String>>,
    pub risk: RiskAssessment,
    /// Exact edits, when preview succeeded
    pub changes: Option<ChangeSet>,
    /// Why preview failed, when it did; risk and cycle data are still valid
    pub preview_error: Option<String>,
    /// Wall-clock duration of the whole run in milliseconds
    pub duration_ms: u64,
}

impl AnalysisReport {
    pub fn has_preview(&self) -> bool {
        self.changes.is_some()
    }

    /// Files skipped because they could not be parsed
    pub fn unanalyzed_files(&self) -> Vec<&PathBuf> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::ParseFailure)
            .map(|d| &d.path)
            .collect()
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_ms = duration.as_millis() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering_and_bump() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert_eq!(RiskLevel::Low.bump(), RiskLevel::Medium);
        assert_eq!(RiskLevel::Medium.bump(), RiskLevel::High);
        assert_eq!(RiskLevel::High.bump(), RiskLevel::High);
    }

    #[test]
    fn test_unanalyzed_files() {
        let report = AnalysisReport {
            project_root: PathBuf::from("/p"),
            generated_at: chrono::Utc::now(),
            operation: RefactorOperation::Move {
                module: "a".to_string(),
                new_location: "b".to_string(),
            },
            graph: crate::models::graph::GraphSummary {
                module_count: 0,
                edge_count: 0,
                resolved_edge_count: 0,
                unresolved_import_count: 0,
            },
            diagnostics: vec![
                Diagnostic::new(DiagnosticKind::ParseFailure, "/p/bad.js", "syntax error"),
                Diagnostic::new(DiagnosticKind::UnresolvedImport, "/p/a.js", "lodash"),
            ],
            cycles: Vec::new(),
            risk: RiskAssessment {
                level: RiskLevel::Low,
                metrics: ImpactMetrics::default(),
                warnings: Vec::new(),
            },
            changes: None,
            preview_error: None,
            duration_ms: 0,
        };

        let skipped = report.unanalyzed_files();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0], &PathBuf::from("/p/bad.js"));
        assert!(!report.has_preview());
    }
}
