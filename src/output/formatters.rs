//! Output formatting functionality
//!
//! This module renders an `AnalysisReport` for humans (text) and
//! machines (JSON). Formatting is a thin wrapper; all content comes
//! from the report itself.

use crate::error::Result;
use crate::models::report::{AnalysisReport, RiskLevel};
use ansi_term::Colour::{Blue, Cyan, Green, Red, Yellow};
use ansi_term::Style;

/// Format a full report as human-readable text
pub fn format_report_text(report: &AnalysisReport, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();

    // Header
    let title = format!("Refactor analysis: {}", report.operation.describe());
    if use_colors {
        output.push_str(&format!("{}\n", Blue.bold().paint(&title)));
    } else {
        output.push_str(&format!("{}\n", title));
    }
    output.push_str(&format!(
        "Project: {} ({} modules, {} imports, {} unresolved)\n\n",
        report.project_root.display(),
        report.graph.module_count,
        report.graph.edge_count,
        report.graph.unresolved_import_count
    ));

    // Risk tier and warnings
    let level_text = report.risk.level.to_string().to_uppercase();
    let level_painted = if use_colors {
        match report.risk.level {
            RiskLevel::Low => Green.bold().paint(level_text).to_string(),
            RiskLevel::Medium => Yellow.bold().paint(level_text).to_string(),
            RiskLevel::High => Red.bold().paint(level_text).to_string(),
        }
    } else {
        level_text
    };
    output.push_str(&format!("Risk: {}\n", level_painted));
    for warning in &report.risk.warnings {
        output.push_str(&format!("  ! {}\n", warning));
    }

    let metrics = &report.risk.metrics;
    output.push_str(&format!(
        "  Affected modules: {}\n  Import statements: {}\n",
        metrics.affected_module_count, metrics.import_statement_count
    ));
    if metrics.cycle_count > 0 {
        output.push_str(&format!(
            "  Cycles through target: {} (longest {})\n",
            metrics.cycle_count, metrics.max_cycle_length
        ));
    }
    output.push('\n');

    // Project-wide cycles
    if !report.cycles.is_empty() {
        let heading = format!("Import cycles ({})", report.cycles.len());
        if use_colors {
            output.push_str(&format!("{}\n", Cyan.bold().paint(&heading)));
        } else {
            output.push_str(&format!("{}\n", heading));
        }
        for cycle in &report.cycles {
            output.push_str(&format!("  {}\n", cycle.join(" -> ")));
        }
        output.push('\n');
    }

    // Planned edits
    match (&report.changes, &report.preview_error) {
        (Some(changes), _) => {
            let heading = format!(
                "Planned edits ({} in {} file(s))",
                changes.edit_count(),
                changes.file_count()
            );
            if use_colors {
                output.push_str(&format!("{}\n", Cyan.bold().paint(&heading)));
            } else {
                output.push_str(&format!("{}\n", heading));
            }
            for (file, edits) in changes.iter() {
                if use_colors {
                    output.push_str(&format!(
                        "  {}\n",
                        Style::new().dimmed().paint(file.display().to_string())
                    ));
                } else {
                    output.push_str(&format!("  {}\n", file.display()));
                }
                for edit in edits {
                    let (start, end) = edit.line_range;
                    let lines = if start == end {
                        format!("line {}", start)
                    } else {
                        format!("lines {}-{}", start, end)
                    };
                    output.push_str(&format!("    {}\n", lines));
                    for old_line in edit.old_text.lines() {
                        let text = format!("      - {}", old_line);
                        if use_colors {
                            output.push_str(&format!("{}\n", Red.paint(&text)));
                        } else {
                            output.push_str(&format!("{}\n", text));
                        }
                    }
                    for new_line in edit.new_text.lines() {
                        let text = format!("      + {}", new_line);
                        if use_colors {
                            output.push_str(&format!("{}\n", Green.paint(&text)));
                        } else {
                            output.push_str(&format!("{}\n", text));
                        }
                    }
                }
            }
            output.push('\n');
        }
        (None, Some(error)) => {
            let text = format!("Preview unavailable: {}", error);
            if use_colors {
                output.push_str(&format!("{}\n\n", Yellow.paint(&text)));
            } else {
                output.push_str(&format!("{}\n\n", text));
            }
        }
        (None, None) => {}
    }

    // Files that could not be analyzed are always listed explicitly
    if !report.diagnostics.is_empty() {
        let heading = format!("Diagnostics ({})", report.diagnostics.len());
        if use_colors {
            output.push_str(&format!("{}\n", Cyan.bold().paint(&heading)));
        } else {
            output.push_str(&format!("{}\n", heading));
        }
        for diagnostic in &report.diagnostics {
            output.push_str(&format!(
                "  [{}] {}: {}\n",
                diagnostic.kind,
                diagnostic.path.display(),
                diagnostic.message
            ));
        }
        output.push('\n');
    }

    if verbose {
        output.push_str(&format!(
            "Completed in {} ms at {}\n",
            report.duration_ms,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    output
}

/// Format a full report as pretty-printed JSON
pub fn format_report_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::change_set::{ChangeSet, TextEdit};
    use crate::models::graph::GraphSummary;
    use crate::models::operation::RefactorOperation;
    use crate::models::report::{
        Diagnostic, DiagnosticKind, ImpactMetrics, RiskAssessment,
    };
    use std::path::PathBuf;

    fn sample_report() -> AnalysisReport {
        let mut changes = ChangeSet::new();
        changes.add(TextEdit::single_line(
            "b.js",
            1,
            "import { foo } from './a';",
            "import { bar } from './a';",
        ));

        AnalysisReport {
            project_root: PathBuf::from("/p"),
            generated_at: chrono::Utc::now(),
            operation: RefactorOperation::Rename {
                module: "a".to_string(),
                old_symbol: "foo".to_string(),
                new_symbol: "bar".to_string(),
            },
            graph: GraphSummary {
                module_count: 2,
                edge_count: 1,
                resolved_edge_count: 1,
                unresolved_import_count: 0,
            },
            diagnostics: vec![Diagnostic::new(
                DiagnosticKind::ParseFailure,
                "/p/bad.js",
                "syntax error",
            )],
            cycles: vec![vec!["a".to_string(), "b".to_string(), "a".to_string()]],
            risk: RiskAssessment {
                level: RiskLevel::Medium,
                metrics: ImpactMetrics {
                    affected_module_count: 3,
                    import_statement_count: 3,
                    cycle_count: 1,
                    max_cycle_length: 2,
                },
                warnings: vec!["3 modules are affected".to_string()],
            },
            changes: Some(changes),
            preview_error: None,
            duration_ms: 12,
        }
    }

    #[test]
    fn test_text_format_contains_key_sections() {
        let text = format_report_text(&sample_report(), false, false);

        assert!(text.contains("rename a::foo -> bar"));
        assert!(text.contains("Risk: MEDIUM"));
        assert!(text.contains("a -> b -> a"));
        assert!(text.contains("- import { foo } from './a';"));
        assert!(text.contains("+ import { bar } from './a';"));
        assert!(text.contains("bad.js"));
    }

    #[test]
    fn test_text_format_preview_error() {
        let mut report = sample_report();
        report.changes = None;
        report.preview_error = Some("symbol not found".to_string());

        let text = format_report_text(&report, false, false);
        assert!(text.contains("Preview unavailable: symbol not found"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = format_report_json(&sample_report()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["risk"]["level"], "Medium");
        assert_eq!(parsed["graph"]["module_count"], 2);
        assert_eq!(parsed["operation"]["kind"], "rename");
    }
}
