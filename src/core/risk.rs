//! Risk assessment for refactor operations
//!
//! Purely advisory: the assessment informs the caller and never blocks
//! the preview engine from running.

use crate::core::cycles::{cycles_containing, Cycle};
use crate::core::dependents::dependents;
use crate::models::graph::DependencyGraph;
use crate::models::operation::RefactorOperation;
use crate::models::report::{ImpactMetrics, RiskAssessment, RiskLevel};

/// Dependent counts at or above this are medium risk
const MEDIUM_THRESHOLD: usize = 3;
/// Dependent counts at or above this are high risk
const HIGH_THRESHOLD: usize = 6;

/// Classify how disruptive an operation would be.
///
/// The tier is a deterministic threshold function of the transitive
/// dependent count; a cycle touching the target raises it one level.
pub fn assess(
    graph: &DependencyGraph,
    operation: &RefactorOperation,
    cycles: &[Cycle],
) -> RiskAssessment {
    let mut warnings = Vec::new();

    let target = match graph.module_id(operation.target_module()) {
        Some(id) => id,
        None => {
            warnings.push(format!(
                "module '{}' is not part of the dependency graph; impact metrics are empty",
                operation.target_module()
            ));
            return RiskAssessment {
                level: RiskLevel::Low,
                metrics: ImpactMetrics::default(),
                warnings,
            };
        }
    };

    let affected = dependents(graph, target, true);
    let import_statement_count = graph
        .incoming(target)
        .iter()
        .filter(|e| e.source != target)
        .count();

    let touching = cycles_containing(cycles, target);
    let metrics = ImpactMetrics {
        affected_module_count: affected.len(),
        import_statement_count,
        cycle_count: touching.len(),
        // A closed walk repeats its first module; subtract it
        max_cycle_length: touching.iter().map(|c| c.len() - 1).max().unwrap_or(0),
    };

    let mut level = if metrics.affected_module_count >= HIGH_THRESHOLD {
        warnings.push(format!(
            "{} modules are affected; consider a staged approach instead of one atomic change",
            metrics.affected_module_count
        ));
        RiskLevel::High
    } else if metrics.affected_module_count >= MEDIUM_THRESHOLD {
        warnings.push(format!(
            "{} modules are affected; review each dependent before applying",
            metrics.affected_module_count
        ));
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    if metrics.cycle_count > 0 {
        warnings.push(format!(
            "'{}' participates in {} import cycle(s); changes may feed back into their dependents",
            operation.target_module(),
            metrics.cycle_count
        ));
        level = level.bump();
    }

    RiskAssessment {
        level,
        metrics,
        warnings,
    }
}
