//! Reverse dependency queries
//!
//! The single most important query in the system: "what breaks if I
//! change this module." Every downstream component (risk, preview)
//! consumes its output.

use crate::models::graph::DependencyGraph;
use crate::models::module::ModuleId;
use std::collections::{HashSet, VecDeque};

/// Modules that import `target`, directly or transitively.
///
/// Results are sorted by module id so callers see a stable order. A
/// visited set bounds the traversal even when the graph contains
/// cycles.
pub fn dependents(graph: &DependencyGraph, target: ModuleId, transitive: bool) -> Vec<ModuleId> {
    let mut found: HashSet<ModuleId> = HashSet::new();

    if transitive {
        let mut queue: VecDeque<ModuleId> = VecDeque::new();
        let mut visited: HashSet<ModuleId> = HashSet::new();
        visited.insert(target);
        queue.push_back(target);

        while let Some(current) = queue.pop_front() {
            for edge_ref in graph.incoming(current) {
                if visited.insert(edge_ref.source) {
                    queue.push_back(edge_ref.source);
                }
                found.insert(edge_ref.source);
            }
        }
        // A self-import would otherwise list the target as its own dependent
        found.remove(&target);
    } else {
        for edge_ref in graph.incoming(target) {
            if edge_ref.source != target {
                found.insert(edge_ref.source);
            }
        }
    }

    let mut result: Vec<ModuleId> = found.into_iter().collect();
    result.sort_unstable();
    result
}

/// Dependents looked up by canonical module name.
///
/// An unknown name returns an empty set, not an error: modules may be
/// queried speculatively before they exist.
pub fn dependents_of_name(graph: &DependencyGraph, name: &str, transitive: bool) -> Vec<ModuleId> {
    match graph.module_id(name) {
        Some(id) => dependents(graph, id, transitive),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::graph::ImportEdge;
    use crate::models::module::SourceSpan;
    use std::path::PathBuf;

    fn edge(source: ModuleId, target: ModuleId) -> ImportEdge {
        ImportEdge {
            source,
            target: Some(target),
            specifier: String::new(),
            imported_names: Vec::new(),
            line: 1,
            resolved: true,
            dynamic: false,
            reexport: false,
            stmt_span: SourceSpan::new(0, 0),
            specifier_span: SourceSpan::new(0, 0),
        }
    }

    /// a <- b <- c chain plus d importing a directly
    fn chain_graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new(PathBuf::from("/p"));
        for name in ["a", "b", "c", "d"] {
            graph.add_module(
                name.to_string(),
                PathBuf::from(format!("/p/{}.js", name)),
                PathBuf::from(format!("{}.js", name)),
                Vec::new(),
            );
        }
        let (a, b, c, d) = (0, 1, 2, 3);
        graph.add_edge(edge(b, a));
        graph.add_edge(edge(c, b));
        graph.add_edge(edge(d, a));
        graph
    }

    #[test]
    fn test_direct_dependents() {
        let graph = chain_graph();
        let a = graph.module_id("a").unwrap();

        let direct = dependents(&graph, a, false);
        assert_eq!(direct, vec![1, 3]); // b and d
    }

    #[test]
    fn test_transitive_closure() {
        let graph = chain_graph();
        let a = graph.module_id("a").unwrap();

        let all = dependents(&graph, a, true);
        assert_eq!(all, vec![1, 2, 3]); // b, c, d
    }

    #[test]
    fn test_every_resolved_edge_is_a_direct_dependent() {
        let graph = chain_graph();
        for module in graph.modules() {
            for edge in &module.imports {
                if let Some(target) = edge.target {
                    assert!(dependents(&graph, target, false).contains(&module.id));
                }
            }
        }
    }

    #[test]
    fn test_unknown_target_is_empty_not_error() {
        let graph = chain_graph();
        assert!(dependents_of_name(&graph, "src/not-yet-written", true).is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = DependencyGraph::new(PathBuf::from("/p"));
        for name in ["x", "y"] {
            graph.add_module(
                name.to_string(),
                PathBuf::from(format!("/p/{}.js", name)),
                PathBuf::from(format!("{}.js", name)),
                Vec::new(),
            );
        }
        graph.add_edge(edge(0, 1));
        graph.add_edge(edge(1, 0));

        let deps = dependents(&graph, 0, true);
        assert_eq!(deps, vec![1]);
    }
}
