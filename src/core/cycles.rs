//! Import cycle detection
//!
//! Cycles are found per strongly connected component: petgraph's
//! Tarjan pass narrows the search to components that can contain one,
//! then a depth-first walk with an explicit recursion stack enumerates
//! simple cycles inside each component. A cycle is reported once, no
//! matter which module the walk entered it from.

use crate::models::graph::DependencyGraph;
use crate::models::module::ModuleId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// A closed walk of modules; first and last entries are identical
pub type Cycle = Vec<ModuleId>;

/// Find all simple import cycles in the graph, deduplicated by
/// rotation: A -> B -> C -> A is one cycle, not three.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    // Only resolved edges participate in traversal. Parallel edges
    // (two import statements between the same modules) collapse to one.
    let mut digraph: DiGraph<ModuleId, ()> = DiGraph::new();
    let mut nodes: Vec<NodeIndex> = Vec::with_capacity(graph.module_count());
    for module in graph.modules() {
        nodes.push(digraph.add_node(module.id));
    }

    let mut seen_pairs: HashSet<(ModuleId, ModuleId)> = HashSet::new();
    for edge in graph.edges() {
        if let Some(target) = edge.target {
            if seen_pairs.insert((edge.source, target)) {
                digraph.add_edge(nodes[edge.source], nodes[target], ());
            }
        }
    }

    let mut cycles: Vec<Cycle> = Vec::new();
    let mut canonical_seen: HashSet<Vec<ModuleId>> = HashSet::new();

    for mut scc in tarjan_scc(&digraph) {
        let has_self_loop = scc.len() == 1
            && digraph
                .neighbors(scc[0])
                .any(|neighbor| neighbor == scc[0]);
        if scc.len() < 2 && !has_self_loop {
            continue;
        }

        scc.sort_unstable_by_key(|n| digraph[*n]);
        let members: HashSet<NodeIndex> = scc.iter().copied().collect();

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        for &start in &scc {
            if !visited.contains(&start) {
                let mut stack: Vec<NodeIndex> = Vec::new();
                let mut on_stack: HashMap<NodeIndex, usize> = HashMap::new();
                dfs(
                    &digraph,
                    &members,
                    start,
                    &mut visited,
                    &mut stack,
                    &mut on_stack,
                    &mut canonical_seen,
                    &mut cycles,
                );
            }
        }
    }

    cycles
}

/// Cycles from `cycles` that pass through `id`
pub fn cycles_containing(cycles: &[Cycle], id: ModuleId) -> Vec<&Cycle> {
    cycles
        .iter()
        .filter(|cycle| cycle.iter().any(|&m| m == id))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    digraph: &DiGraph<ModuleId, ()>,
    members: &HashSet<NodeIndex>,
    node: NodeIndex,
    visited: &mut HashSet<NodeIndex>,
    stack: &mut Vec<NodeIndex>,
    on_stack: &mut HashMap<NodeIndex, usize>,
    canonical_seen: &mut HashSet<Vec<ModuleId>>,
    cycles: &mut Vec<Cycle>,
) {
    visited.insert(node);
    on_stack.insert(node, stack.len());
    stack.push(node);

    let mut neighbors: Vec<NodeIndex> = digraph
        .neighbors(node)
        .filter(|n| members.contains(n))
        .collect();
    neighbors.sort_unstable_by_key(|n| digraph[*n]);

    for neighbor in neighbors {
        if let Some(&position) = on_stack.get(&neighbor) {
            // Back edge: the stack slice from the neighbor down is a cycle
            let walk: Vec<ModuleId> = stack[position..].iter().map(|&n| digraph[n]).collect();
            record_cycle(walk, canonical_seen, cycles);
        } else if !visited.contains(&neighbor) {
            dfs(
                digraph,
                members,
                neighbor,
                visited,
                stack,
                on_stack,
                canonical_seen,
                cycles,
            );
        }
    }

    stack.pop();
    on_stack.remove(&node);
}

fn record_cycle(
    walk: Vec<ModuleId>,
    canonical_seen: &mut HashSet<Vec<ModuleId>>,
    cycles: &mut Vec<Cycle>,
) {
    if walk.is_empty() {
        return;
    }

    // Canonical rotation: smallest module id leads
    let min_pos = walk
        .iter()
        .enumerate()
        .min_by_key(|(_, &id)| id)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut canonical = Vec::with_capacity(walk.len());
    canonical.extend_from_slice(&walk[min_pos..]);
    canonical.extend_from_slice(&walk[..min_pos]);

    if canonical_seen.insert(canonical.clone()) {
        let mut closed = canonical;
        closed.push(closed[0]);
        cycles.push(closed);
    }
}
