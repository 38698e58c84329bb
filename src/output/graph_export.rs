//! Dependency graph export shapes
//!
//! The external graph-layout renderer consumes exactly a node list and
//! an edge list; this module owes it that shape and nothing more. DOT
//! and CSV renderings of the same edge list are provided for tooling
//! that prefers them.

use crate::error::Result;
use crate::models::graph::DependencyGraph;
use serde::Serialize;
use std::path::PathBuf;

/// One module, as the renderer sees it
#[derive(Debug, Clone, Serialize)]
pub struct NodeExport {
    pub name: String,
    pub path: PathBuf,
    pub symbol_count: usize,
}

/// One import relationship, as the renderer sees it
#[derive(Debug, Clone, Serialize)]
pub struct EdgeExport {
    pub from: String,
    /// Target module name, or the raw specifier when unresolved
    pub to: String,
    pub resolved: bool,
    pub dynamic: bool,
    pub line: usize,
    pub imported_names: Vec<String>,
}

/// The `{nodes, edges}` shape owed to the external renderer
#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
}

impl GraphExport {
    /// Flatten a graph into the renderer's shape, in deterministic order
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let nodes = graph
            .modules()
            .map(|module| NodeExport {
                name: module.name.clone(),
                path: module.path.clone(),
                symbol_count: module.symbols.len(),
            })
            .collect();

        let edges = graph
            .edges()
            .map(|edge| EdgeExport {
                from: graph.module(edge.source).name.clone(),
                to: match edge.target {
                    Some(target) => graph.module(target).name.clone(),
                    None => edge.specifier.clone(),
                },
                resolved: edge.resolved,
                dynamic: edge.dynamic,
                line: edge.line,
                imported_names: edge
                    .imported_names
                    .iter()
                    .map(|n| n.imported.clone())
                    .collect(),
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// CSV edge list: one row per import relationship
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["from", "to", "resolved", "dynamic", "line", "imported_names"])?;
        for edge in &self.edges {
            writer.write_record([
                edge.from.as_str(),
                edge.to.as_str(),
                if edge.resolved { "true" } else { "false" },
                if edge.dynamic { "true" } else { "false" },
                &edge.line.to_string(),
                &edge.imported_names.join(" "),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| crate::error::RippleError::config_error(e.to_string()))?;
        String::from_utf8(bytes)
            .map_err(|e| crate::error::RippleError::config_error(e.to_string()))
    }

    /// Export to DOT format for visualization
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph dependencies {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box];\n\n");

        for node in &self.nodes {
            dot.push_str(&format!("  \"{}\";\n", node.name));
        }

        dot.push('\n');

        for edge in &self.edges {
            let style = if !edge.resolved {
                "dashed"
            } else if edge.dynamic {
                "dotted"
            } else {
                "solid"
            };
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [style={}];\n",
                edge.from, edge.to, style
            ));
        }

        dot.push_str("}\n");
        dot
    }
}
