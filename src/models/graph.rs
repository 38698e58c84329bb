//! Dependency graph data structures
//!
//! The whole-project graph is built once into an owned, indexable
//! arena. Forward adjacency lives on each `Module` (its ordered
//! `ImportEdge` list); reverse adjacency is maintained alongside it in
//! the same pass so both directions are O(1) lookups. The graph is
//! immutable once built and is shared read-only by every downstream
//! component.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::module::{Module, ModuleId, SourceSpan, SymbolDef};

/// One name brought in by an import statement.
///
/// `import { foo as f }` records `imported = "foo"`, `local = "f"`;
/// a plain named import has `imported == local`. Default imports use
/// `"default"` as the imported name; namespace imports use `"*"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedName {
    pub imported: String,
    pub local: String,
    /// Span of the specifier as written (covers `foo as f` for aliases)
    pub span: SourceSpan,
}

impl ImportedName {
    pub fn is_aliased(&self) -> bool {
        self.imported != self.local
    }
}

/// A directed relationship recording that one module references names
/// from another.
///
/// `resolved == false` edges (external packages, dynamic imports)
/// participate in reporting but never in graph traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportEdge {
    /// Importing module
    pub source: ModuleId,
    /// Imported module, when the specifier maps to a project file
    pub target: Option<ModuleId>,
    /// Module specifier as written in the source (`./utils`, `lodash`)
    pub specifier: String,
    /// Names imported by this statement, in source order
    pub imported_names: Vec<ImportedName>,
    /// 1-based line of the import statement
    pub line: usize,
    /// Whether the specifier maps to a known project module
    pub resolved: bool,
    /// Whether this came from a dynamic `import()` or `require`
    pub dynamic: bool,
    /// Whether this is a re-export (`export ... from`) rather than an import
    pub reexport: bool,
    /// Span of the whole import statement
    pub stmt_span: SourceSpan,
    /// Span of the specifier string's contents (inside the quotes)
    pub specifier_span: SourceSpan,
}

impl ImportEdge {
    /// Check whether this edge imports a given external name
    pub fn imports_name(&self, name: &str) -> bool {
        self.imported_names.iter().any(|n| n.imported == name)
    }
}

/// Reference to an edge by its position in the source module's list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRef {
    pub source: ModuleId,
    pub edge_index: usize,
}

/// Complete dependency graph for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Project root all relative paths hang off
    pub root: PathBuf,
    /// Module arena; `ModuleId` indexes into this
    modules: Vec<Module>,
    /// Canonical name -> handle
    name_index: HashMap<String, ModuleId>,
    /// Absolute path -> handle
    path_index: HashMap<PathBuf, ModuleId>,
    /// Incoming resolved edges per module
    reverse: Vec<Vec<EdgeRef>>,
}

impl DependencyGraph {
    /// Create an empty graph for a project root
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            modules: Vec::new(),
            name_index: HashMap::new(),
            path_index: HashMap::new(),
            reverse: Vec::new(),
        }
    }

    /// Add a module to the arena, returning its handle.
    ///
    /// Modules must all be added before any edge referencing them.
    pub fn add_module(
        &mut self,
        name: String,
        path: PathBuf,
        relative_path: PathBuf,
        symbols: Vec<SymbolDef>,
    ) -> ModuleId {
        let id = self.modules.len();
        self.name_index.insert(name.clone(), id);
        self.path_index.insert(path.clone(), id);
        self.modules.push(Module {
            id,
            name,
            path,
            relative_path,
            symbols,
            imports: Vec::new(),
        });
        self.reverse.push(Vec::new());
        id
    }

    /// Add an edge, mirroring it into reverse adjacency iff resolved.
    pub fn add_edge(&mut self, edge: ImportEdge) {
        let source = edge.source;
        let edge_index = self.modules[source].imports.len();
        if let Some(target) = edge.target {
            self.reverse[target].push(EdgeRef { source, edge_index });
        }
        self.modules[source].imports.push(edge);
    }

    /// Get a module by handle
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id]
    }

    /// Look up a module handle by canonical name
    pub fn module_id(&self, name: &str) -> Option<ModuleId> {
        self.name_index.get(name).copied()
    }

    /// Look up a module by canonical name
    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.module_id(name).map(|id| self.module(id))
    }

    /// Look up a module handle by absolute path
    pub fn module_id_by_path(&self, path: &Path) -> Option<ModuleId> {
        self.path_index.get(path).copied()
    }

    /// Iterate all modules in arena (file-path) order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Number of modules in the graph
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Total number of edges, resolved or not
    pub fn edge_count(&self) -> usize {
        self.modules.iter().map(|m| m.imports.len()).sum()
    }

    /// Incoming resolved edges for a module
    pub fn incoming(&self, id: ModuleId) -> &[EdgeRef] {
        &self.reverse[id]
    }

    /// Resolve an `EdgeRef` back to its edge
    pub fn edge(&self, edge_ref: EdgeRef) -> &ImportEdge {
        &self.modules[edge_ref.source].imports[edge_ref.edge_index]
    }

    /// Iterate all edges in deterministic (module, statement) order
    pub fn edges(&self) -> impl Iterator<Item = &ImportEdge> {
        self.modules.iter().flat_map(|m| m.imports.iter())
    }

    /// All unresolved edges, for the diagnostics section of a report
    pub fn unresolved_edges(&self) -> Vec<&ImportEdge> {
        self.edges().filter(|e| !e.resolved).collect()
    }

    /// Produce the summary block embedded in an `AnalysisReport`
    pub fn summary(&self) -> GraphSummary {
        let edge_count = self.edge_count();
        let unresolved_count = self.edges().filter(|e| !e.resolved).count();
        GraphSummary {
            module_count: self.module_count(),
            edge_count,
            resolved_edge_count: edge_count - unresolved_count,
            unresolved_import_count: unresolved_count,
        }
    }
}

/// Aggregate statistics about a built graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSummary {
    pub module_count: usize,
    pub edge_count: usize,
    pub resolved_edge_count: usize,
    pub unresolved_import_count: usize,
}
