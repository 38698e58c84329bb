//! Change preview engine
//!
//! Computes the exact line-level edits a refactor operation would
//! require across every affected file. Nothing is ever written to
//! disk; the output `ChangeSet` is handed to a separate apply step.
//!
//! Scope correctness is the hard part: a rename must rewrite
//! references to the imported binding and leave unrelated identifiers
//! that share the name alone. The occurrence walker handles that; this
//! module turns its spans into whole-line `TextEdit`s.

use crate::error::{OptionExt, Result, RippleError};
use crate::models::change_set::{ChangeSet, TextEdit};
use crate::models::graph::{DependencyGraph, ImportEdge};
use crate::models::module::{Module, ModuleId, SourceSpan};
use crate::models::operation::RefactorOperation;
use crate::parsers::occurrences::find_occurrences;
use crate::parsers::source_parser::LineIndex;
use crate::utils::path_resolver::specifier_for;
use lru::LruCache;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Files kept in the content cache; previews over one graph usually
/// revisit the same dependents
const CONTENT_CACHE_SIZE: usize = 128;

/// Computes unapplied edits for refactor operations against one graph.
///
/// Multiple operations can be previewed against the same engine; file
/// contents are read through an LRU cache.
pub struct PreviewEngine<'g> {
    graph: &'g DependencyGraph,
    content_cache: Mutex<LruCache<PathBuf, Arc<String>>>,
}

impl<'g> PreviewEngine<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self {
            graph,
            content_cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(CONTENT_CACHE_SIZE).expect("cache size is non-zero"),
            )),
        }
    }

    /// Compute the change set for an operation. Never writes to disk.
    pub fn preview(&self, operation: &RefactorOperation) -> Result<ChangeSet> {
        match operation {
            RefactorOperation::Rename {
                module,
                old_symbol,
                new_symbol,
            } => self.preview_rename(module, old_symbol, new_symbol),
            RefactorOperation::Move {
                module,
                new_location,
            } => self.preview_move(module, new_location),
            RefactorOperation::Split { module, partition } => {
                self.preview_split(module, partition)
            }
        }
    }

    fn preview_rename(
        &self,
        module_name: &str,
        old_symbol: &str,
        new_symbol: &str,
    ) -> Result<ChangeSet> {
        let target_id = self
            .graph
            .module_id(module_name)
            .ok_or_error(|| RippleError::module_not_found(module_name))?;
        let target = self.graph.module(target_id);
        let symbol = target
            .symbol(old_symbol)
            .ok_or_else(|| RippleError::symbol_not_found(module_name, old_symbol))?;

        // The new name must not collide with anything already visible
        // in the defining module
        if visible_names(target).contains(new_symbol) {
            return Err(RippleError::ambiguous_rewrite(
                target.path.clone(),
                new_symbol,
                "is already visible in the defining module",
            ));
        }

        let mut changes = ChangeSet::new();

        // Defining module: declaration name plus every in-file reference
        let content = self.read_file(&target.path)?;
        let mut splicer = Splicer::new();
        splicer.add(symbol.name_span, new_symbol.to_string());
        for span in self.occurrences_in(&target.path, old_symbol)? {
            splicer.add(span, new_symbol.to_string());
        }
        for edit in splicer.into_edits(&target.path, &content) {
            changes.add(edit);
        }

        // Modules that still expose `old_symbol` under its original
        // name: the target itself plus `export * from` chains over it
        let provides = self.star_reexport_closure(target_id);

        // Group the affected edges by importing module
        let mut by_source: BTreeMap<ModuleId, Vec<&ImportEdge>> = BTreeMap::new();
        for module in self.graph.modules() {
            if module.id == target_id {
                continue;
            }
            for edge in &module.imports {
                let targets_provider = edge
                    .target
                    .map(|t| provides.contains(&t))
                    .unwrap_or(false);
                if targets_provider && edge.imports_name(old_symbol) {
                    by_source.entry(module.id).or_default().push(edge);
                }
            }
        }

        for (source_id, edges) in by_source {
            let dependent = self.graph.module(source_id);

            // Rewriting introduces the new name as a local binding only
            // for plain (non-aliased) imports
            let introduces_local = edges.iter().any(|e| {
                !e.reexport
                    && e.imported_names
                        .iter()
                        .any(|n| n.imported == old_symbol && !n.is_aliased())
            });
            if introduces_local && visible_names(dependent).contains(new_symbol) {
                return Err(RippleError::ambiguous_rewrite(
                    dependent.path.clone(),
                    new_symbol,
                    "is already visible in a dependent module",
                ));
            }

            let content = self.read_file(&dependent.path)?;
            let mut splicer = Splicer::new();
            let mut rewrite_references = false;

            for edge in edges {
                for name in &edge.imported_names {
                    if name.imported != old_symbol {
                        continue;
                    }
                    let replacement = if name.is_aliased() {
                        format!("{} as {}", new_symbol, name.local)
                    } else if edge.reexport {
                        // Keep the re-exporter's public name stable so
                        // its own dependents are untouched
                        format!("{} as {}", new_symbol, old_symbol)
                    } else {
                        rewrite_references = true;
                        new_symbol.to_string()
                    };
                    splicer.add(name.span, replacement);
                }
            }

            if rewrite_references {
                for span in self.occurrences_in(&dependent.path, old_symbol)? {
                    splicer.add(span, new_symbol.to_string());
                }
            }

            for edit in splicer.into_edits(&dependent.path, &content) {
                changes.add(edit);
            }
        }

        Ok(changes)
    }

    fn preview_move(&self, module_name: &str, new_location: &str) -> Result<ChangeSet> {
        let target_id = self
            .graph
            .module_id(module_name)
            .ok_or_error(|| RippleError::module_not_found(module_name))?;
        let target = self.graph.module(target_id);

        if let Some(existing) = self.graph.module_by_name(new_location) {
            return Err(RippleError::ambiguous_rewrite(
                existing.path.clone(),
                new_location,
                "destination module already exists",
            ));
        }

        // The moved file keeps its extension
        let new_path = match target.path.extension() {
            Some(ext) => self
                .graph
                .root
                .join(format!("{}.{}", new_location, ext.to_string_lossy())),
            None => self.graph.root.join(new_location),
        };

        let mut changes = ChangeSet::new();

        // One specifier rewrite per dependent import; imported names
        // are unchanged by a move
        let mut by_source: BTreeMap<ModuleId, Vec<&ImportEdge>> = BTreeMap::new();
        for edge_ref in self.graph.incoming(target_id) {
            let edge = self.graph.edge(*edge_ref);
            by_source.entry(edge_ref.source).or_default().push(edge);
        }

        for (source_id, edges) in by_source {
            let dependent = self.graph.module(source_id);
            let content = self.read_file(&dependent.path)?;
            let mut splicer = Splicer::new();
            for edge in edges {
                let specifier = specifier_for(&dependent.path, &new_path);
                splicer.add(edge.specifier_span, specifier);
            }
            for edit in splicer.into_edits(&dependent.path, &content) {
                changes.add(edit);
            }
        }

        Ok(changes)
    }

    fn preview_split(
        &self,
        module_name: &str,
        partition: &BTreeMap<String, String>,
    ) -> Result<ChangeSet> {
        let target_id = self
            .graph
            .module_id(module_name)
            .ok_or_error(|| RippleError::module_not_found(module_name))?;
        let target = self.graph.module(target_id);

        // Partition keys must name real symbols
        for symbol in partition.keys() {
            if !target.defines(symbol) {
                return Err(RippleError::symbol_not_found(module_name, symbol));
            }
        }

        // No default bucket: every top-level symbol needs a destination
        let unassigned: Vec<String> = target
            .symbols
            .iter()
            .filter(|s| !partition.contains_key(&s.name))
            .map(|s| s.name.clone())
            .collect();
        if !unassigned.is_empty() {
            return Err(RippleError::unassigned_symbols(module_name, unassigned));
        }

        // Destinations must be new module names
        for destination in partition.values() {
            if let Some(existing) = self.graph.module_by_name(destination) {
                return Err(RippleError::ambiguous_rewrite(
                    existing.path.clone(),
                    destination,
                    "destination module already exists",
                ));
            }
        }

        let extension = target
            .path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "js".to_string());

        let mut changes = ChangeSet::new();

        let mut by_source: BTreeMap<ModuleId, Vec<&ImportEdge>> = BTreeMap::new();
        for edge_ref in self.graph.incoming(target_id) {
            let edge = self.graph.edge(*edge_ref);
            by_source.entry(edge_ref.source).or_default().push(edge);
        }

        for (source_id, edges) in by_source {
            let dependent = self.graph.module(source_id);
            let content = self.read_file(&dependent.path)?;
            let mut splicer = Splicer::new();

            for edge in edges {
                // A namespace, default, or dynamic import takes the
                // module wholesale; there is no unambiguous rewrite
                if edge.imported_names.is_empty()
                    || edge
                        .imported_names
                        .iter()
                        .any(|n| n.imported == "*" || n.imported == "default")
                {
                    return Err(RippleError::ambiguous_rewrite(
                        dependent.path.clone(),
                        "*",
                        "imports a split module wholesale; assign its uses manually",
                    ));
                }

                // Destination module -> names it now provides
                let mut groups: BTreeMap<&str, Vec<&crate::models::graph::ImportedName>> =
                    BTreeMap::new();
                for name in &edge.imported_names {
                    match partition.get(&name.imported) {
                        Some(destination) => {
                            groups.entry(destination.as_str()).or_default().push(name)
                        }
                        None => {
                            return Err(RippleError::unassigned_symbols(
                                module_name,
                                vec![name.imported.clone()],
                            ))
                        }
                    }
                }

                let statement =
                    self.split_statement(&content, edge, &groups, dependent, &extension);
                splicer.add(edge.stmt_span, statement);
            }

            for edit in splicer.into_edits(&dependent.path, &content) {
                changes.add(edit);
            }
        }

        Ok(changes)
    }

    /// Render the replacement import statements for one split edge,
    /// preserving the original quote style and statement keyword
    fn split_statement(
        &self,
        content: &str,
        edge: &ImportEdge,
        groups: &BTreeMap<&str, Vec<&crate::models::graph::ImportedName>>,
        dependent: &Module,
        extension: &str,
    ) -> String {
        let stmt_text =
            &content[edge.stmt_span.start as usize..edge.stmt_span.end as usize];
        let keyword = if edge.reexport { "export" } else { "import" };
        let semicolon = if stmt_text.trim_end().ends_with(';') {
            ";"
        } else {
            ""
        };
        let quote = content
            .as_bytes()
            .get(edge.specifier_span.start.saturating_sub(1) as usize)
            .map(|&b| b as char)
            .filter(|&c| c == '\'' || c == '"')
            .unwrap_or('\'');

        let mut statements = Vec::with_capacity(groups.len());
        for (destination, names) in groups {
            let new_path = self
                .graph
                .root
                .join(format!("{}.{}", destination, extension));
            let specifier = specifier_for(&dependent.path, &new_path);
            let names_text = names
                .iter()
                .map(|n| {
                    if n.is_aliased() {
                        format!("{} as {}", n.imported, n.local)
                    } else {
                        n.imported.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            statements.push(format!(
                "{} {{ {} }} from {}{}{}{}",
                keyword, names_text, quote, specifier, quote, semicolon
            ));
        }
        statements.join("\n")
    }

    /// Modules that re-expose the target's symbols under their original
    /// names via `export * from` chains
    fn star_reexport_closure(&self, target_id: ModuleId) -> HashSet<ModuleId> {
        let mut provides: HashSet<ModuleId> = HashSet::new();
        provides.insert(target_id);

        let mut changed = true;
        while changed {
            changed = false;
            for module in self.graph.modules() {
                if provides.contains(&module.id) {
                    continue;
                }
                let star_over_provider = module.imports.iter().any(|edge| {
                    edge.reexport
                        && edge
                            .target
                            .map(|t| provides.contains(&t))
                            .unwrap_or(false)
                        && edge
                            .imported_names
                            .iter()
                            .any(|n| n.imported == "*" && n.local == "*")
                });
                if star_over_provider {
                    provides.insert(module.id);
                    changed = true;
                }
            }
        }
        provides
    }

    fn read_file(&self, path: &Path) -> Result<Arc<String>> {
        if let Some(cached) = self.content_cache.lock().get(path) {
            return Ok(Arc::clone(cached));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| RippleError::file_read_error(path.to_path_buf(), e))?;
        let content = Arc::new(content);
        self.content_cache
            .lock()
            .put(path.to_path_buf(), Arc::clone(&content));
        Ok(content)
    }

    /// Scope-filtered references to `name` in a file
    fn occurrences_in(&self, path: &Path, name: &str) -> Result<Vec<SourceSpan>> {
        let content = self.read_file(path)?;
        let source_type = SourceType::from_path(path).unwrap_or_default();
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &content, source_type).parse();
        if !ret.errors.is_empty() {
            return Err(RippleError::parse_error(
                path,
                "file changed since the graph was built",
            ));
        }
        Ok(find_occurrences(&ret.program, name))
    }
}

/// Accumulates byte-span replacements for one file and converts them
/// into whole-line `TextEdit`s, merging splices that share lines.
struct Splicer {
    splices: Vec<(SourceSpan, String)>,
}

impl Splicer {
    fn new() -> Self {
        Self {
            splices: Vec::new(),
        }
    }

    fn add(&mut self, span: SourceSpan, replacement: String) {
        // Identical spans can arrive twice (an export specifier seen as
        // both import-line token and reference); keep the first
        if self.splices.iter().any(|(s, _)| *s == span) {
            return;
        }
        self.splices.push((span, replacement));
    }

    fn into_edits(mut self, file: &Path, source: &str) -> Vec<TextEdit> {
        if self.splices.is_empty() {
            return Vec::new();
        }
        self.splices.sort_by_key(|(span, _)| span.start);

        let lines = LineIndex::new(source);
        let line_of_end = |span: &SourceSpan| {
            let last = if span.end > span.start {
                span.end - 1
            } else {
                span.start
            };
            lines.line_of(last)
        };

        // Merge splices whose line ranges touch into one edit region
        let mut groups: Vec<(usize, usize, Vec<(SourceSpan, String)>)> = Vec::new();
        for (span, replacement) in self.splices {
            let start_line = lines.line_of(span.start);
            let end_line = line_of_end(&span);
            if let Some((_, group_end, members)) = groups.last_mut() {
                if start_line <= *group_end {
                    *group_end = (*group_end).max(end_line);
                    members.push((span, replacement));
                    continue;
                }
            }
            groups.push((start_line, end_line, vec![(span, replacement)]));
        }

        let mut edits = Vec::with_capacity(groups.len());
        for (start_line, end_line, members) in groups {
            let region_start = lines.line_start(start_line) as usize;
            let region_end = if end_line < lines.line_count() {
                lines.line_start(end_line + 1) as usize - 1
            } else {
                source.len()
            };

            let old_text = source[region_start..region_end].to_string();
            let mut new_text = old_text.clone();
            for (span, replacement) in members.iter().rev() {
                let start = span.start as usize - region_start;
                let end = span.end as usize - region_start;
                new_text.replace_range(start..end, replacement);
            }

            edits.push(TextEdit {
                file: file.to_path_buf(),
                line_range: (start_line, end_line),
                old_text,
                new_text,
            });
        }
        edits
    }
}

/// Names visible at module scope: its own top-level symbols plus every
/// imported local binding
fn visible_names(module: &Module) -> HashSet<&str> {
    let mut names: HashSet<&str> = module.symbols.iter().map(|s| s.name.as_str()).collect();
    for edge in &module.imports {
        if edge.reexport {
            continue;
        }
        for name in &edge.imported_names {
            names.insert(name.local.as_str());
        }
    }
    names
}
