//! Unapplied text edits
//!
//! A `ChangeSet` is the complete collection of line-level edits a
//! refactor operation would require. It is never applied here; a
//! separate apply step consumes it. Edits are kept sorted by line
//! within each file so a viewer or applier can work top-to-bottom
//! deterministically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A single line-level edit in one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEdit {
    /// File the edit applies to
    pub file: PathBuf,
    /// 1-based inclusive line range being replaced
    pub line_range: (usize, usize),
    /// Exact current text of those lines
    pub old_text: String,
    /// Replacement text
    pub new_text: String,
}

impl TextEdit {
    /// Edit replacing a single line
    pub fn single_line(
        file: impl Into<PathBuf>,
        line: usize,
        old_text: impl Into<String>,
        new_text: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line_range: (line, line),
            old_text: old_text.into(),
            new_text: new_text.into(),
        }
    }
}

/// All edits of one previewed operation, grouped by file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// File -> edits sorted by starting line. BTreeMap keeps file
    /// order deterministic across runs.
    edits: BTreeMap<PathBuf, Vec<TextEdit>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edit, keeping the file's edits sorted by line
    pub fn add(&mut self, edit: TextEdit) {
        let edits = self.edits.entry(edit.file.clone()).or_default();
        let pos = edits
            .binary_search_by_key(&edit.line_range.0, |e| e.line_range.0)
            .unwrap_or_else(|p| p);
        edits.insert(pos, edit);
    }

    /// Edits for one file, sorted by line
    pub fn edits_for(&self, file: &Path) -> &[TextEdit] {
        self.edits.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate (file, edits) pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Vec<TextEdit>)> {
        self.edits.iter()
    }

    /// Files touched by this change set, in path order
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.edits.keys()
    }

    pub fn file_count(&self) -> usize {
        self.edits.len()
    }

    pub fn edit_count(&self) -> usize {
        self.edits.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_sorted_by_line() {
        let mut changes = ChangeSet::new();
        changes.add(TextEdit::single_line("b.js", 10, "x", "y"));
        changes.add(TextEdit::single_line("b.js", 2, "a", "b"));
        changes.add(TextEdit::single_line("b.js", 5, "m", "n"));

        let lines: Vec<usize> = changes
            .edits_for(Path::new("b.js"))
            .iter()
            .map(|e| e.line_range.0)
            .collect();
        assert_eq!(lines, vec![2, 5, 10]);
    }

    #[test]
    fn test_file_order_deterministic() {
        let mut changes = ChangeSet::new();
        changes.add(TextEdit::single_line("z.js", 1, "", ""));
        changes.add(TextEdit::single_line("a.js", 1, "", ""));
        changes.add(TextEdit::single_line("m.js", 1, "", ""));

        let files: Vec<String> = changes
            .files()
            .map(|f| f.display().to_string())
            .collect();
        assert_eq!(files, vec!["a.js", "m.js", "z.js"]);
        assert_eq!(changes.file_count(), 3);
        assert_eq!(changes.edit_count(), 3);
    }

    #[test]
    fn test_empty() {
        let changes = ChangeSet::new();
        assert!(changes.is_empty());
        assert_eq!(changes.edits_for(Path::new("none.js")).len(), 0);
    }
}
