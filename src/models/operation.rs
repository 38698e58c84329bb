//! Proposed refactor operations
//!
//! An operation is a read-only description of a structural change that
//! has not been applied. The risk assessor and preview engine consume
//! it; neither mutates it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A proposed rename, move, or split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RefactorOperation {
    /// Rename a top-level symbol within a module
    Rename {
        /// Canonical name of the defining module
        module: String,
        old_symbol: String,
        new_symbol: String,
    },
    /// Move a module to a new location
    Move {
        /// Canonical name of the module being moved
        module: String,
        /// New canonical location (project-relative, no extension)
        new_location: String,
    },
    /// Split a module's symbols across several new modules
    Split {
        /// Canonical name of the module being split
        module: String,
        /// Symbol name -> destination module name. BTreeMap keeps the
        /// partition order deterministic in output and previews.
        partition: BTreeMap<String, String>,
    },
}

impl RefactorOperation {
    /// Canonical name of the module the operation targets
    pub fn target_module(&self) -> &str {
        match self {
            RefactorOperation::Rename { module, .. } => module,
            RefactorOperation::Move { module, .. } => module,
            RefactorOperation::Split { module, .. } => module,
        }
    }

    /// Short human-readable description for report headers
    pub fn describe(&self) -> String {
        match self {
            RefactorOperation::Rename {
                module,
                old_symbol,
                new_symbol,
            } => format!("rename {}::{} -> {}", module, old_symbol, new_symbol),
            RefactorOperation::Move {
                module,
                new_location,
            } => format!("move {} -> {}", module, new_location),
            RefactorOperation::Split { module, partition } => {
                let destinations: std::collections::BTreeSet<&str> =
                    partition.values().map(|s| s.as_str()).collect();
                format!(
                    "split {} into {}",
                    module,
                    destinations.into_iter().collect::<Vec<_>>().join(", ")
                )
            }
        }
    }
}

impl std::fmt::Display for RefactorOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_module() {
        let rename = RefactorOperation::Rename {
            module: "src/utils".to_string(),
            old_symbol: "foo".to_string(),
            new_symbol: "bar".to_string(),
        };
        assert_eq!(rename.target_module(), "src/utils");

        let mut partition = BTreeMap::new();
        partition.insert("a".to_string(), "src/a".to_string());
        let split = RefactorOperation::Split {
            module: "src/big".to_string(),
            partition,
        };
        assert_eq!(split.target_module(), "src/big");
    }

    #[test]
    fn test_describe() {
        let mv = RefactorOperation::Move {
            module: "src/utils".to_string(),
            new_location: "src/common/utils".to_string(),
        };
        assert_eq!(mv.describe(), "move src/utils -> src/common/utils");
    }
}
