//! Category name → amount column mapping, built from a header row.

use std::collections::HashMap;

/// Maps a trimmed, case-sensitive category name to its 1-based amount
/// column. The description column is always the one to its right.
#[derive(Clone, Debug, Default)]
pub struct CategoryIndex {
    columns: HashMap<String, u32>,
}

impl CategoryIndex {
    /// Builds the index from row 1. Blank header cells are skipped; all
    /// others become entries keyed by their trimmed text.
    pub fn from_header_row(header: &[String]) -> Self {
        let mut columns = HashMap::new();
        for (idx, cell) in header.iter().enumerate() {
            let name = cell.trim();
            if !name.is_empty() {
                columns.insert(name.to_string(), idx as u32 + 1);
            }
        }
        Self { columns }
    }

    pub fn column(&self, category: &str) -> Option<u32> {
        self.columns.get(category).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Category names, alphabetically sorted for display.
    pub fn names_sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.columns.keys().cloned().collect();
        names.sort();
        names
    }
}
