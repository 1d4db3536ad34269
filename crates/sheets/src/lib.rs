//! Google Sheets adapter.
//!
//! Everything above this crate talks to a spreadsheet through the
//! [`SheetsApi`] trait; [`GoogleSheets`] is the real implementation and
//! [`MemorySheets`] is the in-memory one used by tests.

use async_trait::async_trait;
use reqwest::StatusCode;

mod auth;
mod google;
mod memory;

pub use auth::TokenProvider;
pub use google::GoogleSheets;
pub use memory::MemorySheets;

/// Metadata of one spreadsheet tab. `sheet_id` is the `gid` that shows
/// up in deep-link URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Worksheet {
    pub title: String,
    pub sheet_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("auth error: {0}")]
    Auth(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },
}

/// Raw spreadsheet operations the ledger needs. Rows and columns are
/// 1-based, matching A1 notation.
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// All tabs, in spreadsheet listing order.
    async fn worksheets(&self) -> Result<Vec<Worksheet>, SheetsError>;

    /// Creates a tab with the given grid capacity.
    async fn add_worksheet(
        &self,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<Worksheet, SheetsError>;

    /// Formatted values of one row, trailing blanks trimmed.
    async fn row_values(&self, title: &str, row: u32) -> Result<Vec<String>, SheetsError>;

    /// Formatted values of one column, trailing blanks trimmed.
    async fn col_values(&self, title: &str, col: u32) -> Result<Vec<String>, SheetsError>;

    /// Writes `values` into `row` starting at column A.
    async fn update_row(&self, title: &str, row: u32, values: &[String])
    -> Result<(), SheetsError>;

    /// Writes a single cell. Values are stored raw, no numeric coercion.
    async fn update_cell(
        &self,
        title: &str,
        row: u32,
        col: u32,
        value: &str,
    ) -> Result<(), SheetsError>;
}

/// 1-based column number to its A1 letter run (1 → A, 27 → AA).
pub fn col_letter(col: u32) -> String {
    debug_assert!(col >= 1);
    let mut col = col;
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1 reference for a single cell, e.g. `(2, 3)` → `C2`.
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{row}", col_letter(col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letter_columns() {
        assert_eq!(col_letter(1), "A");
        assert_eq!(col_letter(2), "B");
        assert_eq!(col_letter(26), "Z");
    }

    #[test]
    fn double_letter_columns() {
        assert_eq!(col_letter(27), "AA");
        assert_eq!(col_letter(28), "AB");
        assert_eq!(col_letter(52), "AZ");
        assert_eq!(col_letter(53), "BA");
    }

    #[test]
    fn cell_refs() {
        assert_eq!(cell_ref(2, 1), "A2");
        assert_eq!(cell_ref(10, 4), "D10");
    }
}
