//! Errors the ledger can throw.

use gsheets::SheetsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The category is not a header of the current month worksheet.
    #[error("Category '{0}' not found in spreadsheet.")]
    CategoryNotFound(String),
    /// The entry text had no amount token.
    #[error("empty entry")]
    EmptyEntry,
    #[error(transparent)]
    Sheets(#[from] SheetsError),
}
