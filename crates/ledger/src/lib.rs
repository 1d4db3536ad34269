//! Monthly expense ledger over a spreadsheet.
//!
//! One worksheet per calendar month, named "March 2025" style. Row 1
//! holds the category headers; each category owns a pair of adjacent
//! columns (amount, description). The ledger keeps an in-process
//! category index per month and rebuilds it on every resolution, so a
//! month rollover is picked up on the next operation.

use std::sync::Arc;

use gsheets::{SheetsApi, Worksheet};
use tokio::sync::Mutex;

pub use error::LedgerError;
pub use index::CategoryIndex;
pub use month::MonthLabel;

pub mod entry;
mod error;
mod index;
mod month;

const SHEET_ROWS: u32 = 1000;
const SHEET_COLS: u32 = 40;

/// The spreadsheet's initial tab, never treated as a month worksheet.
const DEFAULT_SHEET_TITLE: &str = "Sheet1";

/// One written expense, reported back for logging and messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseEntry {
    pub row: u32,
    pub amount: String,
    pub description: String,
}

/// Deep link to the current month's tab.
#[derive(Clone, Debug)]
pub struct MonthLink {
    pub month: String,
    pub url: String,
}

#[derive(Default)]
struct MonthCache {
    month: Option<MonthLabel>,
    index: CategoryIndex,
}

pub struct Ledger {
    spreadsheet_id: String,
    sheets: Arc<dyn SheetsApi>,
    cache: Mutex<MonthCache>,
}

impl Ledger {
    pub fn new(spreadsheet_id: String, sheets: Arc<dyn SheetsApi>) -> Self {
        Self {
            spreadsheet_id,
            sheets,
            cache: Mutex::new(MonthCache::default()),
        }
    }

    /// Ensures the current month's worksheet exists and the category
    /// index reflects its header row.
    pub async fn resolve(&self) -> Result<Worksheet, LedgerError> {
        self.resolve_at(MonthLabel::current()).await
    }

    /// Appends one expense under `category`. The entry text is split on
    /// the first whitespace run into amount and description; the amount
    /// is written as raw text, unvalidated.
    pub async fn add_expense(
        &self,
        category: &str,
        entry_text: &str,
    ) -> Result<ExpenseEntry, LedgerError> {
        self.add_expense_at(MonthLabel::current(), category, entry_text)
            .await
    }

    /// Category names for the current month, resolving first whenever
    /// the cached index is empty or belongs to another month.
    pub async fn categories(&self) -> Result<Vec<String>, LedgerError> {
        {
            let cache = self.cache.lock().await;
            if cache.month == Some(MonthLabel::current()) && !cache.index.is_empty() {
                return Ok(cache.index.names_sorted());
            }
        }
        self.resolve().await?;
        let cache = self.cache.lock().await;
        Ok(cache.index.names_sorted())
    }

    /// URL opening the spreadsheet directly on the current month's tab.
    pub async fn month_link(&self) -> Result<MonthLink, LedgerError> {
        let worksheet = self.resolve().await?;
        Ok(MonthLink {
            month: worksheet.title,
            url: format!(
                "https://docs.google.com/spreadsheets/d/{}/edit#gid={}",
                self.spreadsheet_id, worksheet.sheet_id
            ),
        })
    }

    async fn resolve_at(&self, label: MonthLabel) -> Result<Worksheet, LedgerError> {
        // The cache lock is held for the whole resolution so two chats
        // rolling the month over cannot rebuild the index concurrently.
        let mut cache = self.cache.lock().await;
        if cache.month != Some(label) {
            tracing::info!("month changed to {label}, clearing category index");
            cache.index = CategoryIndex::default();
            cache.month = Some(label);
        }

        let title = label.to_string();
        let tabs = self.sheets.worksheets().await?;
        let worksheet = match tabs.iter().find(|t| t.title == title) {
            Some(existing) => existing.clone(),
            None => {
                tracing::info!("creating worksheet for {title}");
                let created = self
                    .sheets
                    .add_worksheet(&title, SHEET_ROWS, SHEET_COLS)
                    .await?;
                self.seed_header(&title, &tabs).await?;
                created
            }
        };

        let header = self.sheets.row_values(&title, 1).await?;
        cache.index = CategoryIndex::from_header_row(&header);
        tracing::debug!(
            "rebuilt category index for {title}: {} categories",
            cache.index.len()
        );
        Ok(worksheet)
    }

    /// Copies the header row from a prior month worksheet into a fresh
    /// tab. Takes the first month-named tab in listing order, which is
    /// not necessarily the chronologically nearest month.
    async fn seed_header(&self, title: &str, tabs: &[Worksheet]) -> Result<(), LedgerError> {
        let donor = tabs.iter().find(|t| {
            t.title != title && t.title != DEFAULT_SHEET_TITLE && MonthLabel::parse(&t.title).is_some()
        });
        let Some(donor) = donor else {
            tracing::warn!("no previous month worksheet found to copy headers from");
            return Ok(());
        };

        let header = self.sheets.row_values(&donor.title, 1).await?;
        if header.iter().any(|cell| !cell.trim().is_empty()) {
            tracing::info!("copying header row from {}", donor.title);
            self.sheets.update_row(title, 1, &header).await?;
        } else {
            tracing::warn!("no usable header row in {}", donor.title);
        }
        Ok(())
    }

    async fn add_expense_at(
        &self,
        label: MonthLabel,
        category: &str,
        entry_text: &str,
    ) -> Result<ExpenseEntry, LedgerError> {
        // Re-resolve so the write always targets a fresh worksheet.
        let worksheet = self.resolve_at(label).await?;

        let col = {
            let cache = self.cache.lock().await;
            cache.index.column(category)
        }
        .ok_or_else(|| LedgerError::CategoryNotFound(category.to_string()))?;

        let (amount, description) =
            entry::split_entry(entry_text).ok_or(LedgerError::EmptyEntry)?;

        let row = self.next_free_row(&worksheet.title, col).await?;
        tracing::info!("adding expense {amount} to {category} (col {col}) at row {row}");
        self.sheets
            .update_cell(&worksheet.title, row, col, amount)
            .await?;
        self.sheets
            .update_cell(&worksheet.title, row, col + 1, description)
            .await?;

        Ok(ExpenseEntry {
            row,
            amount: amount.to_string(),
            description: description.to_string(),
        })
    }

    /// First blank row after the contiguous filled run starting at row 2.
    /// Gaps below that point are not repaired.
    async fn next_free_row(&self, title: &str, col: u32) -> Result<u32, LedgerError> {
        let values = self.sheets.col_values(title, col).await?;
        let mut row = 2;
        for value in values.iter().skip(1) {
            if value.trim().is_empty() {
                break;
            }
            row += 1;
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsheets::MemorySheets;

    fn ledger_with(sheets: MemorySheets) -> (Ledger, Arc<MemorySheets>) {
        let sheets = Arc::new(sheets);
        let ledger = Ledger::new("sheet-id".to_string(), sheets.clone());
        (ledger, sheets)
    }

    fn march() -> MonthLabel {
        MonthLabel::new(2025, 3).unwrap()
    }

    fn april() -> MonthLabel {
        MonthLabel::new(2025, 4).unwrap()
    }

    #[tokio::test]
    async fn rollover_creates_tab_and_copies_headers() {
        let (ledger, sheets) = ledger_with(
            MemorySheets::new()
                .with_worksheet("Sheet1", vec![])
                .with_worksheet("March 2025", vec![vec!["Food", "", "Transport"]]),
        );

        ledger.resolve_at(march()).await.unwrap();
        let worksheet = ledger.resolve_at(april()).await.unwrap();
        assert_eq!(worksheet.title, "April 2025");

        // Header row copied verbatim from the March tab.
        assert_eq!(sheets.cell("April 2025", 1, 1).as_deref(), Some("Food"));
        assert_eq!(
            sheets.cell("April 2025", 1, 3).as_deref(),
            Some("Transport")
        );

        // Index was rebuilt for the new month.
        let cache = ledger.cache.lock().await;
        assert_eq!(cache.month, Some(april()));
        assert_eq!(cache.index.column("Transport"), Some(3));
    }

    #[tokio::test]
    async fn rollover_rebuilds_even_when_old_index_was_populated() {
        let (ledger, _sheets) = ledger_with(
            MemorySheets::new()
                .with_worksheet("March 2025", vec![vec!["Food"]])
                .with_worksheet("April 2025", vec![vec!["Rent", "", "Travel"]]),
        );

        ledger.resolve_at(march()).await.unwrap();
        {
            let cache = ledger.cache.lock().await;
            assert!(!cache.index.is_empty());
        }

        ledger.resolve_at(april()).await.unwrap();
        let cache = ledger.cache.lock().await;
        assert_eq!(cache.index.column("Food"), None);
        assert_eq!(cache.index.column("Rent"), Some(1));
        assert_eq!(cache.index.column("Travel"), Some(3));
    }

    #[tokio::test]
    async fn default_sheet_is_never_a_header_donor() {
        let (ledger, sheets) = ledger_with(
            MemorySheets::new().with_worksheet("Sheet1", vec![vec!["Not", "Headers"]]),
        );

        ledger.resolve_at(march()).await.unwrap();
        assert_eq!(sheets.cell("March 2025", 1, 1), None);
        let cache = ledger.cache.lock().await;
        assert!(cache.index.is_empty());
    }

    #[tokio::test]
    async fn blank_donor_header_is_not_copied() {
        let (ledger, sheets) = ledger_with(
            MemorySheets::new().with_worksheet("February 2025", vec![vec!["", "  ", ""]]),
        );

        ledger.resolve_at(march()).await.unwrap();
        assert_eq!(sheets.cell("March 2025", 1, 1), None);
    }

    #[tokio::test]
    async fn header_donor_is_first_in_listing_order() {
        // Listing order wins over chronology: January sits before
        // February in the tab list, so January donates the header.
        let (ledger, sheets) = ledger_with(
            MemorySheets::new()
                .with_worksheet("January 2025", vec![vec!["Old"]])
                .with_worksheet("February 2025", vec![vec!["New"]]),
        );

        ledger.resolve_at(march()).await.unwrap();
        assert_eq!(sheets.cell("March 2025", 1, 1).as_deref(), Some("Old"));
    }

    #[tokio::test]
    async fn writer_targets_row_after_contiguous_run() {
        let (ledger, _sheets) = ledger_with(MemorySheets::new().with_worksheet(
            "March 2025",
            vec![
                vec!["Food"],
                vec!["10.00"],
                vec!["4.50"],
                vec!["7.25"],
            ],
        ));

        let written = ledger
            .add_expense_at(march(), "Food", "3.00 snacks")
            .await
            .unwrap();
        assert_eq!(written.row, 5);
    }

    #[tokio::test]
    async fn writer_does_not_repair_gaps() {
        // Filled-then-empty-then-filled: the first blank after the run
        // is the append point even though row 4 holds data.
        let (ledger, sheets) = ledger_with(MemorySheets::new().with_worksheet(
            "March 2025",
            vec![
                vec!["Food"],
                vec!["10.00"],
                vec![""],
                vec!["7.25"],
            ],
        ));

        let written = ledger
            .add_expense_at(march(), "Food", "3.00 snacks")
            .await
            .unwrap();
        assert_eq!(written.row, 3);
        assert_eq!(sheets.cell("March 2025", 3, 1).as_deref(), Some("3.00"));
    }

    #[tokio::test]
    async fn unknown_category_writes_nothing() {
        let (ledger, sheets) = ledger_with(
            MemorySheets::new().with_worksheet("March 2025", vec![vec!["Food"]]),
        );

        let err = ledger
            .add_expense_at(march(), "Transport", "10 bus")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::CategoryNotFound(_)));
        assert_eq!(sheets.cell("March 2025", 2, 1), None);
    }

    #[tokio::test]
    async fn fresh_worksheet_scenario() {
        // Header ["Food", "", "Transport", ""] on an empty sheet:
        // "10 snacks" lands at (2,1) and (2,2).
        let (ledger, sheets) = ledger_with(MemorySheets::new().with_worksheet(
            "March 2025",
            vec![vec!["Food", "", "Transport", ""]],
        ));

        let written = ledger
            .add_expense_at(march(), "Food", "10 snacks")
            .await
            .unwrap();
        assert_eq!(written.row, 2);
        assert_eq!(sheets.cell("March 2025", 2, 1).as_deref(), Some("10"));
        assert_eq!(sheets.cell("March 2025", 2, 2).as_deref(), Some("snacks"));
    }

    #[tokio::test]
    async fn round_trip_amount_and_description() {
        let (ledger, sheets) = ledger_with(
            MemorySheets::new().with_worksheet("March 2025", vec![vec!["Food"]]),
        );

        ledger
            .add_expense_at(march(), "Food", "25.10 coffee")
            .await
            .unwrap();
        assert_eq!(sheets.cell("March 2025", 2, 1).as_deref(), Some("25.10"));
        assert_eq!(sheets.cell("March 2025", 2, 2).as_deref(), Some("coffee"));
    }

    #[tokio::test]
    async fn blank_entry_text_is_rejected_before_writing() {
        let (ledger, sheets) = ledger_with(
            MemorySheets::new().with_worksheet("March 2025", vec![vec!["Food"]]),
        );

        let err = ledger
            .add_expense_at(march(), "Food", "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::EmptyEntry));
        assert_eq!(sheets.cell("March 2025", 2, 1), None);
    }
}
