//! In-memory `SheetsApi` implementation.
//!
//! Compiled unconditionally so the ledger and bot crates can run their
//! tests without touching Google Sheets.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::{SheetsApi, SheetsError, Worksheet};

struct Tab {
    meta: Worksheet,
    grid: Vec<Vec<String>>,
}

#[derive(Default)]
pub struct MemorySheets {
    tabs: Mutex<Vec<Tab>>,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a tab with the given rows. Tabs keep insertion order, which
    /// is the listing order `worksheets()` reports.
    pub fn with_worksheet(self, title: &str, rows: Vec<Vec<&str>>) -> Self {
        {
            let mut tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
            let sheet_id = next_sheet_id(&tabs);
            tabs.push(Tab {
                meta: Worksheet {
                    title: title.to_string(),
                    sheet_id,
                },
                grid: rows
                    .into_iter()
                    .map(|r| r.into_iter().map(str::to_string).collect())
                    .collect(),
            });
        }
        self
    }

    /// Reads back one cell (1-based), for assertions.
    pub fn cell(&self, title: &str, row: u32, col: u32) -> Option<String> {
        let tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
        let tab = tabs.iter().find(|t| t.meta.title == title)?;
        tab.grid
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .cloned()
    }
}

#[async_trait]
impl SheetsApi for MemorySheets {
    async fn worksheets(&self) -> Result<Vec<Worksheet>, SheetsError> {
        let tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(tabs.iter().map(|t| t.meta.clone()).collect())
    }

    async fn add_worksheet(
        &self,
        title: &str,
        _rows: u32,
        _cols: u32,
    ) -> Result<Worksheet, SheetsError> {
        let mut tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
        let meta = Worksheet {
            title: title.to_string(),
            sheet_id: next_sheet_id(&tabs),
        };
        tabs.push(Tab {
            meta: meta.clone(),
            grid: Vec::new(),
        });
        Ok(meta)
    }

    async fn row_values(&self, title: &str, row: u32) -> Result<Vec<String>, SheetsError> {
        let tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
        let tab = find(&tabs, title)?;
        let mut values = tab.grid.get(row as usize - 1).cloned().unwrap_or_default();
        trim_trailing_blanks(&mut values);
        Ok(values)
    }

    async fn col_values(&self, title: &str, col: u32) -> Result<Vec<String>, SheetsError> {
        let tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
        let tab = find(&tabs, title)?;
        let mut values: Vec<String> = tab
            .grid
            .iter()
            .map(|r| r.get(col as usize - 1).cloned().unwrap_or_default())
            .collect();
        trim_trailing_blanks(&mut values);
        Ok(values)
    }

    async fn update_row(
        &self,
        title: &str,
        row: u32,
        values: &[String],
    ) -> Result<(), SheetsError> {
        let mut tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
        let tab = find_mut(&mut tabs, title)?;
        for (idx, value) in values.iter().enumerate() {
            set_cell(&mut tab.grid, row as usize, idx + 1, value);
        }
        Ok(())
    }

    async fn update_cell(
        &self,
        title: &str,
        row: u32,
        col: u32,
        value: &str,
    ) -> Result<(), SheetsError> {
        let mut tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
        let tab = find_mut(&mut tabs, title)?;
        set_cell(&mut tab.grid, row as usize, col as usize, value);
        Ok(())
    }
}

fn next_sheet_id(tabs: &[Tab]) -> i64 {
    tabs.iter().map(|t| t.meta.sheet_id).max().unwrap_or(-1) + 1
}

fn find<'a>(tabs: &'a [Tab], title: &str) -> Result<&'a Tab, SheetsError> {
    tabs.iter()
        .find(|t| t.meta.title == title)
        .ok_or_else(|| not_found(title))
}

fn find_mut<'a>(tabs: &'a mut [Tab], title: &str) -> Result<&'a mut Tab, SheetsError> {
    tabs.iter_mut()
        .find(|t| t.meta.title == title)
        .ok_or_else(|| not_found(title))
}

fn not_found(title: &str) -> SheetsError {
    SheetsError::Api {
        status: reqwest::StatusCode::BAD_REQUEST,
        message: format!("Unable to parse range: '{title}'"),
    }
}

fn set_cell(grid: &mut Vec<Vec<String>>, row: usize, col: usize, value: &str) {
    if grid.len() < row {
        grid.resize(row, Vec::new());
    }
    let row_cells = &mut grid[row - 1];
    if row_cells.len() < col {
        row_cells.resize(col, String::new());
    }
    row_cells[col - 1] = value.to_string();
}

fn trim_trailing_blanks(values: &mut Vec<String>) {
    while values.last().is_some_and(|v| v.is_empty()) {
        values.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_preserves_insertion_order() {
        let sheets = MemorySheets::new()
            .with_worksheet("Sheet1", vec![])
            .with_worksheet("March 2025", vec![vec!["Food", "", "Transport"]]);
        let tabs = sheets.worksheets().await.unwrap();
        let titles: Vec<_> = tabs.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Sheet1", "March 2025"]);
    }

    #[tokio::test]
    async fn cell_writes_grow_the_grid() {
        let sheets = MemorySheets::new().with_worksheet("April 2025", vec![]);
        sheets.update_cell("April 2025", 5, 3, "12.00").await.unwrap();
        assert_eq!(sheets.cell("April 2025", 5, 3).as_deref(), Some("12.00"));
        assert_eq!(
            sheets.col_values("April 2025", 3).await.unwrap(),
            vec!["", "", "", "", "12.00"]
        );
    }

    #[tokio::test]
    async fn unknown_tab_is_an_api_error() {
        let sheets = MemorySheets::new();
        let err = sheets.row_values("Nope", 1).await.unwrap_err();
        assert!(matches!(err, SheetsError::Api { .. }));
    }
}
