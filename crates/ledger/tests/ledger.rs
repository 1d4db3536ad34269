use std::sync::Arc;

use gsheets::{MemorySheets, SheetsApi};
use ledger::{Ledger, LedgerError, MonthLabel};

fn current_title() -> String {
    MonthLabel::current().to_string()
}

fn ledger_with(sheets: MemorySheets) -> (Ledger, Arc<MemorySheets>) {
    let sheets = Arc::new(sheets);
    let ledger = Ledger::new("sheet-id".to_string(), sheets.clone());
    (ledger, sheets)
}

#[tokio::test]
async fn categories_resolve_and_come_back_sorted() {
    let title = current_title();
    let (ledger, _sheets) = ledger_with(
        MemorySheets::new().with_worksheet(&title, vec![vec!["Transport", "", "Food"]]),
    );

    let categories = ledger.categories().await.unwrap();
    assert_eq!(categories, ["Food", "Transport"]);
}

#[tokio::test]
async fn resolving_a_missing_month_creates_the_tab() {
    let (ledger, sheets) = ledger_with(MemorySheets::new().with_worksheet("Sheet1", vec![]));

    let worksheet = ledger.resolve().await.unwrap();
    assert_eq!(worksheet.title, current_title());

    let titles: Vec<String> = sheets
        .worksheets()
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.title)
        .collect();
    assert!(titles.contains(&current_title()));
}

#[tokio::test]
async fn expense_lands_in_the_category_column_pair() {
    let title = current_title();
    let (ledger, sheets) =
        ledger_with(MemorySheets::new().with_worksheet(&title, vec![vec!["Food", "", "Rent"]]));

    let written = ledger.add_expense("Rent", "800 october").await.unwrap();
    assert_eq!(written.row, 2);
    assert_eq!(sheets.cell(&title, 2, 3).as_deref(), Some("800"));
    assert_eq!(sheets.cell(&title, 2, 4).as_deref(), Some("october"));
}

#[tokio::test]
async fn missing_category_is_reported() {
    let title = current_title();
    let (ledger, _sheets) =
        ledger_with(MemorySheets::new().with_worksheet(&title, vec![vec!["Food"]]));

    let err = ledger.add_expense("Bills", "42 water").await.unwrap_err();
    assert!(
        matches!(err, LedgerError::CategoryNotFound(ref name) if name == "Bills"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn month_link_points_at_the_current_tab() {
    let (ledger, sheets) = ledger_with(MemorySheets::new());

    let link = ledger.month_link().await.unwrap();
    assert_eq!(link.month, current_title());

    let gid = sheets
        .worksheets()
        .await
        .unwrap()
        .into_iter()
        .find(|w| w.title == link.month)
        .map(|w| w.sheet_id)
        .unwrap();
    assert_eq!(
        link.url,
        format!("https://docs.google.com/spreadsheets/d/sheet-id/edit#gid={gid}")
    );
}
