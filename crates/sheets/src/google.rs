//! `SheetsApi` over the Google Sheets v4 REST endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::{SheetsApi, SheetsError, TokenProvider, Worksheet, cell_ref, col_letter};

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct GoogleSheets {
    client: Client,
    token_provider: TokenProvider,
    spreadsheet_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetBody {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateBody {
    #[serde(default)]
    replies: Vec<BatchReply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchReply {
    add_sheet: Option<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct ValuesBody {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl GoogleSheets {
    pub fn new(client: Client, token_provider: TokenProvider, spreadsheet_id: String) -> Self {
        Self {
            client,
            token_provider,
            spreadsheet_id,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{BASE_URL}/{}{path}", self.spreadsheet_id)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SheetsError> {
        let token = self.token_provider.token().await?;
        let resp = self
            .client
            .get(self.url(path))
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;
        decode_response(resp).await
    }

    async fn send_json<T: for<'de> Deserialize<'de>>(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<T, SheetsError> {
        let token = self.token_provider.token().await?;
        let resp = self
            .client
            .request(method, self.url(path))
            .query(query)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        decode_response(resp).await
    }

    async fn write_range(
        &self,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), SheetsError> {
        // RAW keeps amounts exactly as the user typed them.
        let _: serde_json::Value = self
            .send_json(
                reqwest::Method::PUT,
                &format!("/values/{}", encode_range(range)),
                &[("valueInputOption", "RAW")],
                &json!({ "values": values }),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SheetsApi for GoogleSheets {
    async fn worksheets(&self) -> Result<Vec<Worksheet>, SheetsError> {
        let body: SpreadsheetBody = self.get_json("", &[("fields", "sheets.properties")]).await?;
        Ok(body
            .sheets
            .into_iter()
            .map(|s| Worksheet {
                title: s.properties.title,
                sheet_id: s.properties.sheet_id,
            })
            .collect())
    }

    async fn add_worksheet(
        &self,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<Worksheet, SheetsError> {
        tracing::debug!("creating worksheet {title:?} ({rows}x{cols})");
        let request = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols },
                    }
                }
            }]
        });
        let body: BatchUpdateBody = self
            .send_json(reqwest::Method::POST, ":batchUpdate", &[], &request)
            .await?;

        let props = body
            .replies
            .into_iter()
            .find_map(|r| r.add_sheet)
            .map(|s| s.properties)
            .ok_or_else(|| SheetsError::Api {
                status: reqwest::StatusCode::OK,
                message: "addSheet reply missing from batchUpdate response".to_string(),
            })?;
        Ok(Worksheet {
            title: props.title,
            sheet_id: props.sheet_id,
        })
    }

    async fn row_values(&self, title: &str, row: u32) -> Result<Vec<String>, SheetsError> {
        let range = format!("'{title}'!{row}:{row}");
        let body: ValuesBody = self
            .get_json(&format!("/values/{}", encode_range(&range)), &[])
            .await?;
        Ok(body.values.into_iter().next().unwrap_or_default())
    }

    async fn col_values(&self, title: &str, col: u32) -> Result<Vec<String>, SheetsError> {
        let letter = col_letter(col);
        let range = format!("'{title}'!{letter}:{letter}");
        let body: ValuesBody = self
            .get_json(
                &format!("/values/{}", encode_range(&range)),
                &[("majorDimension", "COLUMNS")],
            )
            .await?;
        Ok(body.values.into_iter().next().unwrap_or_default())
    }

    async fn update_row(
        &self,
        title: &str,
        row: u32,
        values: &[String],
    ) -> Result<(), SheetsError> {
        let range = format!("'{title}'!A{row}");
        self.write_range(&range, vec![values.to_vec()]).await
    }

    async fn update_cell(
        &self,
        title: &str,
        row: u32,
        col: u32,
        value: &str,
    ) -> Result<(), SheetsError> {
        let range = format!("'{title}'!{}", cell_ref(row, col));
        self.write_range(&range, vec![vec![value.to_string()]])
            .await
    }
}

async fn decode_response<T: for<'de> Deserialize<'de>>(
    resp: reqwest::Response,
) -> Result<T, SheetsError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error.message,
        Err(_) => "sheets api error".to_string(),
    };
    Err(SheetsError::Api { status, message })
}

/// A1 ranges go into the URL path; spaces in tab titles must be escaped.
fn encode_range(range: &str) -> String {
    range.replace(' ', "%20")
}
