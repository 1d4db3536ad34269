use std::sync::Arc;

use base64::Engine;
use gsheets::{GoogleSheets, TokenProvider};
use ledger::Ledger;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spesa={level},telegram_bot={level},ledger={level},gsheets={level}",
            level = settings.level
        ))
        .init();

    let creds = match base64::prelude::BASE64_STANDARD.decode(&settings.google_creds_json) {
        Ok(creds) => String::from_utf8(creds)?,
        Err(err) => {
            tracing::error!("failed to decode service account credentials: {err}");
            return Err(err.into());
        }
    };

    tracing::info!("Authenticating with Google Sheets...");
    let token_provider = match TokenProvider::from_service_account_json(&creds).await {
        Ok(provider) => provider,
        Err(err) => {
            tracing::error!("failed to initialize sheets authentication: {err}");
            return Err(err.into());
        }
    };

    let sheets = GoogleSheets::new(
        reqwest::Client::new(),
        token_provider,
        settings.spreadsheet_id.clone(),
    );
    let ledger = Arc::new(Ledger::new(settings.spreadsheet_id, Arc::new(sheets)));
    tracing::info!("Ledger ready, starting bot...");

    telegram_bot::Bot::new(&settings.bot_token, ledger).run().await;

    Ok(())
}
