//! Handles settings for the application. Configuration is read from
//! `settings.toml` when present, with environment variables taking
//! precedence (`BOT_TOKEN`, `SPREADSHEET_ID`, `GOOGLE_CREDS_JSON`,
//! `LEVEL`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub bot_token: String,
    pub spreadsheet_id: String,
    /// Base64 of the Google service account JSON key.
    pub google_creds_json: String,
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::default())
            .build()?;

        settings.try_deserialize()
    }
}
