//! Service-account authentication for the Sheets API.
//!
//! The bot authenticates as a service account whose key JSON arrives
//! through configuration. `yup-oauth2` caches the access token and
//! refreshes it when it expires, so `token()` is cheap to call per
//! request.

use yup_oauth2::authenticator::DefaultAuthenticator;

use crate::SheetsError;

const SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];

#[derive(Clone)]
pub struct TokenProvider {
    auth: DefaultAuthenticator,
}

impl TokenProvider {
    /// Builds a provider from the service-account key JSON.
    pub async fn from_service_account_json(json: &str) -> Result<Self, SheetsError> {
        let key = yup_oauth2::parse_service_account_key(json)
            .map_err(|err| SheetsError::Auth(format!("invalid service account key: {err}")))?;
        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|err| SheetsError::Auth(format!("authenticator init failed: {err}")))?;
        Ok(Self { auth })
    }

    /// Returns a bearer token valid for the spreadsheet scope.
    pub async fn token(&self) -> Result<String, SheetsError> {
        let token = self
            .auth
            .token(SCOPES)
            .await
            .map_err(|err| SheetsError::Auth(format!("token refresh failed: {err}")))?;
        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| SheetsError::Auth("token response had no access token".to_string()))
    }
}
