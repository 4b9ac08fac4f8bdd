//! Google Sheets backend.
//!
//! Each table is a worksheet of the same name inside one spreadsheet.
//! Requests are blocking and made one at a time; errors are mapped to
//! [`StoreError`] and returned without retrying.

mod auth;
mod range;
#[cfg(test)]
mod stub;

pub use auth::{SCOPES, ServiceAccountKey, TokenSource};
pub use range::{column_letter, column_range, quote_sheet};

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::{StoreError, TabularStore};
use crate::config::{SheetsConfig, SpreadsheetRef};

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Renders a cell value the way the spreadsheet displays it.
fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn into_cells(rows: Vec<Vec<Value>>) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect()
}

/// Maps a non-success response to a [`StoreError`].
fn api_error(status: StatusCode, body: &str, context: &str) -> StoreError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(format!("{}: {}", context, message)),
        StatusCode::BAD_REQUEST if message.starts_with("Unable to parse range") => {
            StoreError::NotFound(format!("worksheet for {}", context))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::Auth(format!("{}: {}", context, message))
        }
        _ => StoreError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Store backed by worksheets of a Google spreadsheet.
pub struct SheetsStore {
    http: Client,
    auth: TokenSource,
    api_base: String,
    spreadsheet_id: String,
}

impl SheetsStore {
    /// Loads credentials, authorizes and resolves the spreadsheet.
    pub fn connect(config: &SheetsConfig) -> Result<Self, StoreError> {
        let http = Client::builder()
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Self::connect_with(config, http)
    }

    fn connect_with(config: &SheetsConfig, http: Client) -> Result<Self, StoreError> {
        let key = ServiceAccountKey::from_file(&config.credentials_path)?;
        let mut auth = TokenSource::new(key);

        let spreadsheet_id = match &config.spreadsheet {
            SpreadsheetRef::Id(id) => id.clone(),
            SpreadsheetRef::Title(title) => {
                find_spreadsheet(&http, &mut auth, &config.drive_api_base, title)?
            }
        };

        info!(
            "Connected to spreadsheet {} as {}",
            spreadsheet_id,
            auth.client_email()
        );

        Ok(Self {
            http,
            auth,
            api_base: config.sheets_api_base.clone(),
            spreadsheet_id,
        })
    }

    fn values_url(&self, range: &str, suffix: &str) -> Result<Url, StoreError> {
        range::values_url(&self.api_base, &self.spreadsheet_id, range, suffix)
    }

    fn get_values(&mut self, range: &str, query: &[(&str, &str)]) -> Result<ValueRange, StoreError> {
        let url = self.values_url(range, "")?;
        let request = self.http.get(url).query(query);
        execute(request, &self.http, &mut self.auth, range)
    }
}

fn execute<T: DeserializeOwned>(
    request: RequestBuilder,
    http: &Client,
    auth: &mut TokenSource,
    context: &str,
) -> Result<T, StoreError> {
    let token = auth.token(http)?;
    let response = request
        .bearer_auth(token)
        .send()
        .map_err(|e| StoreError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| StoreError::Transport(e.to_string()))?;
    debug!("{} -> HTTP {}", context, status.as_u16());

    if !status.is_success() {
        return Err(api_error(status, &body, context));
    }
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(format!("{}: {}", context, e)))
}

fn find_spreadsheet(
    http: &Client,
    auth: &mut TokenSource,
    drive_base: &str,
    title: &str,
) -> Result<String, StoreError> {
    let url = range::drive_files_url(drive_base)?;
    let query = range::drive_query(title);
    let request = http.get(url).query(&[
        ("q", query.as_str()),
        ("fields", "files(id,name)"),
        ("pageSize", "1"),
        ("supportsAllDrives", "true"),
        ("includeItemsFromAllDrives", "true"),
    ]);

    let list: FileList = execute(request, http, auth, "spreadsheet search")?;
    list.files
        .into_iter()
        .next()
        .map(|f| f.id)
        .ok_or_else(|| StoreError::NotFound(format!("spreadsheet '{}'", title)))
}

impl TabularStore for SheetsStore {
    fn append_row(&mut self, table: &str, row: &[i64]) -> Result<(), StoreError> {
        let range = quote_sheet(table);
        let url = self.values_url(&range, ":append")?;
        let body = serde_json::json!({ "values": [row] });
        let request = self
            .http
            .post(url)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body);

        let _: Value = execute(request, &self.http, &mut self.auth, &range)?;
        Ok(())
    }

    fn read_column(&mut self, table: &str, index: usize) -> Result<Vec<String>, StoreError> {
        let range = column_range(table, index)
            .ok_or_else(|| StoreError::NotFound(format!("column {} of '{}'", index, table)))?;
        let values = self.get_values(&range, &[("majorDimension", "COLUMNS")])?;
        Ok(into_cells(values.values).into_iter().next().unwrap_or_default())
    }

    fn read_all_rows(&mut self, table: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let values = self.get_values(&quote_sheet(table), &[("majorDimension", "ROWS")])?;
        Ok(into_cells(values.values))
    }
}
