//! Spreadsheet connection settings.
//!
//! Read from environment variables, overridable from the command line:
//! - `LOVE_SANDWICHES_CREDS` — service-account key file (default: `creds.json`)
//! - `LOVE_SANDWICHES_SHEET_ID` — spreadsheet ID; takes precedence over the title
//! - `LOVE_SANDWICHES_SHEET` — spreadsheet title (default: `love_sandwiches`)

use std::path::PathBuf;

pub const ENV_CREDENTIALS: &str = "LOVE_SANDWICHES_CREDS";
pub const ENV_SHEET_ID: &str = "LOVE_SANDWICHES_SHEET_ID";
pub const ENV_SHEET_TITLE: &str = "LOVE_SANDWICHES_SHEET";

pub const DEFAULT_CREDENTIALS_PATH: &str = "creds.json";
pub const DEFAULT_SPREADSHEET_TITLE: &str = "love_sandwiches";

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// How the spreadsheet is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetRef {
    /// Spreadsheet ID from its URL.
    Id(String),
    /// Title, resolved through a Drive search.
    Title(String),
}

impl std::fmt::Display for SpreadsheetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadsheetRef::Id(id) => write!(f, "id {}", id),
            SpreadsheetRef::Title(title) => write!(f, "'{}'", title),
        }
    }
}

/// Connection settings for the Google Sheets store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub credentials_path: PathBuf,
    pub spreadsheet: SpreadsheetRef,
    pub sheets_api_base: String,
    pub drive_api_base: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_CREDENTIALS_PATH,
            SpreadsheetRef::Title(DEFAULT_SPREADSHEET_TITLE.to_string()),
        )
    }
}

impl SheetsConfig {
    pub fn new(credentials_path: impl Into<PathBuf>, spreadsheet: SpreadsheetRef) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            spreadsheet,
            sheets_api_base: SHEETS_API_BASE.to_string(),
            drive_api_base: DRIVE_API_BASE.to_string(),
        }
    }

    /// Builds settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let credentials_path =
            get(ENV_CREDENTIALS).unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.to_string());

        let spreadsheet = match get(ENV_SHEET_ID) {
            Some(id) => SpreadsheetRef::Id(id),
            None => SpreadsheetRef::Title(
                get(ENV_SHEET_TITLE).unwrap_or_else(|| DEFAULT_SPREADSHEET_TITLE.to_string()),
            ),
        };

        Self::new(credentials_path, spreadsheet)
    }

    /// Overrides the API endpoints, e.g. to point at a local stub.
    pub fn with_api_bases(mut self, sheets: impl Into<String>, drive: impl Into<String>) -> Self {
        self.sheets_api_base = sheets.into();
        self.drive_api_base = drive.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SheetsConfig::from_lookup(lookup(&[]));
        assert_eq!(config, SheetsConfig::default());
        assert_eq!(config.credentials_path, PathBuf::from("creds.json"));
        assert_eq!(
            config.spreadsheet,
            SpreadsheetRef::Title("love_sandwiches".to_string())
        );
        assert_eq!(config.sheets_api_base, SHEETS_API_BASE);
    }

    #[test]
    fn test_id_wins_over_title() {
        let config = SheetsConfig::from_lookup(lookup(&[
            (ENV_SHEET_ID, "1AbC"),
            (ENV_SHEET_TITLE, "other"),
            (ENV_CREDENTIALS, "/etc/shop/key.json"),
        ]));
        assert_eq!(config.spreadsheet, SpreadsheetRef::Id("1AbC".to_string()));
        assert_eq!(config.credentials_path, PathBuf::from("/etc/shop/key.json"));
    }

    #[test]
    fn test_empty_values_ignored() {
        let config = SheetsConfig::from_lookup(lookup(&[(ENV_SHEET_ID, " "), (ENV_SHEET_TITLE, "market")]));
        assert_eq!(config.spreadsheet, SpreadsheetRef::Title("market".to_string()));
    }

    #[test]
    fn test_with_api_bases() {
        let config = SheetsConfig::default().with_api_bases("http://127.0.0.1:1/v4", "http://127.0.0.1:1/drive");
        assert_eq!(config.sheets_api_base, "http://127.0.0.1:1/v4");
        assert_eq!(config.drive_api_base, "http://127.0.0.1:1/drive");
    }
}
