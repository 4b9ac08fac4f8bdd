//! Tabular store abstraction.
//!
//! A store holds named tables, each a grid of string cells whose first row
//! is a header naming the sandwich types. Rows below the header are history,
//! oldest first; writes only ever append.
//!
//! Implementations:
//! - [`MemoryStore`] — in-memory tables for tests and fixtures
//! - [`SheetsStore`] — Google Sheets worksheets (`sheets` feature)
//!
//! Store calls are fail-fast: errors are returned as-is and never retried.

mod memory;
#[cfg(feature = "sheets")]
pub mod sheets;

pub use memory::{MemoryStore, SANDWICHES};
#[cfg(feature = "sheets")]
pub use sheets::SheetsStore;

/// Error returned by store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Credentials file missing or unusable.
    Credentials(String),
    /// Token exchange rejected.
    Auth(String),
    /// Network failure before a response was received.
    Transport(String),
    /// Remote API returned a non-success status.
    Api { status: u16, message: String },
    /// Spreadsheet, table or column does not exist.
    NotFound(String),
    /// Response body could not be decoded.
    Decode(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Credentials(msg) => write!(f, "credentials error: {}", msg),
            StoreError::Auth(msg) => write!(f, "authorization failed: {}", msg),
            StoreError::Transport(msg) => write!(f, "network error: {}", msg),
            StoreError::Api { status, message } => {
                write!(f, "store API error (HTTP {}): {}", status, message)
            }
            StoreError::NotFound(what) => write!(f, "not found: {}", what),
            StoreError::Decode(msg) => write!(f, "unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    /// Returns `true` if the error is about credentials or authorization.
    pub fn is_auth(&self) -> bool {
        matches!(self, StoreError::Credentials(_) | StoreError::Auth(_))
    }
}

/// Gateway to a remote tabular store keyed by table name.
///
/// Column indices are 1-based, matching spreadsheet conventions.
/// The trait is object-safe so the pipeline can hold `&mut dyn TabularStore`.
pub trait TabularStore {
    /// Appends one row to the end of `table`.
    fn append_row(&mut self, table: &str, row: &[i64]) -> Result<(), StoreError>;

    /// Returns the full column at `index`, header included.
    fn read_column(&mut self, table: &str, index: usize) -> Result<Vec<String>, StoreError>;

    /// Returns every row of `table`, header first.
    fn read_all_rows(&mut self, table: &str) -> Result<Vec<Vec<String>>, StoreError>;

    /// Returns up to the last `n` data cells of a column, header excluded.
    ///
    /// Fewer than `n` cells are returned when the table is shorter.
    fn read_last_n_of_column(
        &mut self,
        table: &str,
        index: usize,
        n: usize,
    ) -> Result<Vec<String>, StoreError> {
        let column = self.read_column(table, index)?;
        let data = column.get(1..).unwrap_or_default();
        let start = data.len().saturating_sub(n);
        Ok(data[start..].to_vec())
    }
}
