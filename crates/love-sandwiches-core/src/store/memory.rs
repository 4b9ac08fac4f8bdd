//! In-memory tabular store for testing the pipeline without a network.

use std::collections::HashMap;

use super::{StoreError, TabularStore};
use crate::model::Table;

/// Sandwich types in column order, as used by [`MemoryStore::sandwich_shop`].
pub const SANDWICHES: [&str; 6] = ["cheese", "ham", "egg", "chicken", "tuna", "turkey"];

/// In-memory store.
///
/// Tables must be added before they can be appended to, mirroring a
/// spreadsheet where worksheets are created up front.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<Vec<String>>>,
}

impl MemoryStore {
    /// Creates an empty store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a table with a header row and integer data rows.
    pub fn add_table(&mut self, name: &str, header: &[&str], rows: &[&[i64]]) {
        let mut grid = Vec::with_capacity(rows.len() + 1);
        grid.push(header.iter().map(|h| h.to_string()).collect());
        for row in rows {
            grid.push(row.iter().map(|v| v.to_string()).collect());
        }
        self.tables.insert(name.to_string(), grid);
    }

    /// Adds a table from raw cells, for malformed-data scenarios.
    pub fn add_raw_table(&mut self, name: &str, cells: Vec<Vec<String>>) {
        self.tables.insert(name.to_string(), cells);
    }

    /// Returns the raw grid of a table, header first.
    pub fn table(&self, name: &str) -> Option<&[Vec<String>]> {
        self.tables.get(name).map(|t| t.as_slice())
    }

    /// Returns the last row of a table, if any.
    pub fn last_row(&self, name: &str) -> Option<&[String]> {
        self.tables.get(name)?.last().map(|r| r.as_slice())
    }

    /// A shop with five markets of sales history and a current stock row.
    pub fn sandwich_shop() -> Self {
        let mut store = Self::new();
        store.add_table(
            Table::Sales.as_str(),
            &SANDWICHES,
            &[
                &[20, 25, 30, 35, 40, 45],
                &[10, 20, 30, 40, 50, 60],
                &[12, 18, 24, 30, 36, 42],
                &[15, 15, 15, 15, 15, 15],
                &[8, 22, 26, 31, 44, 50],
            ],
        );
        store.add_table(
            Table::Surplus.as_str(),
            &SANDWICHES,
            &[&[2, -1, 4, 0, -3, 5]],
        );
        store.add_table(
            Table::Stock.as_str(),
            &SANDWICHES,
            &[&[20, 20, 20, 20, 20, 20]],
        );
        store
    }

    fn grid(&self, table: &str) -> Result<&Vec<Vec<String>>, StoreError> {
        self.tables
            .get(table)
            .ok_or_else(|| StoreError::NotFound(format!("worksheet '{}'", table)))
    }
}

impl TabularStore for MemoryStore {
    fn append_row(&mut self, table: &str, row: &[i64]) -> Result<(), StoreError> {
        let grid = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::NotFound(format!("worksheet '{}'", table)))?;
        grid.push(row.iter().map(|v| v.to_string()).collect());
        Ok(())
    }

    fn read_column(&mut self, table: &str, index: usize) -> Result<Vec<String>, StoreError> {
        if index == 0 {
            return Err(StoreError::NotFound(format!("column 0 of '{}'", table)));
        }
        // Short rows read as blank cells; trailing blanks are dropped like
        // a spreadsheet's column-major read does.
        let mut column: Vec<String> = self
            .grid(table)?
            .iter()
            .map(|row| row.get(index - 1).cloned().unwrap_or_default())
            .collect();
        while column.last().is_some_and(|cell| cell.is_empty()) {
            column.pop();
        }
        Ok(column)
    }

    fn read_all_rows(&mut self, table: &str) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.grid(table)?.clone())
    }
}
