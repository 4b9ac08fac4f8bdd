//! Derived figures: surplus per market and projected stock for the next one.
//!
//! Projection rounds half up in exact integer arithmetic. `mean × 1.1` is
//! `sum × 11 / 50`, so the rounded value is `floor((22·sum + 50) / 100)`.
//! A mean of 15 projects to 16.5 and rounds to 17.
//!
//! All arithmetic is checked. A figure too large for `i64` is reported as
//! [`MetricsError::Overflow`] instead of wrapping into the store.

use crate::model::{
    ITEM_COUNT, ProjectedStockRow, SalesHistoryColumns, SalesRecord, StockRow, SurplusRecord,
};

/// Number of trailing markets averaged for the projection.
pub const HISTORY_WINDOW: usize = 5;

/// Error computing a projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// A column (1-based) has fewer than [`HISTORY_WINDOW`] values.
    InsufficientHistory { column: usize, available: usize },
    /// A figure in a column (1-based) does not fit in an `i64`.
    Overflow { column: usize },
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::InsufficientHistory { column, available } => write!(
                f,
                "sales column {} has {} entries, {} required for a projection",
                column, available, HISTORY_WINDOW
            ),
            MetricsError::Overflow { column } => {
                write!(f, "figures in column {} are too large to calculate with", column)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

/// Stock minus sales, per item.
pub fn surplus(stock: &StockRow, sales: &SalesRecord) -> Result<SurplusRecord, MetricsError> {
    let mut out = [0i64; ITEM_COUNT];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = stock[i]
            .checked_sub(sales[i])
            .ok_or(MetricsError::Overflow { column: i + 1 })?;
    }
    Ok(out)
}

/// Mean of the window padded by 10%, rounded half up.
fn project(window: &[i64]) -> Option<i64> {
    let sum = window.iter().try_fold(0i64, |acc, &v| acc.checked_add(v))?;
    let scaled = sum.checked_mul(22)?.checked_add(50)?;
    Some(scaled.div_euclid(100))
}

/// Projects next-market stock from the last [`HISTORY_WINDOW`] sales of each item.
///
/// Only the trailing window of each column is used.
pub fn projected_stock(history: &SalesHistoryColumns) -> Result<ProjectedStockRow, MetricsError> {
    let mut out = [0i64; ITEM_COUNT];
    for (i, column) in history.iter().enumerate() {
        if column.len() < HISTORY_WINDOW {
            return Err(MetricsError::InsufficientHistory {
                column: i + 1,
                available: column.len(),
            });
        }
        out[i] = project(&column[column.len() - HISTORY_WINDOW..])
            .ok_or(MetricsError::Overflow { column: i + 1 })?;
    }
    Ok(out)
}
