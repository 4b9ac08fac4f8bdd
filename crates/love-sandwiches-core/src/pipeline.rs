//! End-to-end bookkeeping run.
//!
//! ```text
//! collect sales ─► append "sales"
//!               ─► latest "stock" row ─► surplus ─► append "surplus"
//!               ─► last 5 sales per item ─► projection ─► append "stock"
//!               ─► "stock" headings + projection ─► StockReport
//! ```
//!
//! Steps run strictly in order. Writes are independent: if a later step
//! fails, rows already appended stay in the store.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::input::{CollectError, InputCollector};
use crate::metrics::{self, HISTORY_WINDOW, MetricsError};
use crate::model::{
    ITEM_COUNT, ProjectedStockRow, RowError, SalesHistoryColumns, SalesRecord, StockRow,
    SurplusRecord, Table, parse_column, parse_row,
};
use crate::report::StockReport;
use crate::store::{StoreError, TabularStore};

/// Error that aborts a run.
#[derive(Debug)]
pub enum PipelineError {
    /// No valid sales line was entered.
    Input(CollectError),
    /// A store call failed.
    Store(StoreError),
    /// Not enough history for a projection.
    Metrics(MetricsError),
    /// A table holds cells that are not item rows.
    Malformed { table: Table, error: RowError },
    /// A table has no data rows below its header.
    EmptyTable(Table),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Input(e) => write!(f, "{}", e),
            PipelineError::Store(e) => write!(f, "{}", e),
            PipelineError::Metrics(e) => write!(f, "{}", e),
            PipelineError::Malformed { table, error } => {
                write!(f, "malformed '{}' worksheet: {}", table, error)
            }
            PipelineError::EmptyTable(table) => {
                write!(f, "'{}' worksheet has no data rows", table)
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Input(e) => Some(e),
            PipelineError::Store(e) => Some(e),
            PipelineError::Metrics(e) => Some(e),
            PipelineError::Malformed { error, .. } => Some(error),
            PipelineError::EmptyTable(_) => None,
        }
    }
}

impl From<CollectError> for PipelineError {
    fn from(e: CollectError) -> Self {
        PipelineError::Input(e)
    }
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        PipelineError::Store(e)
    }
}

impl From<MetricsError> for PipelineError {
    fn from(e: MetricsError) -> Self {
        PipelineError::Metrics(e)
    }
}

/// Runs the bookkeeping steps against one store.
pub struct Pipeline<'a> {
    store: &'a mut dyn TabularStore,
}

impl<'a> Pipeline<'a> {
    pub fn new(store: &'a mut dyn TabularStore) -> Self {
        Self { store }
    }

    /// Collects sales from the operator and runs every step.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        collector: &mut InputCollector<R, W>,
    ) -> Result<StockReport, PipelineError> {
        let sales = collector.collect()?;
        self.run_with_sales(&sales)
    }

    /// Runs every step after collection with an already validated record.
    pub fn run_with_sales(&mut self, sales: &SalesRecord) -> Result<StockReport, PipelineError> {
        self.update_table(Table::Sales, sales)?;

        let surplus = self.calculate_surplus(sales)?;
        self.update_table(Table::Surplus, &surplus)?;

        let history = self.sales_history()?;
        info!("Calculating stock data");
        let projected = metrics::projected_stock(&history)?;
        self.update_table(Table::Stock, &projected)?;

        self.stock_report(&projected)
    }

    /// Appends a row to a table.
    pub fn update_table(&mut self, table: Table, row: &[i64]) -> Result<(), PipelineError> {
        info!("Updating {} worksheet", table);
        self.store.append_row(table.as_str(), row)?;
        info!("{} worksheet updated successfully", capitalize(table.as_str()));
        Ok(())
    }

    /// Latest row of the stock table.
    pub fn latest_stock(&mut self) -> Result<StockRow, PipelineError> {
        let rows = self.store.read_all_rows(Table::Stock.as_str())?;
        if rows.len() < 2 {
            return Err(PipelineError::EmptyTable(Table::Stock));
        }
        let last = &rows[rows.len() - 1];
        parse_row(last).map_err(|error| PipelineError::Malformed {
            table: Table::Stock,
            error,
        })
    }

    /// Surplus of the latest stock row against `sales`.
    pub fn calculate_surplus(&mut self, sales: &SalesRecord) -> Result<SurplusRecord, PipelineError> {
        info!("Calculating surplus data");
        let stock = self.latest_stock()?;
        let surplus = metrics::surplus(&stock, sales)?;
        debug!("stock={:?} sales={:?} surplus={:?}", stock, sales, surplus);
        Ok(surplus)
    }

    /// Last [`HISTORY_WINDOW`] sales of each item, column-major.
    pub fn sales_history(&mut self) -> Result<SalesHistoryColumns, PipelineError> {
        let mut history: SalesHistoryColumns = Default::default();
        for (i, column) in history.iter_mut().enumerate() {
            let index = i + 1;
            let cells = self
                .store
                .read_last_n_of_column(Table::Sales.as_str(), index, HISTORY_WINDOW)?;
            *column = parse_column(index, &cells).map_err(|error| PipelineError::Malformed {
                table: Table::Sales,
                error,
            })?;
        }
        Ok(history)
    }

    /// Sandwich names from the stock table header, in column order.
    pub fn stock_headings(&mut self) -> Result<Vec<String>, PipelineError> {
        let mut headings = Vec::with_capacity(ITEM_COUNT);
        for index in 1..=ITEM_COUNT {
            let column = self.store.read_column(Table::Stock.as_str(), index)?;
            let heading = column.into_iter().next().ok_or(PipelineError::Malformed {
                table: Table::Stock,
                error: RowError::WrongWidth(index - 1),
            })?;
            headings.push(heading);
        }
        Ok(headings)
    }

    /// Pairs the stock headings with a projection.
    pub fn stock_report(&mut self, projected: &ProjectedStockRow) -> Result<StockReport, PipelineError> {
        let headings = self.stock_headings()?;
        Ok(StockReport::new(headings.iter().map(String::as_str), projected))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
