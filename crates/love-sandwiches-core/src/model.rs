//! Item rows shared by every table.
//!
//! All three tables carry one column per sandwich type, in the same fixed
//! order. Rows are fixed-size arrays so a mismatched width can only enter
//! through [`parse_row`], which rejects it.

/// Number of sandwich types tracked per row.
pub const ITEM_COUNT: usize = 6;

/// One integer per sandwich type, positionally aligned across tables.
pub type ItemRow = [i64; ITEM_COUNT];

/// Units sold at one market.
pub type SalesRecord = ItemRow;

/// Units made for one market.
pub type StockRow = ItemRow;

/// Stock minus sales. Positive is waste, negative means extra was made.
pub type SurplusRecord = ItemRow;

/// Recommended production for the next market.
pub type ProjectedStockRow = ItemRow;

/// Trailing sales per sandwich type, column-major.
pub type SalesHistoryColumns = [Vec<i64>; ITEM_COUNT];

/// Named tables in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Sales,
    Surplus,
    Stock,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Sales, Table::Surplus, Table::Stock];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Sales => "sales",
            Table::Surplus => "surplus",
            Table::Stock => "stock",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error converting store cells into integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// Row does not have exactly [`ITEM_COUNT`] cells.
    WrongWidth(usize),
    /// Cell at `column` (1-based) is not an integer.
    NotANumber { column: usize, value: String },
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowError::WrongWidth(n) => {
                write!(f, "expected {} cells, found {}", ITEM_COUNT, n)
            }
            RowError::NotANumber { column, value } => {
                write!(f, "column {} holds '{}', not an integer", column, value)
            }
        }
    }
}

impl std::error::Error for RowError {}

fn parse_cell(column: usize, value: &str) -> Result<i64, RowError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| RowError::NotANumber {
            column,
            value: value.to_string(),
        })
}

/// Converts one row of store cells into an [`ItemRow`].
pub fn parse_row(cells: &[String]) -> Result<ItemRow, RowError> {
    if cells.len() != ITEM_COUNT {
        return Err(RowError::WrongWidth(cells.len()));
    }

    let mut row = [0i64; ITEM_COUNT];
    for (i, cell) in cells.iter().enumerate() {
        row[i] = parse_cell(i + 1, cell)?;
    }
    Ok(row)
}

/// Converts a slice of cells from a single column into integers.
///
/// `column` is only used for error reporting.
pub fn parse_column(column: usize, cells: &[String]) -> Result<Vec<i64>, RowError> {
    cells.iter().map(|c| parse_cell(column, c)).collect()
}
