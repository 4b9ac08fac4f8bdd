//! Projected stock keyed by sandwich name.

use serde::Serialize;

/// One sandwich type and how many to make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockEntry {
    pub item: String,
    pub quantity: i64,
}

/// Production plan for the next market, in stock-table column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StockReport {
    pub entries: Vec<StockEntry>,
}

impl StockReport {
    /// Pairs headings with quantities positionally.
    ///
    /// Extra elements on either side are dropped.
    pub fn new<'a>(headings: impl IntoIterator<Item = &'a str>, quantities: &[i64]) -> Self {
        let entries = headings
            .into_iter()
            .zip(quantities)
            .map(|(item, &quantity)| StockEntry {
                item: item.to_string(),
                quantity,
            })
            .collect();
        Self { entries }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for StockReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Make the following numbers of sandwiches for next market:")?;
        writeln!(f)?;

        let width = self.entries.iter().map(|e| e.item.len()).max().unwrap_or(0);
        for entry in &self.entries {
            let label = format!("{}:", entry.item);
            writeln!(f, "  {:<width$}  {:>4}", label, entry.quantity, width = width + 1)?;
        }
        Ok(())
    }
}
