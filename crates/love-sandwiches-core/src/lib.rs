//! love-sandwiches-core — sales bookkeeping for a sandwich stall.
//!
//! Provides:
//! - `model` — fixed-width item rows and table names
//! - `input` — sales line validation and the interactive collector
//! - `metrics` — surplus and projected stock arithmetic
//! - `store` — tabular store abstraction with in-memory backend
//! - `pipeline` — the end-to-end run over a store
//! - `report` — projected stock keyed by sandwich name
//!
//! With `sheets` feature (default):
//! - `store::sheets` — Google Sheets backend (service-account auth)
//! - `config` — spreadsheet and credentials configuration

pub mod input;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod store;

#[cfg(feature = "sheets")]
pub mod config;
