//! Operator input: validation of a comma-separated sales line and the
//! prompt loop that keeps asking until the line is valid.

mod collector;
mod validate;

pub use collector::{CollectError, InputCollector};
pub use validate::{ValidationError, parse_sales, split_tokens, validate};
