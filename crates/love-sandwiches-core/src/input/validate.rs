//! Sales line validation.
//!
//! A valid line is exactly [`ITEM_COUNT`] non-negative base-10 integers
//! separated by commas, e.g. `10,20,30,40,50,60`. Surrounding whitespace on a
//! token is tolerated; a blank token is not.
//!
//! Defects are reported in a fixed order: any non-numeric token first, then
//! any negative token, then the count.

use crate::model::{ITEM_COUNT, SalesRecord};

/// Defect found in a sales line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A token does not parse as an integer. Reported before the count check.
    NonNumericToken(String),
    /// A token is an integer below zero.
    NegativeToken(String),
    /// All tokens parse, but there are not exactly [`ITEM_COUNT`] of them.
    WrongCount(usize),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NonNumericToken(token) => {
                write!(f, "'{}' is not a whole number", token)
            }
            ValidationError::NegativeToken(token) => {
                write!(f, "'{}' is negative, sales cannot be below 0", token)
            }
            ValidationError::WrongCount(n) => write!(
                f,
                "Exactly {} values required. You provided {}",
                ITEM_COUNT, n
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

fn parse_token(token: &str) -> Result<i64, ValidationError> {
    token
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NonNumericToken(token.to_string()))
}

/// Splits a raw line into comma-separated tokens.
pub fn split_tokens(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

/// Checks that `tokens` are exactly [`ITEM_COUNT`] non-negative integers.
pub fn validate(tokens: &[&str]) -> Result<(), ValidationError> {
    let values = tokens
        .iter()
        .map(|token| parse_token(token))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some((token, _)) = tokens.iter().zip(&values).find(|(_, v)| **v < 0) {
        return Err(ValidationError::NegativeToken(token.to_string()));
    }

    if tokens.len() != ITEM_COUNT {
        return Err(ValidationError::WrongCount(tokens.len()));
    }

    Ok(())
}

/// Validates a raw line and converts it into a [`SalesRecord`], preserving order.
pub fn parse_sales(line: &str) -> Result<SalesRecord, ValidationError> {
    let tokens = split_tokens(line);
    validate(&tokens)?;

    let mut record = [0i64; ITEM_COUNT];
    for (slot, token) in record.iter_mut().zip(&tokens) {
        *slot = parse_token(token)?;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_six_integers() {
        assert_eq!(validate(&["10", "20", "30", "40", "50", "60"]), Ok(()));
    }

    #[test]
    fn test_wrong_count() {
        assert_eq!(
            validate(&["10", "20", "30"]),
            Err(ValidationError::WrongCount(3))
        );
        assert_eq!(
            validate(&["1", "2", "3", "4", "5", "6", "7"]),
            Err(ValidationError::WrongCount(7))
        );
    }

    #[test]
    fn test_non_numeric_token() {
        assert_eq!(
            validate(&["10", "abc", "30", "4", "5", "6"]),
            Err(ValidationError::NonNumericToken("abc".to_string()))
        );
    }

    #[test]
    fn test_non_numeric_wins_over_count() {
        assert!(matches!(
            validate(&["10", "abc"]),
            Err(ValidationError::NonNumericToken(_))
        ));
        assert!(matches!(
            validate(&["1", "2", "3", "4", "5", "6", "x", "8"]),
            Err(ValidationError::NonNumericToken(_))
        ));
    }

    #[test]
    fn test_decimals_and_blanks_rejected() {
        assert!(matches!(
            validate(&["1.5", "2", "3", "4", "5", "6"]),
            Err(ValidationError::NonNumericToken(_))
        ));
        assert!(matches!(
            validate(&["1", "  ", "3", "4", "5", "6"]),
            Err(ValidationError::NonNumericToken(_))
        ));
        // Empty line splits into a single empty token.
        assert!(matches!(
            parse_sales(""),
            Err(ValidationError::NonNumericToken(_))
        ));
        // Trailing comma leaves an empty last token.
        assert!(matches!(
            parse_sales("1,2,3,4,5,6,"),
            Err(ValidationError::NonNumericToken(_))
        ));
    }

    #[test]
    fn test_parse_sales_preserves_order() {
        assert_eq!(
            parse_sales("10,20,30,5,15,25").unwrap(),
            [10, 20, 30, 5, 15, 25]
        );
        assert_eq!(
            parse_sales(" 1, 2 ,3,4 ,5,  6").unwrap(),
            [1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn test_negative_values_rejected() {
        assert_eq!(
            parse_sales("-1,0,1,2,3,4"),
            Err(ValidationError::NegativeToken("-1".to_string()))
        );
        assert_eq!(
            validate(&["1", "2", " -3"]),
            Err(ValidationError::NegativeToken(" -3".to_string()))
        );
        assert_eq!(parse_sales("-0,0,1,2,3,4").unwrap(), [0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_non_numeric_wins_over_negative() {
        assert_eq!(
            validate(&["-1", "abc", "3", "4", "5", "6"]),
            Err(ValidationError::NonNumericToken("abc".to_string()))
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::WrongCount(3).to_string(),
            "Exactly 6 values required. You provided 3"
        );
        assert_eq!(
            ValidationError::NonNumericToken("abc".into()).to_string(),
            "'abc' is not a whole number"
        );
        assert_eq!(
            ValidationError::NegativeToken("-4".into()).to_string(),
            "'-4' is negative, sales cannot be below 0"
        );
    }
}
