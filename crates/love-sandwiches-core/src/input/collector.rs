//! Interactive sales prompt.

use std::io::{BufRead, Write};

use tracing::debug;

use super::validate::parse_sales;
use crate::model::SalesRecord;

const PROMPT_LINES: [&str; 3] = [
    "Please enter sales data from the last market.",
    "Sales should be six numbers, separated by commas.",
    "Example: 10,20,30,40,50,60",
];

const INPUT_PROMPT: &str = "Enter your data here: ";

/// Error returned when no valid sales line could be collected.
#[derive(Debug)]
pub enum CollectError {
    /// Input reached end-of-file before a valid line was entered.
    InputClosed,
    /// The attempt limit was reached without a valid line.
    AttemptsExhausted(usize),
    /// Reading input or writing the prompt failed.
    Io(std::io::Error),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::InputClosed => write!(f, "input closed before valid sales data"),
            CollectError::AttemptsExhausted(n) => {
                write!(f, "no valid sales data after {} attempt(s)", n)
            }
            CollectError::Io(e) => write!(f, "console I/O error: {}", e),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}

enum CollectState {
    AwaitingInput,
    Validated(SalesRecord),
}

/// Prompts for a sales line until a valid one is entered.
///
/// Generic over the reader and writer so tests can feed canned lines
/// through a `Cursor` instead of a terminal.
pub struct InputCollector<R: BufRead, W: Write> {
    input: R,
    output: W,
    max_attempts: Option<usize>,
}

impl<R: BufRead, W: Write> InputCollector<R, W> {
    /// Creates a collector with no attempt limit.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: None,
        }
    }

    /// Stops after `attempts` invalid lines instead of looping forever.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Consumes the collector, returning the output writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the prompt loop and returns the first valid record.
    pub fn collect(&mut self) -> Result<SalesRecord, CollectError> {
        let mut state = CollectState::AwaitingInput;
        let mut attempts = 0usize;

        loop {
            match state {
                CollectState::Validated(record) => {
                    writeln!(self.output, "Data is valid!")?;
                    self.output.flush()?;
                    return Ok(record);
                }
                CollectState::AwaitingInput => {
                    if let Some(max) = self.max_attempts
                        && attempts >= max
                    {
                        return Err(CollectError::AttemptsExhausted(max));
                    }
                    attempts += 1;

                    let line = self.prompt()?;
                    match parse_sales(&line) {
                        Ok(record) => state = CollectState::Validated(record),
                        Err(e) => {
                            debug!("Rejected sales input {:?}: {}", line, e);
                            writeln!(self.output, "Invalid data: {}, please try again.\n", e)?;
                        }
                    }
                }
            }
        }
    }

    fn prompt(&mut self) -> Result<String, CollectError> {
        for line in PROMPT_LINES {
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output)?;
        write!(self.output, "{}", INPUT_PROMPT)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CollectError::InputClosed);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collector(input: &str) -> InputCollector<Cursor<Vec<u8>>, Vec<u8>> {
        InputCollector::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output_of(c: InputCollector<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(c.into_output()).unwrap()
    }

    #[test]
    fn test_collect_first_line_valid() {
        let mut c = collector("10,20,30,40,50,60\n");
        assert_eq!(c.collect().unwrap(), [10, 20, 30, 40, 50, 60]);

        let out = output_of(c);
        assert!(out.contains("Please enter sales data from the last market."));
        assert!(out.contains("Enter your data here: "));
        assert!(out.contains("Data is valid!"));
        assert!(!out.contains("Invalid data"));
    }

    #[test]
    fn test_collect_retries_until_valid() {
        let mut c = collector("10,20,30\n10,abc,30,4,5,6\n1,2,3,4,5,6\n");
        assert_eq!(c.collect().unwrap(), [1, 2, 3, 4, 5, 6]);

        let out = output_of(c);
        assert!(out.contains("Invalid data: Exactly 6 values required. You provided 3"));
        assert!(out.contains("Invalid data: 'abc' is not a whole number"));
        assert_eq!(out.matches("Enter your data here: ").count(), 3);
    }

    #[test]
    fn test_collect_handles_crlf_and_missing_newline() {
        let mut c = collector("1,2,3,4,5,6\r\n");
        assert_eq!(c.collect().unwrap(), [1, 2, 3, 4, 5, 6]);

        let mut c = collector("6,5,4,3,2,1");
        assert_eq!(c.collect().unwrap(), [6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_collect_input_closed() {
        let mut c = collector("nope\n");
        assert!(matches!(c.collect(), Err(CollectError::InputClosed)));

        let mut c = collector("");
        assert!(matches!(c.collect(), Err(CollectError::InputClosed)));
    }

    #[test]
    fn test_collect_attempt_limit() {
        let mut c = collector("1\n2\n3\n1,2,3,4,5,6\n").with_max_attempts(2);
        assert!(matches!(c.collect(), Err(CollectError::AttemptsExhausted(2))));

        let mut c = collector("1\n1,2,3,4,5,6\n").with_max_attempts(2);
        assert_eq!(c.collect().unwrap(), [1, 2, 3, 4, 5, 6]);
    }
}
