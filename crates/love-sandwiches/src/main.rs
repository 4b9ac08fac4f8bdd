//! love-sandwiches - Sales bookkeeping for a sandwich stall.
//!
//! Records one market's sales in the spreadsheet, works out surplus against
//! current stock and plans the next market's production.
//!
//! Usage:
//!   love-sandwiches                          # interactive prompt
//!   love-sandwiches --sales 10,20,30,40,50,60
//!   love-sandwiches --spreadsheet-id 1AbC... --creds ./key.json
//!   love-sandwiches --json                   # print the plan as JSON

use std::io::{self, BufRead, Cursor, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

use love_sandwiches_core::config::{SheetsConfig, SpreadsheetRef};
use love_sandwiches_core::input::InputCollector;
use love_sandwiches_core::pipeline::{Pipeline, PipelineError};
use love_sandwiches_core::report::StockReport;
use love_sandwiches_core::store::{SheetsStore, StoreError};

/// Sales bookkeeping for a sandwich stall.
#[derive(Parser)]
#[command(name = "love-sandwiches", about = "Sandwich sales bookkeeping", version)]
struct Args {
    /// Service-account key file.
    /// Default: $LOVE_SANDWICHES_CREDS or ./creds.json
    #[arg(long, value_name = "PATH")]
    creds: Option<PathBuf>,

    /// Spreadsheet ID. Takes precedence over --spreadsheet.
    #[arg(long, value_name = "ID", env = "LOVE_SANDWICHES_SHEET_ID")]
    spreadsheet_id: Option<String>,

    /// Spreadsheet title, looked up in Drive.
    /// Default: $LOVE_SANDWICHES_SHEET or love_sandwiches
    #[arg(long, value_name = "TITLE")]
    spreadsheet: Option<String>,

    /// Sales figures as six comma-separated numbers.
    /// Skips the interactive prompt; invalid input fails the run.
    #[arg(long, value_name = "CSV")]
    sales: Option<String>,

    /// Print the production plan as JSON.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber on stderr with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["love_sandwiches", "love_sandwiches_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Prints a credentials hint to stderr with ANSI colors.
fn print_credentials_warning(error: &str) {
    const RED: &str = "\x1b[1;31m";
    const YELLOW: &str = "\x1b[33m";
    const RESET: &str = "\x1b[0m";

    eprintln!("{RED}Spreadsheet: {error}{RESET}");
    eprintln!();
    eprintln!("{YELLOW}  Provide a service-account key and share the spreadsheet with it:");
    eprintln!("    export LOVE_SANDWICHES_CREDS=/path/to/creds.json");
    eprintln!("    export LOVE_SANDWICHES_SHEET=love_sandwiches");
    eprintln!("  or pass --creds / --spreadsheet / --spreadsheet-id.{RESET}");
}

fn build_config(args: &Args) -> SheetsConfig {
    let mut config = SheetsConfig::from_env();
    if let Some(ref path) = args.creds {
        config.credentials_path = path.clone();
    }
    if let Some(ref id) = args.spreadsheet_id {
        config.spreadsheet = SpreadsheetRef::Id(id.clone());
    } else if let Some(ref title) = args.spreadsheet {
        config.spreadsheet = SpreadsheetRef::Title(title.clone());
    }
    config
}

fn run_pipeline<R: BufRead, W: Write>(
    store: &mut SheetsStore,
    mut collector: InputCollector<R, W>,
) -> Result<StockReport, PipelineError> {
    Pipeline::new(store).run(&mut collector)
}

fn report_store_error(e: &StoreError) {
    error!("{}", e);
    if e.is_auth() {
        print_credentials_warning(&e.to_string());
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if !args.json {
        println!("Welcome to Love Sandwiches data automation!\n");
    }

    let config = build_config(&args);
    info!(
        "Config: spreadsheet={}, creds={}",
        config.spreadsheet,
        config.credentials_path.display()
    );

    let mut store = match SheetsStore::connect(&config) {
        Ok(store) => store,
        Err(e) => {
            report_store_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let result = match args.sales {
        Some(ref line) => {
            // Prompt echo goes to stderr so stdout carries only the report.
            debug!("Using sales from command line");
            let input = Cursor::new(format!("{}\n", line));
            run_pipeline(&mut store, InputCollector::new(input, io::stderr()).with_max_attempts(1))
        }
        None => run_pipeline(&mut store, InputCollector::new(io::stdin().lock(), io::stdout())),
    };

    let report = match result {
        Ok(report) => report,
        Err(PipelineError::Store(e)) => {
            report_store_error(&e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to render report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", report);
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "love-sandwiches",
            "--sales",
            "1,2,3,4,5,6",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.sales.as_deref(), Some("1,2,3,4,5,6"));
        assert!(args.json);
        assert_eq!(args.verbose, 2);
        assert!(!args.quiet);
    }

    #[test]
    fn test_build_config_overrides() {
        let args = Args::try_parse_from([
            "love-sandwiches",
            "--creds",
            "/tmp/key.json",
            "--spreadsheet-id",
            "1AbC",
            "--spreadsheet",
            "ignored",
        ])
        .unwrap();
        let config = build_config(&args);
        assert_eq!(config.credentials_path, PathBuf::from("/tmp/key.json"));
        assert_eq!(config.spreadsheet, SpreadsheetRef::Id("1AbC".to_string()));
    }

    #[test]
    fn test_build_config_title() {
        let args = Args {
            spreadsheet_id: None,
            ..Args::try_parse_from(["love-sandwiches", "--spreadsheet", "market_day"]).unwrap()
        };
        assert_eq!(
            build_config(&args).spreadsheet,
            SpreadsheetRef::Title("market_day".to_string())
        );
    }
}
