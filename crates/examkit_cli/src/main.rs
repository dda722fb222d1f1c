//! examkit CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Parse or validation failure
//! - 4: I/O error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use examkit_parser::{ConfigError, ParseError, ReaderError};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const IO_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "examkit=debug"
    } else if cli.quiet {
        "examkit=error"
    } else {
        "examkit=info"
    };

    // Logs go to stderr; stdout carries command output.
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{},warn", default_directive))),
        )
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Parse(args) => commands::parse::execute(args, config).await,
        Commands::Check(args) => commands::check::execute(args, config).await,
        Commands::Render(args) => commands::render::execute(args, config).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            // Parser messages are shown exactly as produced.
            match e.downcast_ref::<ParseError>() {
                Some(parse_error) => eprintln!("❌ Error: {}", parse_error),
                None => eprintln!("❌ Error: {:#}", e),
            }
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(parse_error) = e.downcast_ref::<ParseError>() {
        return match parse_error {
            ParseError::InvalidPolicy(_) => ExitCodes::INVALID_ARGS,
            _ => ExitCodes::VALIDATION_FAILURE,
        };
    }
    if e.downcast_ref::<ConfigError>().is_some() {
        return ExitCodes::INVALID_ARGS;
    }
    if e.downcast_ref::<ReaderError>().is_some() || e.downcast_ref::<std::io::Error>().is_some() {
        return ExitCodes::IO_ERROR;
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("validation") {
        ExitCodes::VALIDATION_FAILURE
    } else if msg.contains("argument") || msg.contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_parse_errors() {
        let err = anyhow::Error::new(ParseError::MissingOptions.in_block(3));
        assert_eq!(categorize_error(&err), ExitCodes::VALIDATION_FAILURE);

        let err = anyhow::Error::new(ParseError::InvalidPolicy("min_options".to_string()));
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn test_categorize_io_and_fallback() {
        let err = anyhow::Error::new(ReaderError::NotFound("bank".into()));
        assert_eq!(categorize_error(&err), ExitCodes::IO_ERROR);

        let err = anyhow::anyhow!("Validation failed: 2 blocks failed");
        assert_eq!(categorize_error(&err), ExitCodes::VALIDATION_FAILURE);

        let err = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }
}
