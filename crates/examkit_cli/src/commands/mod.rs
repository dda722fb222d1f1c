//! CLI command definitions.
//!
//! Each subcommand is a thin caller of `examkit_parser`: it reads input,
//! resolves the parse policy, and prints results.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::debug;

use examkit_parser::{ParsePolicy, QuestionReader};

pub mod check;
pub mod parse;
pub mod render;

/// examkit - raw question notation tools
#[derive(Parser)]
#[command(name = "examkit")]
#[command(version, about = "examkit - parse and check raw exam question text")]
#[command(long_about = r#"
examkit parses the raw question notation used to author exam content:

  # Capital of Indonesia?
  -- Bandung
  -- Jakarta
  @b

Options get ids a, b, c, ... in order; '@' names the correct one.
Optional [IMG:...] and [AUDIO:...] lines attach media.

COMMANDS:
  parse   → Parse a question (or a batch with --batch) into JSON
  check   → Report on every block of one or more question files
  render  → Turn question JSON back into raw text

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Parse or validation failure
  4 - I/O error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Parse policy file (.toml, .yaml or .yml)
    #[arg(short, long, global = true, env = "EXAMKIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse raw question text into JSON
    Parse(parse::ParseArgs),

    /// Check question files block by block
    Check(check::CheckArgs),

    /// Render question JSON back into raw text
    Render(render::RenderArgs),
}

/// Policy flags shared by every command; they override the config file.
#[derive(Args, Debug, Default)]
pub struct PolicyArgs {
    /// Reject lines that match no known prefix
    #[arg(long)]
    pub strict: bool,

    /// Minimum number of options per question
    #[arg(long, value_name = "N")]
    pub min_options: Option<usize>,

    /// Allow IMG and AUDIO in one question (the later line decides the type)
    #[arg(long)]
    pub allow_mixed_media: bool,
}

impl PolicyArgs {
    /// Build the effective policy from the config file and these flags.
    pub fn resolve(&self, config: Option<&Path>) -> Result<ParsePolicy> {
        let mut policy = match config {
            Some(path) => ParsePolicy::from_file(path)?,
            None => ParsePolicy::default(),
        };

        if self.strict {
            policy.strict = true;
        }
        if let Some(min) = self.min_options {
            policy.min_options = min;
        }
        if self.allow_mixed_media {
            policy.allow_mixed_media = true;
        }

        policy.validate()?;
        debug!("Effective parse policy: {:?}", policy);
        Ok(policy)
    }
}

/// Read command input from a file, or from stdin for `-` or no path.
pub async fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(QuestionReader::read_file(path)?),
        _ => {
            debug!("Reading input from stdin");
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("examkit.toml");
        fs::write(&path, "min_options = 3\nallow_mixed_media = true\n").unwrap();

        let args = PolicyArgs {
            strict: true,
            min_options: Some(2),
            allow_mixed_media: false,
        };
        let policy = args.resolve(Some(&path)).unwrap();

        assert!(policy.strict);
        assert_eq!(policy.min_options, 2);
        assert!(policy.allow_mixed_media);
    }

    #[test]
    fn test_defaults_without_config() {
        let policy = PolicyArgs::default().resolve(None).unwrap();
        assert_eq!(policy, ParsePolicy::default());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = PolicyArgs {
            min_options: Some(0),
            ..PolicyArgs::default()
        };
        assert!(args.resolve(None).is_err());
    }

    #[tokio::test]
    async fn test_read_input_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("q.txt");
        fs::write(&path, "# Q\n-- A\n@a").unwrap();

        let text = read_input(Some(&path)).await.unwrap();
        assert_eq!(text, "# Q\n-- A\n@a");
    }

    #[test]
    fn test_cli_parses_global_config() {
        let cli = Cli::parse_from(["examkit", "--config", "policy.yaml", "parse", "--batch", "bank.txt"]);
        assert_eq!(cli.config.as_deref(), Some(Path::new("policy.yaml")));
        assert!(matches!(cli.command, Commands::Parse(_)));
    }
}
