//! Parse command - Parse raw question text into JSON.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::info;

use examkit_parser::{parse_batch_with, parse_one_with};

use super::{read_input, PolicyArgs};

#[derive(Args)]
pub struct ParseArgs {
    /// Question file to parse ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Treat the input as a batch of '#'-delimited questions
    #[arg(short, long)]
    batch: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    policy: PolicyArgs,
}

pub async fn execute(args: ParseArgs, config: Option<&Path>) -> Result<()> {
    let policy = args.policy.resolve(config)?;
    let text = read_input(args.input.as_deref()).await?;

    let output = if args.batch {
        let blocks = parse_batch_with(&text, &policy)?;
        info!("Parsed {} questions", blocks.len());
        to_json(&blocks, args.pretty)?
    } else {
        let question = parse_one_with(&text, &policy)?;
        info!("Parsed question: {}", question.question_text);
        to_json(&question, args.pretty)?
    };

    println!("{}", output);
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use examkit_parser::parse_batch;

    #[test]
    fn test_batch_json_shape() {
        let blocks = parse_batch("# Q1\n-- A\n@a\n# Q2\n-- B\n@a").unwrap();
        let json: serde_json::Value = serde_json::from_str(&to_json(&blocks, false).unwrap()).unwrap();

        assert_eq!(json.as_array().map(|a| a.len()), Some(2));
        assert_eq!(json[1]["rawText"], "# Q2\n-- B\n@a");
        assert_eq!(json[1]["content"]["questionText"], "Q2");
        assert_eq!(json[1]["content"]["questionType"], "TEXT");
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let value = serde_json::json!({ "a": 1 });
        assert!(to_json(&value, true).unwrap().contains('\n'));
        assert!(!to_json(&value, false).unwrap().contains('\n'));
    }
}
