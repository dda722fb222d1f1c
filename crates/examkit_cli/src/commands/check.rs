//! Check command - Report on every block of one or more question files.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use examkit_parser::{
    parse_batch_partial, BatchSummary, BlockOutcome, MediaValidator, ParsePolicy, QuestionReader,
    QuestionType,
};

const PREVIEW_LEN: usize = 60;

#[derive(Args)]
pub struct CheckArgs {
    /// Question files or directories to check
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Also validate image and audio references
    #[arg(long)]
    validate_media: bool,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    policy: super::PolicyArgs,
}

/// Report over every checked file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub generated_at: DateTime<Utc>,
    pub policy: ParsePolicy,
    pub summary: BatchSummary,
    pub files: Vec<FileReport>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.summary.is_clean() && self.files.iter().all(|f| f.error.is_none())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: String,
    pub summary: BatchSummary,
    pub blocks: Vec<BlockReport>,
    /// Set when the file as a whole could not be checked.
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockReport {
    pub index: usize,
    pub ok: bool,
    pub preview: String,
    pub question_type: Option<QuestionType>,
    pub error: Option<String>,
}

pub async fn execute(args: CheckArgs, config: Option<&Path>) -> Result<()> {
    let policy = args.policy.resolve(config)?;
    let validator = args.validate_media.then(MediaValidator::new);

    let mut files = Vec::new();
    for path in &args.paths {
        files.extend(QuestionReader::collect_files(path)?);
    }
    info!("Checking {} question files", files.len());

    let mut report = CheckReport {
        generated_at: Utc::now(),
        policy: policy.clone(),
        summary: BatchSummary::default(),
        files: Vec::new(),
    };

    for file in &files {
        let file_report = check_file(file, &policy, validator.as_ref());
        report.summary.merge(file_report.summary);
        report.files.push(file_report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.passed() {
        anyhow::bail!(
            "Validation failed: {} of {} blocks failed",
            report.summary.failed,
            report.summary.total
        );
    }

    Ok(())
}

fn check_file(path: &Path, policy: &ParsePolicy, validator: Option<&MediaValidator>) -> FileReport {
    let display = path.display().to_string();

    let outcomes = QuestionReader::read_file(path)
        .map_err(|e| e.to_string())
        .and_then(|text| parse_batch_partial(&text, policy).map_err(|e| e.to_string()));

    match outcomes {
        Ok(outcomes) => {
            let blocks: Vec<BlockReport> = outcomes
                .iter()
                .map(|outcome| block_report(outcome, validator))
                .collect();
            let parsed = blocks.iter().filter(|b| b.ok).count();
            FileReport {
                path: display,
                summary: BatchSummary {
                    total: blocks.len(),
                    parsed,
                    failed: blocks.len() - parsed,
                },
                blocks,
                error: None,
            }
        }
        Err(error) => {
            warn!("Could not check {}: {}", path.display(), error);
            FileReport {
                path: display,
                summary: BatchSummary::default(),
                blocks: Vec::new(),
                error: Some(error),
            }
        }
    }
}

fn block_report(outcome: &BlockOutcome, validator: Option<&MediaValidator>) -> BlockReport {
    let preview = preview(&outcome.raw_text);

    let checked = match (&outcome.result, validator) {
        (Ok(question), Some(validator)) => validator
            .validate_question(question)
            .map(|()| question.question_type)
            .map_err(|e| e.to_string()),
        (Ok(question), None) => Ok(question.question_type),
        (Err(e), _) => Err(e.to_string()),
    };

    match checked {
        Ok(question_type) => BlockReport {
            index: outcome.index,
            ok: true,
            preview,
            question_type: Some(question_type),
            error: None,
        },
        Err(error) => BlockReport {
            index: outcome.index,
            ok: false,
            preview,
            question_type: None,
            error: Some(error),
        },
    }
}

/// First line of a block, shortened for display.
fn preview(raw_text: &str) -> String {
    let first = raw_text.lines().next().unwrap_or_default().trim();
    if first.chars().count() > PREVIEW_LEN {
        first.chars().take(PREVIEW_LEN).collect::<String>() + "..."
    } else {
        first.to_string()
    }
}

fn print_report(report: &CheckReport) {
    for file in &report.files {
        println!("📄 {}", file.path);

        if let Some(error) = &file.error {
            println!("   ❌ {}", error);
            continue;
        }

        for block in &file.blocks {
            match &block.error {
                None => println!("   ✅ Block {}: {}", block.index, block.preview),
                Some(error) => println!("   ❌ Block {}: {}", block.index, error),
            }
        }
    }

    println!();
    if report.passed() {
        println!(
            "✅ All {} questions parsed in {} files",
            report.summary.total,
            report.files.len()
        );
    } else {
        println!(
            "❌ {} of {} blocks failed. Please fix the issues above.",
            report.summary.failed, report.summary.total
        );
    }
}
