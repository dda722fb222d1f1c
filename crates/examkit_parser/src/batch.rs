//! Batch splitting: many question blocks in one text.
//!
//! Blocks are delimited by lines starting with `#`. Parsing a batch is
//! all-or-nothing; [`parse_batch_partial`] is the per-block alternative for
//! callers that report on every block instead of aborting at the first.

use serde::Serialize;
use tracing::debug;

use crate::error::{ParseError, ParseResult};
use crate::models::{ParsedBlock, ParsedQuestion};
use crate::parser::{normalize_input, parse_one_with};
use crate::policy::ParsePolicy;

const BLOCK_DELIMITER: &str = "\n#";

/// Split a batch into question blocks without parsing them.
///
/// A leading byte-order mark is dropped, line endings are normalized and
/// the text trimmed before splitting on
/// `"\n#"`. The `#` consumed by the split is restored on every block, and
/// prepended to a leading fragment that lacks one. Blocks are trimmed and
/// empty ones dropped.
pub fn split_blocks(text: &str) -> Vec<String> {
    let normalized = normalize_input(text);
    let normalized = normalized.trim();

    normalized
        .split(BLOCK_DELIMITER)
        .enumerate()
        .map(|(i, fragment)| {
            if i == 0 && (fragment.starts_with('#') || fragment.trim().is_empty()) {
                fragment.trim().to_string()
            } else {
                format!("#{}", fragment).trim().to_string()
            }
        })
        .filter(|block| !block.is_empty())
        .collect()
}

/// Parse a batch with the default policy.
pub fn parse_batch(text: &str) -> ParseResult<Vec<ParsedBlock>> {
    parse_batch_with(text, &ParsePolicy::default())
}

/// Parse every block of a batch, failing on the first bad block.
///
/// Errors from a block are wrapped in [`ParseError::BlockParse`] carrying
/// the 1-based block index. No partial result is returned.
pub fn parse_batch_with(text: &str, policy: &ParsePolicy) -> ParseResult<Vec<ParsedBlock>> {
    policy.validate()?;
    if normalize_input(text).trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let blocks = split_blocks(text);
    if blocks.is_empty() {
        return parse_whole(text, policy)
            .map(|block| vec![block])
            .map_err(|cause| ParseError::NoValidBlocks {
                cause: Box::new(cause),
            });
    }

    debug!("Split batch into {} blocks", blocks.len());

    let mut parsed = Vec::with_capacity(blocks.len());
    for (i, raw_text) in blocks.into_iter().enumerate() {
        let index = i + 1;
        let content = parse_block(index, &raw_text, policy)?;
        parsed.push(ParsedBlock { content, raw_text });
    }

    Ok(parsed)
}

/// Outcome of one block in a partial batch parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutcome {
    /// 1-based position of the block in the batch.
    pub index: usize,
    pub raw_text: String,
    pub result: ParseResult<ParsedQuestion>,
}

impl BlockOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Convert to a parsed block, tagging a failure with the block index.
    pub fn into_block(self) -> ParseResult<ParsedBlock> {
        let index = self.index;
        match self.result {
            Ok(content) => Ok(ParsedBlock {
                content,
                raw_text: self.raw_text,
            }),
            Err(e @ ParseError::MalformedBlock { .. }) => Err(e),
            Err(e) => Err(e.in_block(index)),
        }
    }
}

/// Parse every block of a batch, keeping going past failures.
///
/// Only an empty input or an invalid policy fails the call as a whole.
pub fn parse_batch_partial(text: &str, policy: &ParsePolicy) -> ParseResult<Vec<BlockOutcome>> {
    policy.validate()?;
    if normalize_input(text).trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let blocks = split_blocks(text);
    if blocks.is_empty() {
        let normalized = normalize_input(text);
        let raw_text = normalized.trim().to_string();
        let result = parse_one_with(&raw_text, policy);
        return Ok(vec![BlockOutcome {
            index: 1,
            raw_text,
            result,
        }]);
    }

    let outcomes: Vec<BlockOutcome> = blocks
        .into_iter()
        .enumerate()
        .map(|(i, raw_text)| {
            let index = i + 1;
            let result = if raw_text.starts_with('#') {
                parse_one_with(&raw_text, policy)
            } else {
                Err(ParseError::MalformedBlock { index })
            };
            BlockOutcome {
                index,
                raw_text,
                result,
            }
        })
        .collect();

    debug!(
        "Partial batch parse: {}/{} blocks parsed",
        outcomes.iter().filter(|o| o.is_ok()).count(),
        outcomes.len()
    );

    Ok(outcomes)
}

/// Counts over a partial batch parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub parsed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[BlockOutcome]) -> Self {
        let parsed = outcomes.iter().filter(|o| o.is_ok()).count();
        Self {
            total: outcomes.len(),
            parsed,
            failed: outcomes.len() - parsed,
        }
    }

    pub fn merge(&mut self, other: BatchSummary) {
        self.total += other.total;
        self.parsed += other.parsed;
        self.failed += other.failed;
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

fn parse_block(index: usize, raw_text: &str, policy: &ParsePolicy) -> ParseResult<ParsedQuestion> {
    if !raw_text.starts_with('#') {
        return Err(ParseError::MalformedBlock { index });
    }
    parse_one_with(raw_text, policy).map_err(|e| e.in_block(index))
}

fn parse_whole(text: &str, policy: &ParsePolicy) -> ParseResult<ParsedBlock> {
    let normalized = normalize_input(text);
    let raw_text = normalized.trim().to_string();
    let content = parse_one_with(&raw_text, policy)?;
    Ok(ParsedBlock { content, raw_text })
}
