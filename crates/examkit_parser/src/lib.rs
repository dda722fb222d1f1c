//! # examkit_parser
//!
//! Parser for the raw question notation used to author exam content.
//!
//! A question is written as a block of prefixed lines:
//!
//! ```text
//! # Capital of Indonesia?
//! -- Bandung
//! -- Jakarta
//! @b
//! ```
//!
//! ## Features
//!
//! - **Single questions**: [`parse_one`] turns one block into a [`ParsedQuestion`]
//! - **Batches**: [`parse_batch`] splits on `#` lines and parses every block,
//!   all-or-nothing; [`parse_batch_partial`] reports per block instead
//! - **Policy**: [`ParsePolicy`] selects strict mode, the minimum option
//!   count and how mixed media directives are handled
//! - **Writing**: [`QuestionWriter`] regenerates the notation from a question
//! - **Media**: [`MediaValidator`] checks image and audio references
//!
//! ## Example
//!
//! ```rust
//! use examkit_parser::{parse_batch, parse_one, QuestionType};
//!
//! let question = parse_one("# Capital of Indonesia?\n-- Bandung\n-- Jakarta\n@b").unwrap();
//! assert_eq!(question.correct_option_id, "b");
//! assert_eq!(question.question_type, QuestionType::Text);
//!
//! let blocks = parse_batch("# Q1\n-- A\n@a\n# Q2\n-- B\n@a").unwrap();
//! assert_eq!(blocks.len(), 2);
//! ```

pub mod batch;
pub mod error;
pub mod media;
pub mod models;
pub mod parser;
pub mod policy;
pub mod reader;
pub mod writer;

pub use batch::{
    parse_batch, parse_batch_partial, parse_batch_with, split_blocks, BatchSummary, BlockOutcome,
};
pub use error::{ConfigError, MediaError, ParseError, ParseResult, ReaderError};
pub use media::MediaValidator;
pub use models::*;
pub use parser::{parse_one, parse_one_with};
pub use policy::ParsePolicy;
pub use reader::QuestionReader;
pub use writer::QuestionWriter;
