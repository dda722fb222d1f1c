//! Error types for the parser crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::MediaKind;

/// Result type alias for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while parsing the raw question notation.
///
/// Messages are shown to end users verbatim, so they name the offending
/// line, id, or block wherever one exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Input text is empty")]
    EmptyInput,

    #[error("Line {line}: duplicate question text, a question may only have one '#' line")]
    DuplicateQuestionText { line: usize },

    #[error("Line {line}: duplicate correct answer, a question may only have one '@' line")]
    DuplicateCorrectAnswer { line: usize },

    #[error("Line {line}: duplicate {kind} directive, a question may only have one")]
    DuplicateMediaDirective { kind: MediaKind, line: usize },

    #[error("A question cannot have both an IMG and an AUDIO directive")]
    ConflictingMediaDirectives,

    #[error("Line {line}: unrecognized line '{content}'")]
    UnrecognizedLine { line: usize, content: String },

    #[error("Line {line}: {kind} directive is missing its closing ']'")]
    UnterminatedDirective { kind: MediaKind, line: usize },

    #[error("Question text (#) not found")]
    MissingQuestionText,

    #[error("No options (--) found")]
    MissingOptions,

    #[error("Too few options: found {found}, at least {required} required")]
    TooFewOptions { found: usize, required: usize },

    #[error("Too many options: at most {max} are supported")]
    TooManyOptions { max: usize },

    #[error("Correct answer (@) not found")]
    MissingCorrectAnswer,

    #[error("Correct answer '{id}' does not match any option (available: {available})")]
    UnknownCorrectAnswer { id: String, available: String },

    #[error("No valid question blocks found: {cause}")]
    NoValidBlocks { cause: Box<ParseError> },

    #[error("Block {index} does not start with '#'")]
    MalformedBlock { index: usize },

    #[error("Block {index}: {source}")]
    BlockParse {
        index: usize,
        #[source]
        source: Box<ParseError>,
    },

    #[error("Invalid parse policy: {0}")]
    InvalidPolicy(String),
}

impl ParseError {
    /// Tag an error with the 1-based index of the batch block it came from.
    pub fn in_block(self, index: usize) -> Self {
        ParseError::BlockParse {
            index,
            source: Box::new(self),
        }
    }

    /// The 1-based block index, if this error is attributed to a block.
    pub fn block_index(&self) -> Option<usize> {
        match self {
            ParseError::BlockParse { index, .. } | ParseError::MalformedBlock { index } => {
                Some(*index)
            }
            _ => None,
        }
    }

    /// The innermost single-question error, stripping block attribution.
    pub fn root_cause(&self) -> &ParseError {
        match self {
            ParseError::BlockParse { source, .. } => source.root_cause(),
            ParseError::NoValidBlocks { cause } => cause.root_cause(),
            other => other,
        }
    }
}

/// Errors loading a parse policy from a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported config format: {0} (expected .toml, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] ParseError),
}

/// Errors reading question files from disk.
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Question source not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Errors validating an image or audio reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("{kind} reference is empty")]
    Empty { kind: MediaKind },

    #[error("{kind} reference must be an http(s) URL or a base64 data URI, got '{preview}'")]
    UnsupportedReference { kind: MediaKind, preview: String },

    #[error("{kind} data URI has mime type '{mime}', expected {expected}/*")]
    MimeMismatch {
        kind: MediaKind,
        mime: String,
        expected: &'static str,
    },

    #[error("{kind} data URI payload is not valid base64")]
    InvalidBase64 { kind: MediaKind },
}
