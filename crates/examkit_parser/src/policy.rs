//! Parse policy: the knobs callers choose per integration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ParseError, ParseResult};
use crate::models::MAX_OPTIONS;

/// Policy applied while parsing a question block.
///
/// The default is lenient about unrecognized lines, requires a single
/// option, and rejects questions carrying both an image and an audio
/// directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsePolicy {
    /// Reject lines that match no known prefix.
    pub strict: bool,
    /// Minimum number of options a question must have.
    pub min_options: usize,
    /// Allow IMG and AUDIO in one block; the later line decides the type.
    pub allow_mixed_media: bool,
}

impl Default for ParsePolicy {
    fn default() -> Self {
        Self {
            strict: false,
            min_options: 1,
            allow_mixed_media: false,
        }
    }
}

impl ParsePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lenient parsing compatible with content authored for the legacy
    /// importer: unknown lines ignored, mixed media resolved by line order.
    pub fn legacy() -> Self {
        Self {
            strict: false,
            min_options: 1,
            allow_mixed_media: true,
        }
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn with_min_options(mut self, min: usize) -> Self {
        self.min_options = min;
        self
    }

    pub fn allow_mixed_media(mut self) -> Self {
        self.allow_mixed_media = true;
        self
    }

    /// Check that the policy can be satisfied at all.
    pub fn validate(&self) -> ParseResult<()> {
        if self.min_options == 0 {
            return Err(ParseError::InvalidPolicy(
                "min_options must be at least 1".to_string(),
            ));
        }
        if self.min_options > MAX_OPTIONS {
            return Err(ParseError::InvalidPolicy(format!(
                "min_options must be at most {}",
                MAX_OPTIONS
            )));
        }
        Ok(())
    }

    /// Load a policy from a `.toml`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading parse policy from {:?}", path);

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let policy: ParsePolicy = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        policy.validate()?;
        Ok(policy)
    }
}
