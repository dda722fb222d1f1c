//! Validation of image and audio references.
//!
//! The parser passes `[IMG:...]` and `[AUDIO:...]` payloads through
//! untouched. Callers that store media run them through [`MediaValidator`]
//! first: a reference must be an `http(s)` URL or a base64 data URI whose
//! mime type matches the directive.

use regex::Regex;

use crate::error::MediaError;
use crate::models::{MediaKind, ParsedQuestion};

const PREVIEW_LEN: usize = 32;

/// Validator for media references.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    url: Regex,
    data_uri: Regex,
    base64: Regex,
}

impl Default for MediaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaValidator {
    pub fn new() -> Self {
        Self {
            url: Regex::new(r"^https?://\S+$").unwrap(),
            data_uri: Regex::new(
                r"^data:(?P<type>[a-z]+)/(?P<subtype>[A-Za-z0-9.+-]+)(?:;[A-Za-z0-9-]+=[^;,]+)*;base64,(?P<payload>.*)$",
            )
            .unwrap(),
            base64: Regex::new(
                r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$",
            )
            .unwrap(),
        }
    }

    pub fn validate_image(&self, reference: &str) -> Result<(), MediaError> {
        self.validate(MediaKind::Image, reference)
    }

    pub fn validate_audio(&self, reference: &str) -> Result<(), MediaError> {
        self.validate(MediaKind::Audio, reference)
    }

    /// Validate every media reference a question carries.
    pub fn validate_question(&self, question: &ParsedQuestion) -> Result<(), MediaError> {
        if let Some(url) = question.image_url.as_deref() {
            self.validate_image(url)?;
        }
        if let Some(url) = question.audio_url.as_deref() {
            self.validate_audio(url)?;
        }
        Ok(())
    }

    pub fn validate(&self, kind: MediaKind, reference: &str) -> Result<(), MediaError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(MediaError::Empty { kind });
        }
        if self.url.is_match(reference) {
            return Ok(());
        }

        let caps = self
            .data_uri
            .captures(reference)
            .ok_or_else(|| MediaError::UnsupportedReference {
                kind,
                preview: preview(reference),
            })?;

        let expected = match kind {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
        };
        if &caps["type"] != expected {
            return Err(MediaError::MimeMismatch {
                kind,
                mime: format!("{}/{}", &caps["type"], &caps["subtype"]),
                expected,
            });
        }

        let payload = &caps["payload"];
        if payload.is_empty() || !self.base64.is_match(payload) {
            return Err(MediaError::InvalidBase64 { kind });
        }

        Ok(())
    }
}

fn preview(reference: &str) -> String {
    if reference.chars().count() > PREVIEW_LEN {
        reference.chars().take(PREVIEW_LEN).collect::<String>() + "..."
    } else {
        reference.to_string()
    }
}
