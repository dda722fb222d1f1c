//! Data models for parsed questions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest number of options a question can carry; ids are single letters.
pub const MAX_OPTIONS: usize = 26;

/// Id assigned to the option at `index` (`0 -> "a"`, `1 -> "b"`, ...).
pub fn option_id_for(index: usize) -> Option<String> {
    if index >= MAX_OPTIONS {
        return None;
    }
    Some(char::from(b'a' + index as u8).to_string())
}

/// How a question is presented.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    #[default]
    Text,
    Image,
    Audio,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Text => write!(f, "TEXT"),
            QuestionType::Image => write!(f, "IMAGE"),
            QuestionType::Audio => write!(f, "AUDIO"),
        }
    }
}

/// The two media directives of the notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    /// Line prefix that opens the directive.
    pub fn prefix(&self) -> &'static str {
        match self {
            MediaKind::Image => "[IMG:",
            MediaKind::Audio => "[AUDIO:",
        }
    }

    /// The question type a directive of this kind produces.
    pub fn question_type(&self) -> QuestionType {
        match self {
            MediaKind::Image => QuestionType::Image,
            MediaKind::Audio => QuestionType::Audio,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "IMG"),
            MediaKind::Audio => write!(f, "AUDIO"),
        }
    }
}

/// A single answer option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
}

impl QuestionOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// The structured result of parsing one question block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuestion {
    pub question_text: String,
    pub options: Vec<QuestionOption>,
    pub correct_option_id: String,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub question_type: QuestionType,
}

impl ParsedQuestion {
    /// Ids of all options, in order.
    pub fn option_ids(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.id.as_str()).collect()
    }

    /// The option the correct answer points at.
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == self.correct_option_id)
    }

    /// Reference of the attached media, if any.
    pub fn media(&self) -> Option<(MediaKind, &str)> {
        match self.question_type {
            QuestionType::Image => self.image_url.as_deref().map(|u| (MediaKind::Image, u)),
            QuestionType::Audio => self.audio_url.as_deref().map(|u| (MediaKind::Audio, u)),
            QuestionType::Text => None,
        }
    }
}

/// A parsed question together with the verbatim text of its source block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedBlock {
    pub content: ParsedQuestion,
    pub raw_text: String,
}
