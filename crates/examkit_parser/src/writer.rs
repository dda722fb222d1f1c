//! Raw text generation from structured questions.

use tracing::debug;

use crate::error::{ParseError, ParseResult};
use crate::models::{option_id_for, ParsedQuestion, QuestionType, MAX_OPTIONS};

/// Writer for the raw question notation.
pub struct QuestionWriter;

impl QuestionWriter {
    /// Render one question back into the notation.
    ///
    /// Option ids in the notation are positional, so the `@` line names the
    /// position of the correct option rather than its stored id. Parsing the
    /// output yields the same options in the same order with the same
    /// correct option, ids renumbered `a`, `b`, ...
    pub fn render(question: &ParsedQuestion) -> ParseResult<String> {
        let answer = Self::positional_answer(question)?;
        let mut lines = Vec::with_capacity(question.options.len() + 4);

        lines.push(format!("# {}", single_line(&question.question_text)));
        for option in &question.options {
            lines.push(format!("-- {}", single_line(&option.text)));
        }
        lines.push(format!("@{}", answer));

        let image = question.image_url.as_deref().map(|url| format!("[IMG:{}]", url));
        let audio = question.audio_url.as_deref().map(|url| format!("[AUDIO:{}]", url));

        // The later directive decides the type when both are present.
        let media = match question.question_type {
            QuestionType::Image => [audio, image],
            _ => [image, audio],
        };
        lines.extend(media.into_iter().flatten());

        Ok(lines.join("\n"))
    }

    /// Render several questions as one batch, blocks separated by a blank line.
    ///
    /// A question that cannot be rendered fails the batch, tagged with its
    /// 1-based position.
    pub fn render_batch(questions: &[ParsedQuestion]) -> ParseResult<String> {
        debug!("Rendering batch of {} questions", questions.len());

        let blocks = questions
            .iter()
            .enumerate()
            .map(|(i, question)| Self::render(question).map_err(|e| e.in_block(i + 1)))
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(blocks.join("\n\n"))
    }

    /// Id the parser will assign to the correct option.
    fn positional_answer(question: &ParsedQuestion) -> ParseResult<String> {
        let position = question
            .options
            .iter()
            .position(|o| o.id.eq_ignore_ascii_case(&question.correct_option_id))
            .ok_or_else(|| ParseError::UnknownCorrectAnswer {
                id: question.correct_option_id.clone(),
                available: question
                    .options
                    .iter()
                    .map(|o| o.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        option_id_for(position).ok_or(ParseError::TooManyOptions { max: MAX_OPTIONS })
    }
}

/// The notation is line oriented; embedded line breaks become spaces.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
