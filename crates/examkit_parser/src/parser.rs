//! Single-question parser for the raw text notation.
//!
//! A question block is a handful of prefixed lines:
//!
//! ```text
//! # Capital of Indonesia?
//! -- Bandung
//! -- Jakarta
//! @b
//! [IMG:data:image/png;base64,...]
//! ```
//!
//! Lines are trimmed and blank lines dropped. Each remaining line is
//! classified by prefix, in this order: `#` question text, `--` option,
//! `@` correct answer, `[IMG:` image, `[AUDIO:` audio. Option ids are
//! assigned `a`, `b`, `c`, ... by position.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::error::{ParseError, ParseResult};
use crate::models::{
    option_id_for, MediaKind, ParsedQuestion, QuestionOption, QuestionType, MAX_OPTIONS,
};
use crate::policy::ParsePolicy;

/// Parse one question block with the default policy.
pub fn parse_one(text: &str) -> ParseResult<ParsedQuestion> {
    parse_one_with(text, &ParsePolicy::default())
}

/// Parse one question block.
pub fn parse_one_with(text: &str, policy: &ParsePolicy) -> ParseResult<ParsedQuestion> {
    policy.validate()?;
    let text = normalize_input(text);
    if text.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut builder = QuestionBuilder::default();
    let mut seen_any = false;

    for (index, raw_line) in text.split('\n').enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        seen_any = true;
        builder.accept(index + 1, classify(line), policy)?;
    }

    if !seen_any {
        return Err(ParseError::EmptyInput);
    }

    let question = builder.finish(policy)?;
    debug!(
        "Parsed question with {} options, type {}",
        question.options.len(),
        question.question_type
    );
    Ok(question)
}

/// Drop a leading byte-order mark and rewrite `\r\n` and lone `\r` line
/// endings to `\n`.
pub(crate) fn normalize_input(text: &str) -> Cow<'_, str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    QuestionText(&'a str),
    Option(&'a str),
    CorrectAnswer(&'a str),
    Media {
        kind: MediaKind,
        reference: &'a str,
        terminated: bool,
    },
    Unrecognized(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix('#') {
        return Line::QuestionText(rest.trim());
    }
    if let Some(rest) = line.strip_prefix("--") {
        return Line::Option(rest.trim());
    }
    if let Some(rest) = line.strip_prefix('@') {
        return Line::CorrectAnswer(rest.trim());
    }
    for kind in [MediaKind::Image, MediaKind::Audio] {
        if let Some(rest) = line.strip_prefix(kind.prefix()) {
            return match rest.strip_suffix(']') {
                Some(reference) => Line::Media {
                    kind,
                    reference,
                    terminated: true,
                },
                None => Line::Media {
                    kind,
                    reference: rest,
                    terminated: false,
                },
            };
        }
    }
    Line::Unrecognized(line)
}

#[derive(Debug, Default)]
struct QuestionBuilder {
    question_text: Option<String>,
    options: Vec<QuestionOption>,
    correct_option_id: Option<String>,
    image_url: Option<String>,
    audio_url: Option<String>,
    question_type: QuestionType,
}

impl QuestionBuilder {
    fn accept(&mut self, line_no: usize, line: Line<'_>, policy: &ParsePolicy) -> ParseResult<()> {
        trace!("Line {}: {:?}", line_no, line);

        match line {
            Line::QuestionText(text) => {
                if self.question_text.is_some() {
                    return Err(ParseError::DuplicateQuestionText { line: line_no });
                }
                self.question_text = Some(text.to_string());
            }
            Line::Option(text) => {
                let id = option_id_for(self.options.len())
                    .ok_or(ParseError::TooManyOptions { max: MAX_OPTIONS })?;
                self.options.push(QuestionOption::new(id, text));
            }
            Line::CorrectAnswer(id) => {
                if self.correct_option_id.is_some() {
                    return Err(ParseError::DuplicateCorrectAnswer { line: line_no });
                }
                self.correct_option_id = Some(id.to_lowercase());
            }
            Line::Media {
                kind,
                reference,
                terminated,
            } => {
                if !terminated && policy.strict {
                    return Err(ParseError::UnterminatedDirective {
                        kind,
                        line: line_no,
                    });
                }
                self.set_media(line_no, kind, reference, policy)?;
            }
            Line::Unrecognized(content) => {
                if policy.strict {
                    return Err(ParseError::UnrecognizedLine {
                        line: line_no,
                        content: content.to_string(),
                    });
                }
                debug!("Ignoring unrecognized line {}: {}", line_no, content);
            }
        }

        Ok(())
    }

    fn set_media(
        &mut self,
        line_no: usize,
        kind: MediaKind,
        reference: &str,
        policy: &ParsePolicy,
    ) -> ParseResult<()> {
        let (slot, other) = match kind {
            MediaKind::Image => (&mut self.image_url, &self.audio_url),
            MediaKind::Audio => (&mut self.audio_url, &self.image_url),
        };

        if slot.is_some() {
            return Err(ParseError::DuplicateMediaDirective {
                kind,
                line: line_no,
            });
        }
        if other.is_some() && !policy.allow_mixed_media {
            return Err(ParseError::ConflictingMediaDirectives);
        }

        *slot = Some(reference.to_string());
        self.question_type = kind.question_type();
        Ok(())
    }

    fn finish(self, policy: &ParsePolicy) -> ParseResult<ParsedQuestion> {
        let question_text = match self.question_text {
            Some(text) if !text.is_empty() => text,
            _ => return Err(ParseError::MissingQuestionText),
        };

        if self.options.is_empty() {
            return Err(ParseError::MissingOptions);
        }
        if self.options.len() < policy.min_options {
            return Err(ParseError::TooFewOptions {
                found: self.options.len(),
                required: policy.min_options,
            });
        }

        let correct_option_id = match self.correct_option_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(ParseError::MissingCorrectAnswer),
        };

        if !self.options.iter().any(|o| o.id == correct_option_id) {
            let available = self
                .options
                .iter()
                .map(|o| o.id.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ParseError::UnknownCorrectAnswer {
                id: correct_option_id,
                available,
            });
        }

        Ok(ParsedQuestion {
            question_text,
            options: self.options,
            correct_option_id,
            image_url: self.image_url,
            audio_url: self.audio_url,
            question_type: self.question_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("# Q"), Line::QuestionText("Q"));
        assert_eq!(classify("#-- not an option"), Line::QuestionText("-- not an option"));
        assert_eq!(classify("--  Jakarta "), Line::Option("Jakarta"));
        assert_eq!(classify("@ B"), Line::CorrectAnswer("B"));
        assert_eq!(
            classify("[AUDIO:clip.mp3]"),
            Line::Media {
                kind: MediaKind::Audio,
                reference: "clip.mp3",
                terminated: true,
            }
        );
        assert_eq!(
            classify("[IMG:pic.png"),
            Line::Media {
                kind: MediaKind::Image,
                reference: "pic.png",
                terminated: false,
            }
        );
        assert_eq!(classify("note to self"), Line::Unrecognized("note to self"));
    }

    #[test]
    fn test_parse_text_question() {
        let question = parse_one("# Capital of Indonesia?\n-- Bandung\n-- Jakarta\n@b").unwrap();

        assert_eq!(question.question_text, "Capital of Indonesia?");
        assert_eq!(
            question.options,
            vec![
                QuestionOption::new("a", "Bandung"),
                QuestionOption::new("b", "Jakarta"),
            ]
        );
        assert_eq!(question.correct_option_id, "b");
        assert_eq!(question.image_url, None);
        assert_eq!(question.audio_url, None);
        assert_eq!(question.question_type, QuestionType::Text);
    }

    #[test]
    fn test_parse_image_question() {
        let question = parse_one(
            "[IMG:data:image/png;base64,AAA]\n# What symbol is this?\n-- Resistor\n-- Capacitor\n@a",
        )
        .unwrap();

        assert_eq!(question.question_type, QuestionType::Image);
        assert_eq!(question.image_url.as_deref(), Some("data:image/png;base64,AAA"));
    }

    #[test]
    fn test_correct_answer_is_lowercased() {
        let question = parse_one("# Q\n-- A\n-- B\n@B").unwrap();
        assert_eq!(question.correct_option_id, "b");
    }

    #[test]
    fn test_blank_lines_between_options_are_ignored() {
        let question = parse_one("# Q\n\n-- A\n   \n-- B\n\n-- C\n@c").unwrap();
        assert_eq!(question.option_ids(), vec!["a", "b", "c"]);
        assert_eq!(question.options[2].text, "C");
    }

    #[test]
    fn test_crlf_input() {
        let question = parse_one("# Q\r\n-- A\r\n-- B\r\n@a\r\n").unwrap();
        assert_eq!(question.options.len(), 2);
    }

    #[test]
    fn test_leading_byte_order_mark_is_dropped() {
        let question = parse_one("\u{feff}# Q1\r\n-- A\r\n@a").unwrap();
        assert_eq!(question.question_text, "Q1");
        assert_eq!(parse_one("\u{feff}"), Err(ParseError::EmptyInput));
        assert_eq!(normalize_input("\u{feff}# Q"), "# Q");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(parse_one(""), Err(ParseError::EmptyInput));
        assert_eq!(parse_one("  \n\t\n "), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_only_question_text() {
        assert_eq!(parse_one("# Lonely"), Err(ParseError::MissingOptions));
    }

    #[test]
    fn test_validation_order() {
        assert_eq!(parse_one("-- A\n@a"), Err(ParseError::MissingQuestionText));
        assert_eq!(parse_one("#   \n-- A\n@a"), Err(ParseError::MissingQuestionText));
        assert_eq!(parse_one("# Q\n-- A"), Err(ParseError::MissingCorrectAnswer));
        assert_eq!(parse_one("# Q\n-- A\n@"), Err(ParseError::MissingCorrectAnswer));
        assert_eq!(
            parse_one("# Q\n-- A\n-- B\n@d"),
            Err(ParseError::UnknownCorrectAnswer {
                id: "d".to_string(),
                available: "a, b".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_answer_message_names_the_id() {
        let err = parse_one("# Q\n-- A\n@z").unwrap_err();
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn test_duplicates_are_errors() {
        assert_eq!(
            parse_one("# Q1\n# Q2\n-- A\n@a"),
            Err(ParseError::DuplicateQuestionText { line: 2 })
        );
        assert_eq!(
            parse_one("# Q\n-- A\n@a\n\n@a"),
            Err(ParseError::DuplicateCorrectAnswer { line: 5 })
        );
        assert_eq!(
            parse_one("# Q\n[IMG:a.png]\n[IMG:b.png]\n-- A\n@a"),
            Err(ParseError::DuplicateMediaDirective {
                kind: MediaKind::Image,
                line: 3,
            })
        );
    }

    #[test]
    fn test_single_option_accepted_by_default() {
        let question = parse_one("# Q\n-- Only\n@a").unwrap();
        assert_eq!(question.options.len(), 1);
    }

    #[test]
    fn test_min_options_policy() {
        let policy = ParsePolicy::new().with_min_options(2);
        assert_eq!(
            parse_one_with("# Q\n-- Only\n@a", &policy),
            Err(ParseError::TooFewOptions {
                found: 1,
                required: 2,
            })
        );
        assert!(parse_one_with("# Q\n-- A\n-- B\n@a", &policy).is_ok());
    }

    #[test]
    fn test_too_many_options() {
        let mut text = String::from("# Q\n");
        for i in 0..27 {
            text.push_str(&format!("-- option {}\n", i));
        }
        text.push_str("@a");
        assert_eq!(
            parse_one(&text),
            Err(ParseError::TooManyOptions { max: 26 })
        );
    }

    #[test]
    fn test_unrecognized_lines() {
        let text = "# Q\nsome stray note\n-- A\n@a";
        assert!(parse_one(text).is_ok());

        let policy = ParsePolicy::new().strict();
        assert_eq!(
            parse_one_with(text, &policy),
            Err(ParseError::UnrecognizedLine {
                line: 2,
                content: "some stray note".to_string(),
            })
        );
    }

    #[test]
    fn test_unterminated_directive() {
        let text = "# Q\n[AUDIO:clip.mp3\n-- A\n@a";
        let question = parse_one(text).unwrap();
        assert_eq!(question.audio_url.as_deref(), Some("clip.mp3"));

        assert_eq!(
            parse_one_with(text, &ParsePolicy::new().strict()),
            Err(ParseError::UnterminatedDirective {
                kind: MediaKind::Audio,
                line: 2,
            })
        );
    }

    #[test]
    fn test_mixed_media() {
        let text = "# Q\n[AUDIO:clip.mp3]\n[IMG:pic.png]\n-- A\n@a";
        assert_eq!(parse_one(text), Err(ParseError::ConflictingMediaDirectives));

        let question = parse_one_with(text, &ParsePolicy::legacy()).unwrap();
        assert_eq!(question.question_type, QuestionType::Image);
        assert_eq!(question.audio_url.as_deref(), Some("clip.mp3"));
        assert_eq!(question.image_url.as_deref(), Some("pic.png"));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "# Q\n-- A\n-- B\n@b\n[AUDIO:x]";
        assert_eq!(parse_one(text), parse_one(text));
    }
}
