//! Render command - Turn question JSON back into raw text.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use tracing::info;

use examkit_parser::{parse_batch_with, ParsedBlock, ParsedQuestion, QuestionWriter};

use super::{read_input, PolicyArgs};

#[derive(Args)]
pub struct RenderArgs {
    /// JSON file with one question or a list ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    #[command(flatten)]
    policy: PolicyArgs,
}

/// Accepted JSON shapes: a question, a list of questions, or the output of
/// `parse --batch`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RenderInput {
    Question(ParsedQuestion),
    Questions(Vec<ParsedQuestion>),
    Blocks(Vec<ParsedBlock>),
}

impl RenderInput {
    fn into_questions(self) -> Vec<ParsedQuestion> {
        match self {
            RenderInput::Question(question) => vec![question],
            RenderInput::Questions(questions) => questions,
            RenderInput::Blocks(blocks) => blocks.into_iter().map(|b| b.content).collect(),
        }
    }
}

pub async fn execute(args: RenderArgs, config: Option<&Path>) -> Result<()> {
    let policy = args.policy.resolve(config)?;
    let json = read_input(args.input.as_deref()).await?;

    let input: RenderInput =
        serde_json::from_str(&json).context("Input is not question JSON")?;
    let questions = input.into_questions();
    if questions.is_empty() {
        anyhow::bail!("No questions to render");
    }

    let text = QuestionWriter::render_batch(&questions)?;

    // Edited JSON may no longer describe a valid question.
    let reparsed = parse_batch_with(&text, &policy)?;
    check_answers_preserved(&questions, &reparsed)?;
    info!("Rendered {} questions", reparsed.len());

    println!("{}", text);
    Ok(())
}

/// Every re-parsed block must keep the correct answer text of its source.
fn check_answers_preserved(questions: &[ParsedQuestion], reparsed: &[ParsedBlock]) -> Result<()> {
    if questions.len() != reparsed.len() {
        anyhow::bail!(
            "Rendered text parsed into {} questions, expected {}",
            reparsed.len(),
            questions.len()
        );
    }

    for (i, (question, block)) in questions.iter().zip(reparsed).enumerate() {
        let expected = question.correct_option().map(|o| o.text.as_str());
        let actual = block.content.correct_option().map(|o| o.text.as_str());
        if expected != actual {
            anyhow::bail!(
                "Correct answer changed for question {}: {:?} became {:?}",
                i + 1,
                expected.unwrap_or_default(),
                actual.unwrap_or_default()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_single_question() {
        let json = r#"{
            "questionText": "Capital of Indonesia?",
            "options": [{"id": "a", "text": "Bandung"}, {"id": "b", "text": "Jakarta"}],
            "correctOptionId": "b",
            "imageUrl": null,
            "audioUrl": null,
            "questionType": "TEXT"
        }"#;

        let questions = serde_json::from_str::<RenderInput>(json)
            .unwrap()
            .into_questions();
        assert_eq!(questions.len(), 1);
        assert_eq!(
            QuestionWriter::render(&questions[0]).unwrap(),
            "# Capital of Indonesia?\n-- Bandung\n-- Jakarta\n@b"
        );
    }

    #[test]
    fn test_accepts_parse_batch_output() {
        let blocks = examkit_parser::parse_batch("# Q1\n-- A\n@a\n# Q2\n-- B\n@a").unwrap();
        let json = serde_json::to_string(&blocks).unwrap();

        let questions = serde_json::from_str::<RenderInput>(&json)
            .unwrap()
            .into_questions();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].question_text, "Q2");
    }

    #[test]
    fn test_reordered_options_keep_answer() {
        let json = r#"{
            "questionText": "Capital of Indonesia?",
            "options": [{"id": "b", "text": "Jakarta"}, {"id": "a", "text": "Bandung"}],
            "correctOptionId": "b",
            "imageUrl": null,
            "audioUrl": null,
            "questionType": "TEXT"
        }"#;

        let questions = serde_json::from_str::<RenderInput>(json)
            .unwrap()
            .into_questions();
        let text = QuestionWriter::render_batch(&questions).unwrap();
        let reparsed = examkit_parser::parse_batch(&text).unwrap();

        assert!(check_answers_preserved(&questions, &reparsed).is_ok());
        assert_eq!(reparsed[0].content.correct_option().unwrap().text, "Jakarta");
    }

    #[test]
    fn test_changed_answer_is_reported() {
        let questions = vec![examkit_parser::parse_one("# Q\n-- A\n-- B\n@b").unwrap()];
        let reparsed = examkit_parser::parse_batch("# Q\n-- A\n-- B\n@a").unwrap();

        let err = check_answers_preserved(&questions, &reparsed).unwrap_err();
        assert!(err.to_string().contains("question 1"));
    }

    #[test]
    fn test_rejects_unrelated_json() {
        assert!(serde_json::from_str::<RenderInput>(r#"{"name": "quiz"}"#).is_err());
    }
}
