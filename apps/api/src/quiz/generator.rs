//! Question generation: one text-service call producing the twelve scenario questions.
//!
//! The model's output is decoded strictly. Category tags are never taken from the
//! model; slot `i` always gets `ASSIGNMENT[i]`, so each category gets two questions.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, LlmError, TextGenerator};
use crate::quiz::category::{Category, ASSIGNMENT, QUESTION_COUNT};
use crate::quiz::prompts::QUESTION_PROMPT_TEMPLATE;

pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub category: Category,
    pub text: String,
    pub options: [String; OPTIONS_PER_QUESTION],
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text service call failed: {0}")]
    Service(#[from] LlmError),

    #[error("text service did not respond within {0:?}")]
    Timeout(Duration),

    #[error("response is not a JSON array: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("expected {expected} questions, got {got}")]
    WrongCount { expected: usize, got: usize },

    #[error("question {slot} is invalid: {reason}")]
    InvalidQuestion { slot: usize, reason: String },
}

impl GenerationError {
    /// Stable machine-readable code for clients and logs.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::Service(_) => "SERVICE_ERROR",
            GenerationError::Timeout(_) => "TIMEOUT",
            GenerationError::Malformed(_) => "MALFORMED_RESPONSE",
            GenerationError::WrongCount { .. } => "WRONG_QUESTION_COUNT",
            GenerationError::InvalidQuestion { .. } => "INVALID_QUESTION",
        }
    }
}

/// One item as the model returns it. Extra keys are ignored.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
}

pub fn build_question_prompt() -> String {
    let assignments: String = ASSIGNMENT
        .iter()
        .enumerate()
        .map(|(i, category)| format!("{}. {}: {}\n", i + 1, category, category.intent()))
        .collect();

    QUESTION_PROMPT_TEMPLATE
        .replace("{count}", &QUESTION_COUNT.to_string())
        .replace("{assignments}", &assignments)
}

/// Calls the text service once and returns twelve tagged questions in model order.
pub async fn generate_all_questions(
    generator: &dyn TextGenerator,
    timeout: Duration,
) -> Result<Vec<Question>, GenerationError> {
    let prompt = build_question_prompt();

    let raw = tokio::time::timeout(timeout, generator.generate(&prompt, JSON_ONLY_SYSTEM))
        .await
        .map_err(|_| GenerationError::Timeout(timeout))??;

    let questions = parse_questions(&raw)?;
    info!("Generated {} questions", questions.len());
    Ok(questions)
}

/// Strict decode of the model's raw text into tagged questions.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>, GenerationError> {
    let items: Vec<serde_json::Value> =
        serde_json::from_str(strip_json_fences(raw)).map_err(GenerationError::Malformed)?;

    if items.len() != QUESTION_COUNT {
        return Err(GenerationError::WrongCount {
            expected: QUESTION_COUNT,
            got: items.len(),
        });
    }

    items
        .into_iter()
        .zip(ASSIGNMENT)
        .enumerate()
        .map(|(i, (item, category))| tag_question(i + 1, category, item))
        .collect()
}

fn tag_question(
    slot: usize,
    category: Category,
    item: serde_json::Value,
) -> Result<Question, GenerationError> {
    let invalid = |reason: String| GenerationError::InvalidQuestion { slot, reason };

    let raw: RawQuestion = serde_json::from_value(item).map_err(|e| invalid(e.to_string()))?;

    let text = raw.question.trim().to_string();
    if text.is_empty() {
        return Err(invalid("question text is empty".to_string()));
    }

    let got = raw.options.len();
    let options: [String; OPTIONS_PER_QUESTION] = raw
        .options
        .try_into()
        .map_err(|_| invalid(format!("expected {OPTIONS_PER_QUESTION} options, got {got}")))?;

    if options.iter().any(|o| o.trim().is_empty()) {
        return Err(invalid("an option is empty".to_string()));
    }

    Ok(Question {
        category,
        text,
        options,
    })
}
