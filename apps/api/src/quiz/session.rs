//! Per-session quiz state: which question is current and what has been scored so far.
//!
//! States: EMPTY (no questions) → READY (index in 0..12) → EXHAUSTED (index == 12).
//! A new start returns any state to EMPTY. Rejected submissions never touch state.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::llm_client::TextGenerator;
use crate::quiz::category::{Category, QUESTION_COUNT};
use crate::quiz::generator::{
    generate_all_questions, GenerationError, Question, OPTIONS_PER_QUESTION,
};
use crate::quiz::ranking::{rank, RankedResult};
use crate::quiz::scores::{points_for_option, Scores};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("unknown RIASEC category '{0}'")]
    UnknownCategory(String),

    #[error("option {0} is out of range (expected 0..=3)")]
    OptionOutOfRange(i64),

    #[error("questions are not ready; start the quiz first")]
    NotReady,

    #[error("all questions have already been answered")]
    Exhausted,
}

/// Why the last generation attempt left the session not ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationFailure {
    pub code: &'static str,
    pub message: String,
}

impl From<&GenerationError> for GenerationFailure {
    fn from(err: &GenerationError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// What `GET /question` shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CurrentQuestion {
    Loading {
        loading: bool,
    },
    Done {
        done: bool,
    },
    Question {
        riasec: Category,
        question: String,
        options: [String; OPTIONS_PER_QUESTION],
        step: usize,
        total: usize,
    },
}

/// Outcome of a start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartOutcome {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GenerationFailure>,
}

#[derive(Debug)]
pub struct QuizSession {
    current_index: usize,
    scores: Scores,
    questions: Vec<Question>,
    ready: bool,
    last_error: Option<GenerationFailure>,
    /// Bumped on every start; a generation result is applied only if it still matches.
    epoch: u64,
    touched_at: Instant,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            current_index: 0,
            scores: Scores::default(),
            questions: Vec::new(),
            ready: false,
            last_error: None,
            epoch: 0,
            touched_at: Instant::now(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn last_error(&self) -> Option<&GenerationFailure> {
        self.last_error.as_ref()
    }

    pub fn touch(&mut self) {
        self.touched_at = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.touched_at.elapsed()
    }

    /// Clears progress and questions and returns the epoch the next generation must match.
    pub fn begin_generation(&mut self) -> u64 {
        self.current_index = 0;
        self.scores = Scores::default();
        self.questions.clear();
        self.ready = false;
        self.last_error = None;
        self.epoch += 1;
        self.touch();
        self.epoch
    }

    /// Applies a generation result. Returns false if a newer start superseded it.
    pub fn finish_generation(
        &mut self,
        epoch: u64,
        result: Result<Vec<Question>, GenerationError>,
    ) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match result {
            Ok(questions) => {
                self.questions = questions;
                self.ready = true;
            }
            Err(err) => {
                warn!("Question generation failed: {err}");
                self.last_error = Some(GenerationFailure::from(&err));
            }
        }
        self.touch();
        true
    }

    pub fn outcome(&self) -> StartOutcome {
        StartOutcome {
            ready: self.ready,
            error: self.last_error.clone(),
        }
    }

    pub fn current_question(&self) -> CurrentQuestion {
        if !self.ready {
            return CurrentQuestion::Loading { loading: true };
        }
        match self.questions.get(self.current_index) {
            Some(question) => CurrentQuestion::Question {
                riasec: question.category,
                question: question.text.clone(),
                options: question.options.clone(),
                step: self.current_index + 1,
                total: QUESTION_COUNT,
            },
            None => CurrentQuestion::Done { done: true },
        }
    }

    /// Adds the option's points to `category` and advances to the next question.
    pub fn submit_answer(&mut self, category: &str, option: i64) -> Result<(), QuizError> {
        let category = Category::from_symbol(category)
            .ok_or_else(|| QuizError::UnknownCategory(category.to_string()))?;
        let points = points_for_option(option).ok_or(QuizError::OptionOutOfRange(option))?;

        if !self.ready {
            return Err(QuizError::NotReady);
        }
        if self.current_index >= self.questions.len() {
            return Err(QuizError::Exhausted);
        }

        self.scores.add(category, points);
        self.current_index += 1;
        self.touch();
        Ok(())
    }

    pub fn rank(&self) -> RankedResult {
        rank(&self.scores)
    }
}

/// Resets the session, generates a fresh question set, and loads it.
///
/// The session lock is not held while the text service runs. Generation failures
/// are logged and reported through the outcome, never returned as errors.
pub async fn reset_and_generate(
    session: &Mutex<QuizSession>,
    generator: &dyn TextGenerator,
    timeout: Duration,
) -> StartOutcome {
    let epoch = session.lock().await.begin_generation();

    let result = generate_all_questions(generator, timeout).await;

    let mut guard = session.lock().await;
    if !guard.finish_generation(epoch, result) {
        info!("Discarding questions from superseded start (epoch {epoch})");
    }
    guard.outcome()
}
