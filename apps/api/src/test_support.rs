//! In-memory fakes for the text service and the profile store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::llm_client::{LlmError, TextGenerator};
use crate::profile::sink::{PersistenceError, ProfileSink};
use crate::profile::validation::NewProfile;
use crate::quiz::store::SessionStore;
use crate::state::AppState;

/// A model-style JSON array of `count` questions with four options each.
pub fn questions_json(count: usize) -> String {
    let items: Vec<serde_json::Value> = (1..=count)
        .map(|i| {
            serde_json::json!({
                "question": format!("Scenario {i}?"),
                "options": [
                    format!("Option {i}a"),
                    format!("Option {i}b"),
                    format!("Option {i}c"),
                    format!("Option {i}d"),
                ],
            })
        })
        .collect();
    serde_json::to_string(&items).unwrap()
}

pub struct FixedGenerator {
    response: String,
    calls: AtomicUsize,
}

impl FixedGenerator {
    pub fn new(response: String) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 503,
            message: "model overloaded".to_string(),
        })
    }
}

pub struct SlowGenerator {
    delay: Duration,
    response: String,
}

impl SlowGenerator {
    pub fn new(delay: Duration, response: String) -> Self {
        Self { delay, response }
    }
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}

#[derive(Default)]
pub struct MemorySink {
    pub stored: Mutex<Vec<NewProfile>>,
}

#[async_trait]
impl ProfileSink for MemorySink {
    async fn store_profile(&self, profile: &NewProfile) -> Result<String, PersistenceError> {
        let mut stored = self.stored.lock().unwrap();
        stored.push(profile.clone());
        Ok(format!("profile-{}", stored.len()))
    }
}

pub struct FailingSink;

#[async_trait]
impl ProfileSink for FailingSink {
    async fn store_profile(&self, _profile: &NewProfile) -> Result<String, PersistenceError> {
        Err(PersistenceError::Database(sqlx::Error::PoolTimedOut))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        gemini_api_key: "test-key".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        generation_timeout: Duration::from_secs(5),
        session_idle_timeout: Duration::from_secs(3600),
        cors_allowed_origins: Vec::new(),
    }
}

pub fn test_state(llm: Arc<dyn TextGenerator>, profiles: Arc<dyn ProfileSink>) -> AppState {
    AppState {
        sessions: Arc::new(SessionStore::new()),
        llm,
        profiles,
        config: test_config(),
    }
}
