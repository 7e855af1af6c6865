// RIASEC quiz: category model, question generation, per-session scoring, ranking.
// All text-service calls go through llm_client::TextGenerator.

pub mod category;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod ranking;
pub mod scores;
pub mod session;
pub mod store;
