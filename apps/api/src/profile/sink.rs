//! Profile Sink — append-only storage for contact profiles.
//!
//! `AppState` holds an `Arc<dyn ProfileSink>`; production uses Postgres, tests use memory.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::profile::ProfileRow;
use crate::profile::validation::NewProfile;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database write failed: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ProfileSink: Send + Sync {
    /// Writes the profile once and returns its new opaque id. No retries.
    async fn store_profile(&self, profile: &NewProfile) -> Result<String, PersistenceError>;
}

pub struct PgProfileSink {
    pool: PgPool,
}

impl PgProfileSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileSink for PgProfileSink {
    async fn store_profile(&self, profile: &NewProfile) -> Result<String, PersistenceError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (id, name, age, current_status, mobile, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, age, current_status, mobile, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&profile.name)
        .bind(profile.age)
        .bind(&profile.status)
        .bind(&profile.phone)
        .bind(&profile.email)
        .fetch_one(&self.pool)
        .await?;

        info!(profile_id = %row.id, created_at = %row.created_at, "Stored profile");
        Ok(row.id.to_string())
    }
}
