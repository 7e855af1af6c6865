use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub current_status: String,
    pub mobile: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
