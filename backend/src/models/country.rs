use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub flag: String,
    pub created_at: DateTime<Utc>,
}
