use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::activity_log::RequestMeta;
use crate::models::ActivityLog;

#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub user_id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub meta: RequestMeta,
}

impl NewActivityLog {
    pub fn new(user_id: Uuid, action: &str, entity_type: &str) -> Self {
        Self {
            user_id,
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: None,
            details: None,
            meta: RequestMeta::default(),
        }
    }

    pub fn entity_id(mut self, entity_id: impl ToString) -> Self {
        self.entity_id = Some(entity_id.to_string());
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn meta(mut self, meta: RequestMeta) -> Self {
        self.meta = meta;
        self
    }
}

#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, entry: NewActivityLog) -> Result<ActivityLog, AppError> {
        let log = sqlx::query_as::<_, ActivityLog>(
            r#"
            INSERT INTO activity_logs
                (user_id, action, entity_type, entity_id, details, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.entity_type)
        .bind(&entry.entity_id)
        .bind(&entry.details)
        .bind(&entry.meta.ip_address)
        .bind(&entry.meta.user_agent)
        .fetch_one(&self.pool)
        .await?;
        Ok(log)
    }

    /// Best-effort append: a failed log entry is reported but never fails
    /// the request that produced it.
    pub async fn record(&self, entry: NewActivityLog) {
        let action = entry.action.clone();
        if let Err(e) = self.create(entry).await {
            tracing::warn!("activity logging failed for '{action}': {e}");
        }
    }

    pub async fn find_recent(&self, limit: i64) -> Result<Vec<ActivityLog>, AppError> {
        let logs = sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    pub async fn find_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<ActivityLog>, AppError> {
        let logs = sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }
}
