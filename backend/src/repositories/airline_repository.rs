use sqlx::PgPool;

use crate::error::AppError;
use crate::models::Airline;

#[derive(Clone)]
pub struct AirlineRepository {
    pool: PgPool,
}

impl AirlineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Airline>, AppError> {
        let airlines = sqlx::query_as::<_, Airline>("SELECT * FROM airlines ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(airlines)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Airline>, AppError> {
        let airline = sqlx::query_as::<_, Airline>("SELECT * FROM airlines WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(airline)
    }
}
