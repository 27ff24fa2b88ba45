use sqlx::PgPool;

use crate::error::AppError;
use crate::models::Country;

#[derive(Clone)]
pub struct CountryRepository {
    pool: PgPool,
}

impl CountryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Country>, AppError> {
        let countries = sqlx::query_as::<_, Country>("SELECT * FROM countries ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(countries)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Country>, AppError> {
        let country = sqlx::query_as::<_, Country>("SELECT * FROM countries WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(country)
    }
}
