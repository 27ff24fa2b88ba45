use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Airline {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Airline {
    /// Aircraft type used for generated tickets of this airline.
    pub fn default_aircraft(name: &str) -> &'static str {
        match name {
            "Air Arabia" => "Airbus A320",
            "Emirates" => "Boeing 777",
            "Qatar Airways" => "Boeing 787",
            _ => "Airbus A321",
        }
    }
}
