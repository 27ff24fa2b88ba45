use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use ticketpro_shared::{CountrySummary, TicketBatchSummary, TicketResponse, TicketStatus};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub flight_number: String,
    pub status: TicketStatus,
    pub selling_price: i64,
    pub aircraft: Option<String>,
    pub terminal: Option<String>,
    pub arrival_time: Option<String>,
    pub duration: Option<String>,
    pub available_seats: i32,
    pub total_seats: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub sold_by: Option<Uuid>,
    pub sold_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A ticket row joined with its batch and country, as the listing and
/// detail endpoints return it.
#[derive(Debug, Clone, FromRow)]
pub struct TicketWithBatch {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub flight_number: String,
    pub status: TicketStatus,
    pub selling_price: i64,
    pub aircraft: Option<String>,
    pub terminal: Option<String>,
    pub arrival_time: Option<String>,
    pub duration: Option<String>,
    pub available_seats: i32,
    pub total_seats: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub sold_by: Option<Uuid>,
    pub sold_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub country_code: String,
    pub airline_name: String,
    pub flight_date: String,
    pub flight_time: String,
    pub buying_price: i64,
    pub agent_name: String,
    pub country_name: String,
    pub country_flag: String,
}

impl TicketWithBatch {
    /// Shape the row for the wire. The batch buying price is only included
    /// for callers allowed to see it.
    pub fn into_response(self, include_buying_price: bool) -> TicketResponse {
        TicketResponse {
            id: self.id,
            batch_id: self.batch_id,
            flight_number: self.flight_number,
            status: self.status,
            selling_price: self.selling_price,
            aircraft: self.aircraft,
            terminal: self.terminal,
            arrival_time: self.arrival_time,
            duration: self.duration,
            available_seats: self.available_seats,
            total_seats: self.total_seats,
            locked_until: self.locked_until,
            sold_by: self.sold_by,
            sold_at: self.sold_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            batch: TicketBatchSummary {
                id: self.batch_id,
                country_code: self.country_code.clone(),
                airline_name: self.airline_name,
                flight_date: self.flight_date,
                flight_time: self.flight_time,
                buying_price: include_buying_price.then_some(self.buying_price),
                agent_name: self.agent_name,
            },
            country: CountrySummary {
                code: self.country_code,
                name: self.country_name,
                flag: self.country_flag,
            },
        }
    }
}
