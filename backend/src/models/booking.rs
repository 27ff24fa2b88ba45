use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use ticketpro_shared::{AgentInfo, BookingResponse, BookingStatus, PassengerInfo, PaymentType};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub agent_name: String,
    pub agent_phone: Option<String>,
    pub agent_email: Option<String>,
    pub passenger_name: String,
    pub passenger_passport: String,
    pub passenger_phone: String,
    pub passenger_email: Option<String>,
    pub pax_count: i32,
    pub selling_price: i64,
    pub payment_type: PaymentType,
    pub partial_amount: Option<i64>,
    pub payment_method: String,
    pub payment_details: Option<String>,
    pub comments: Option<String>,
    pub status: BookingStatus,
    pub created_by: Uuid,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Shape the row for the wire, regrouping the flat agent and passenger
    /// columns into the nested form the client submits them in.
    pub fn into_response(self) -> BookingResponse {
        BookingResponse {
            id: self.id,
            ticket_id: self.ticket_id,
            pax_count: self.pax_count,
            selling_price: self.selling_price,
            payment_type: self.payment_type,
            partial_amount: self.partial_amount,
            payment_method: self.payment_method,
            payment_details: self.payment_details,
            comments: self.comments,
            status: self.status,
            created_by: self.created_by,
            confirmed_at: self.confirmed_at,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            agent_info: AgentInfo {
                name: self.agent_name,
                phone: self.agent_phone,
                email: self.agent_email,
            },
            passenger_info: PassengerInfo {
                name: self.passenger_name,
                passport_no: self.passenger_passport,
                phone: self.passenger_phone,
                pax_count: self.pax_count,
                email: self.passenger_email,
            },
        }
    }
}
