use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Response envelope used by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    pub fn error_with_fields(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: Some(errors),
        }
    }
}

// Auth DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginData {
    pub user: UserResponse,
    pub token: String,
}

// User DTOs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub role: UserRole,

    #[serde(default = "default_user_status")]
    pub status: UserStatus,
}

fn default_user_status() -> UserStatus {
    UserStatus::Active
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,

    #[validate(length(min = 1, message = "Password confirmation is required"))]
    pub confirm_password: String,
}

impl ChangePasswordRequest {
    pub fn passwords_match(&self) -> bool {
        self.new_password == self.confirm_password
    }
}

// Booking DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AgentInfo {
    #[validate(length(min = 1, message = "Agent name is required"))]
    pub name: String,

    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PassengerInfo {
    #[validate(length(min = 1, message = "Passenger name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Passport number is required"))]
    pub passport_no: String,

    #[validate(length(min = 1, message = "Passenger phone is required"))]
    pub phone: String,

    #[validate(range(min = 1, message = "Passenger count must be at least 1"))]
    pub pax_count: i32,

    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub ticket_id: Uuid,

    #[validate]
    pub agent_info: AgentInfo,

    #[validate]
    pub passenger_info: PassengerInfo,

    #[validate(range(min = 0, message = "Selling price must be positive"))]
    pub selling_price: i64,

    pub payment_type: PaymentType,

    pub partial_amount: Option<i64>,

    #[serde(default = "default_payment_method")]
    pub payment_method: String,

    pub payment_details: Option<String>,

    pub comments: Option<String>,
}

fn default_payment_method() -> String {
    crate::constants::DEFAULT_PAYMENT_METHOD.to_string()
}

impl CreateBookingRequest {
    /// Partial payments must carry an amount that is positive and strictly
    /// below the booking total; full payments must not fail here.
    pub fn validate_payment(&self) -> Result<(), String> {
        if self.payment_type != PaymentType::Partial {
            return Ok(());
        }
        let amount = match self.partial_amount {
            Some(amount) if amount > 0 => amount,
            _ => return Err("Partial amount is required for partial payments".to_string()),
        };
        let total = self.selling_price * self.passenger_info.pax_count as i64;
        if amount >= total {
            return Err(
                "Partial amount cannot be greater than or equal to total amount".to_string(),
            );
        }
        Ok(())
    }
}

/// Bookings carry their agent and passenger details nested, the way the
/// booking form submits them.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub ticket_id: Uuid,
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
    #[serde(rename = "agentInfo")]
    pub agent_info: AgentInfo,
    #[serde(rename = "passengerInfo")]
    pub passenger_info: PassengerInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingListData {
    pub bookings: Vec<BookingResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// PATCH /:id/status body for both tickets and bookings. The status arrives
/// as a plain string so unknown values can be rejected with the shared
/// envelope instead of a deserialization failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// Ticket DTOs
#[derive(Debug, Serialize, Deserialize)]
pub struct TicketBatchSummary {
    pub id: Uuid,
    pub country_code: String,
    pub airline_name: String,
    pub flight_date: String,
    pub flight_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buying_price: Option<i64>,
    pub agent_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountrySummary {
    pub code: String,
    pub name: String,
    pub flag: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketResponse {
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
    pub batch: TicketBatchSummary,
    pub country: CountrySummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketListData {
    pub tickets: Vec<TicketResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountryTicketsData {
    pub tickets: Vec<TicketResponse>,
    pub country: String,
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaysSales {
    pub count: i64,
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub todays_sales: TodaysSales,
    pub total_bookings: i64,
    pub locked_tickets: i64,
    pub total_inventory: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_profit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountryWithStats {
    pub code: String,
    pub name: String,
    pub flag: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "totalTickets")]
    pub total_tickets: i64,
    #[serde(rename = "availableTickets")]
    pub available_tickets: i64,
}

// Ticket batch DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketBatchRequest {
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,

    #[validate(length(min = 1, message = "Airline is required"))]
    pub airline: String,

    #[validate(length(min = 1, message = "Flight date is required"))]
    pub flight_date: String,

    #[validate(length(min = 1, message = "Flight time is required"))]
    pub flight_time: String,

    #[validate(range(min = 0, message = "Buying price must be positive"))]
    pub buying_price: i64,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    #[validate(length(min = 1, message = "Agent name is required"))]
    pub agent_name: String,

    pub agent_contact: Option<String>,
    pub agent_address: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketBatchRequest {
    #[validate(length(min = 1))]
    pub flight_date: Option<String>,

    #[validate(length(min = 1))]
    pub flight_time: Option<String>,

    #[validate(length(min = 1))]
    pub agent_name: Option<String>,

    pub agent_contact: Option<String>,
    pub agent_address: Option<String>,
    pub remarks: Option<String>,
    pub document_url: Option<String>,
}

/// Batch rows in the buying screen carry inventory and profit figures next
/// to the raw batch fields.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchWithStats {
    pub id: Uuid,
    pub country_code: String,
    pub airline_name: String,
    pub flight_date: String,
    pub flight_time: String,
    pub buying_price: i64,
    pub quantity: i32,
    pub agent_name: String,
    pub agent_contact: Option<String>,
    pub agent_address: Option<String>,
    pub remarks: Option<String>,
    pub document_url: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub sold: i64,
    pub locked: i64,
    pub available: i64,
    #[serde(rename = "totalCost")]
    pub total_cost: i64,
    pub profit: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchListData {
    pub batches: Vec<BatchWithStats>,
    pub total: i64,
}

// Settings DTOs
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1))]
    pub company_name: Option<String>,

    #[validate(email)]
    pub company_email: Option<String>,

    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub default_currency: Option<String>,
    pub timezone: Option<String>,
    pub language: Option<String>,
    pub auto_backup: Option<bool>,
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,

    #[validate(range(min = 1, max = 48))]
    pub booking_timeout: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SettingValueRequest {
    pub value: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_request(
        payment_type: PaymentType,
        selling_price: i64,
        pax_count: i32,
        partial_amount: Option<i64>,
    ) -> CreateBookingRequest {
        CreateBookingRequest {
            ticket_id: Uuid::new_v4(),
            agent_info: AgentInfo {
                name: "Rahman Travel Agency".to_string(),
                phone: None,
                email: None,
            },
            passenger_info: PassengerInfo {
                name: "Mohammed Abdul Rahman".to_string(),
                passport_no: "EB1234567".to_string(),
                phone: "+8801987654321".to_string(),
                pax_count,
                email: None,
            },
            selling_price,
            payment_type,
            partial_amount,
            payment_method: "cash".to_string(),
            payment_details: None,
            comments: None,
        }
    }

    #[test]
    fn full_payment_needs_no_partial_amount() {
        let req = booking_request(PaymentType::Full, 22_000, 1, None);
        assert!(req.validate_payment().is_ok());
    }

    #[test]
    fn partial_amount_must_be_present_and_positive() {
        let req = booking_request(PaymentType::Partial, 22_000, 1, None);
        assert!(req.validate_payment().is_err());

        let req = booking_request(PaymentType::Partial, 22_000, 1, Some(0));
        assert!(req.validate_payment().is_err());
    }

    #[test]
    fn partial_amount_equal_to_total_is_rejected() {
        let req = booking_request(PaymentType::Partial, 22_000, 1, Some(22_000));
        assert!(req.validate_payment().is_err());
    }

    #[test]
    fn partial_amount_below_total_is_accepted() {
        let req = booking_request(PaymentType::Partial, 22_000, 1, Some(10_000));
        assert!(req.validate_payment().is_ok());
    }

    #[test]
    fn partial_total_scales_with_pax_count() {
        // 22000 >= 22000 for one passenger, but below 44000 for two
        let req = booking_request(PaymentType::Partial, 22_000, 2, Some(22_000));
        assert!(req.validate_payment().is_ok());
    }

    #[test]
    fn envelope_omits_empty_fields() {
        let body = serde_json::to_value(ApiResponse::message("Logout successful")).unwrap();
        assert_eq!(body["success"], true);
        assert!(body.get("data").is_none());
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn booking_request_accepts_client_field_names() {
        let req: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "ticketId": Uuid::new_v4(),
            "agentInfo": { "name": "Dhaka Express Travel" },
            "passengerInfo": {
                "name": "Fatima Begum",
                "passportNo": "EB2345678",
                "phone": "+8801666888999",
                "paxCount": 1
            },
            "sellingPrice": 45600,
            "paymentType": "full"
        }))
        .unwrap();
        assert_eq!(req.payment_type, PaymentType::Full);
        assert_eq!(req.payment_method, "cash");
        assert_eq!(req.passenger_info.pax_count, 1);
    }
}
