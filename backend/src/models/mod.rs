//! Database models for the TicketPro back office.
//!
//! Each struct here maps a table row; all queries live in the
//! `repositories` module so handlers never touch SQL directly.

pub mod activity_log;
pub mod airline;
pub mod booking;
pub mod country;
pub mod system_setting;
pub mod ticket;
pub mod ticket_batch;
pub mod user;

pub use activity_log::ActivityLog;
pub use airline::Airline;
pub use booking::Booking;
pub use country::Country;
pub use system_setting::SystemSetting;
pub use ticket::{Ticket, TicketWithBatch};
pub use ticket_batch::TicketBatch;
pub use user::User;

/// Pagination helper shared by the list endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit
                .unwrap_or(ticketpro_shared::DEFAULT_PAGE_SIZE)
                .clamp(1, ticketpro_shared::MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let p = Pagination::new(None, None);
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset, 0);

        let p = Pagination::new(Some(100_000), Some(-3));
        assert_eq!(p.limit, ticketpro_shared::MAX_PAGE_SIZE);
        assert_eq!(p.offset, 0);
    }
}
