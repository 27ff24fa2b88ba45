use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketBatch {
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
}

/// Per-batch ticket counters aggregated from the tickets table.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct BatchTicketStats {
    pub sold: i64,
    pub locked: i64,
    pub available: i64,
    pub revenue: i64,
}

impl BatchTicketStats {
    pub fn profit(&self, buying_price: i64) -> i64 {
        self.revenue - self.sold * buying_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profit_is_revenue_minus_cost_of_sold_tickets() {
        let stats = BatchTicketStats {
            sold: 3,
            locked: 1,
            available: 16,
            revenue: 3 * 21_600,
        };
        assert_eq!(stats.profit(18_000), 3 * (21_600 - 18_000));
    }

    #[test]
    fn profit_is_zero_with_no_sales() {
        let stats = BatchTicketStats::default();
        assert_eq!(stats.profit(18_000), 0);
    }
}
