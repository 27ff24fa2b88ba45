use chrono::{Duration, Utc};
use sqlx::PgPool;
use ticketpro_shared::{DashboardStats, TicketStatus, TodaysSales, BOOKING_LOCK_HOURS};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Pagination, Ticket, TicketWithBatch};

const TICKET_WITH_BATCH_SELECT: &str = r#"
SELECT
    t.id, t.batch_id, t.flight_number, t.status, t.selling_price,
    t.aircraft, t.terminal, t.arrival_time, t.duration,
    t.available_seats, t.total_seats, t.locked_until, t.sold_by, t.sold_at,
    t.created_at, t.updated_at,
    tb.country_code, tb.airline_name, tb.flight_date, tb.flight_time,
    tb.buying_price, tb.agent_name,
    c.name AS country_name, c.flag AS country_flag
FROM tickets t
JOIN ticket_batches tb ON t.batch_id = tb.id
JOIN countries c ON tb.country_code = c.code
"#;

#[derive(Debug, Clone, Default)]
pub struct TicketFilters {
    pub country: Option<String>,
    pub status: Option<TicketStatus>,
    pub airline: Option<String>,
}

impl TicketFilters {
    fn where_clause(&self, first_bind: usize) -> String {
        let mut clauses = Vec::new();
        let mut bind_idx = first_bind;
        if self.country.is_some() {
            clauses.push(format!("tb.country_code = ${bind_idx}"));
            bind_idx += 1;
        }
        if self.status.is_some() {
            clauses.push(format!("t.status = ${bind_idx}"));
            bind_idx += 1;
        }
        if self.airline.is_some() {
            clauses.push(format!("tb.airline_name ILIKE '%' || ${bind_idx} || '%'"));
        }
        if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        }
    }
}

#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_with_batch(
        &self,
        filters: &TicketFilters,
        pagination: Pagination,
    ) -> Result<(Vec<TicketWithBatch>, i64), AppError> {
        let where_clause = filters.where_clause(1);
        let query = format!(
            "{TICKET_WITH_BATCH_SELECT} {where_clause} ORDER BY t.created_at DESC LIMIT {} OFFSET {}",
            pagination.limit, pagination.offset
        );

        let mut db_query = sqlx::query_as::<_, TicketWithBatch>(&query);
        if let Some(country) = &filters.country {
            db_query = db_query.bind(country);
        }
        if let Some(status) = filters.status {
            db_query = db_query.bind(status);
        }
        if let Some(airline) = &filters.airline {
            db_query = db_query.bind(airline);
        }
        let tickets = db_query.fetch_all(&self.pool).await?;

        let count_query = format!(
            "SELECT COUNT(*) FROM tickets t \
             JOIN ticket_batches tb ON t.batch_id = tb.id \
             JOIN countries c ON tb.country_code = c.code {where_clause}"
        );
        let mut db_count = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(country) = &filters.country {
            db_count = db_count.bind(country);
        }
        if let Some(status) = filters.status {
            db_count = db_count.bind(status);
        }
        if let Some(airline) = &filters.airline {
            db_count = db_count.bind(airline);
        }
        let total = db_count.fetch_one(&self.pool).await?;

        Ok((tickets, total))
    }

    /// Unpaginated variant used by the per-country listing.
    pub async fn find_all_filtered(
        &self,
        filters: &TicketFilters,
    ) -> Result<Vec<TicketWithBatch>, AppError> {
        let where_clause = filters.where_clause(1);
        let query = format!("{TICKET_WITH_BATCH_SELECT} {where_clause} ORDER BY t.created_at DESC");

        let mut db_query = sqlx::query_as::<_, TicketWithBatch>(&query);
        if let Some(country) = &filters.country {
            db_query = db_query.bind(country);
        }
        if let Some(status) = filters.status {
            db_query = db_query.bind(status);
        }
        if let Some(airline) = &filters.airline {
            db_query = db_query.bind(airline);
        }
        let tickets = db_query.fetch_all(&self.pool).await?;
        Ok(tickets)
    }

    pub async fn find_by_id_with_batch(
        &self,
        id: Uuid,
    ) -> Result<Option<TicketWithBatch>, AppError> {
        let query = format!("{TICKET_WITH_BATCH_SELECT} WHERE t.id = $1");
        let ticket = sqlx::query_as::<_, TicketWithBatch>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket)
    }

    pub async fn find_by_batch(&self, batch_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE batch_id = $1 ORDER BY created_at",
        )
        .bind(batch_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket)
    }

    /// Direct status update (the admin path). Selling stamps the seller and
    /// time, locking stamps the expiry, everything else clears the lock.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TicketStatus,
        sold_by: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result = match status {
            TicketStatus::Sold => {
                sqlx::query(
                    r#"
                    UPDATE tickets
                    SET status = $2, sold_by = $3, sold_at = NOW(),
                        locked_until = NULL, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(status)
                .bind(sold_by)
                .execute(&self.pool)
                .await?
            }
            TicketStatus::Locked => {
                let locked_until = Utc::now() + Duration::hours(BOOKING_LOCK_HOURS);
                sqlx::query(
                    r#"
                    UPDATE tickets
                    SET status = $2, locked_until = $3, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(status)
                .bind(locked_until)
                .execute(&self.pool)
                .await?
            }
            _ => {
                sqlx::query(
                    r#"
                    UPDATE tickets
                    SET status = $2, locked_until = NULL, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(status)
                .execute(&self.pool)
                .await?
            }
        };
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let (sales_count, sales_amount) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(selling_price), 0)::BIGINT
            FROM tickets
            WHERE status = 'sold' AND sold_at::date = CURRENT_DATE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let total_bookings = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE status = 'confirmed'",
        )
        .fetch_one(&self.pool)
        .await?;

        let locked_tickets =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE status = 'locked'")
                .fetch_one(&self.pool)
                .await?;

        let total_inventory = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tickets WHERE status IN ('available', 'locked')",
        )
        .fetch_one(&self.pool)
        .await?;

        let estimated_profit = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(t.selling_price - tb.buying_price), 0)::BIGINT
            FROM tickets t
            JOIN ticket_batches tb ON t.batch_id = tb.id
            WHERE t.status = 'sold'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            todays_sales: TodaysSales {
                count: sales_count,
                amount: sales_amount,
            },
            total_bookings,
            locked_tickets,
            total_inventory,
            estimated_profit: Some(estimated_profit),
        })
    }
}
