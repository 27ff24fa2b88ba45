use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use ticketpro_shared::{
    BookingStatus, CreateBookingRequest, PaymentType, TicketStatus, BOOKING_LOCK_HOURS,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Booking, Pagination};

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    /// List bookings, optionally restricted to one creator and one status.
    pub async fn find(
        &self,
        created_by: Option<Uuid>,
        status: Option<BookingStatus>,
        pagination: Pagination,
    ) -> Result<(Vec<Booking>, i64), AppError> {
        let mut clauses = Vec::new();
        let mut bind_idx = 1;
        if created_by.is_some() {
            clauses.push(format!("created_by = ${bind_idx}"));
            bind_idx += 1;
        }
        if status.is_some() {
            clauses.push(format!("status = ${bind_idx}"));
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let query = format!(
            "SELECT * FROM bookings {where_clause} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            pagination.limit, pagination.offset
        );
        let mut db_query = sqlx::query_as::<_, Booking>(&query);
        if let Some(user_id) = created_by {
            db_query = db_query.bind(user_id);
        }
        if let Some(status) = status {
            db_query = db_query.bind(status);
        }
        let bookings = db_query.fetch_all(&self.pool).await?;

        let count_query = format!("SELECT COUNT(*) FROM bookings {where_clause}");
        let mut db_count = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(user_id) = created_by {
            db_count = db_count.bind(user_id);
        }
        if let Some(status) = status {
            db_count = db_count.bind(status);
        }
        let total = db_count.fetch_one(&self.pool).await?;

        Ok((bookings, total))
    }

    /// Create a booking by claiming its ticket.
    ///
    /// The availability check and the ticket-status write are a single
    /// conditional UPDATE, and the booking insert rides the same
    /// transaction, so two concurrent requests for one ticket cannot both
    /// succeed. Full payment confirms the booking and sells the ticket in
    /// the same call; partial payment leaves the booking pending with a
    /// 24-hour expiry and locks the ticket for the same window.
    pub async fn create(
        &self,
        request: &CreateBookingRequest,
        created_by: Uuid,
    ) -> Result<Booking, AppError> {
        let now = Utc::now();
        let (booking_status, expires_at): (BookingStatus, Option<DateTime<Utc>>) =
            match request.payment_type {
                PaymentType::Full => (BookingStatus::Confirmed, None),
                PaymentType::Partial => (
                    BookingStatus::Pending,
                    Some(now + Duration::hours(BOOKING_LOCK_HOURS)),
                ),
            };

        let mut tx = self.pool.begin().await?;

        let claimed = match request.payment_type {
            PaymentType::Full => {
                sqlx::query(
                    r#"
                    UPDATE tickets
                    SET status = 'sold', sold_by = $2, sold_at = NOW(),
                        locked_until = NULL, updated_at = NOW()
                    WHERE id = $1 AND status = 'available'
                    "#,
                )
                .bind(request.ticket_id)
                .bind(created_by)
                .execute(&mut *tx)
                .await?
                .rows_affected()
            }
            PaymentType::Partial => {
                sqlx::query(
                    r#"
                    UPDATE tickets
                    SET status = 'locked', locked_until = $2, updated_at = NOW()
                    WHERE id = $1 AND status = 'available'
                    "#,
                )
                .bind(request.ticket_id)
                .bind(expires_at)
                .execute(&mut *tx)
                .await?
                .rows_affected()
            }
        };

        if claimed == 0 {
            let _ = tx.rollback().await;
            return Err(AppError::Conflict(
                "Ticket is not available for booking".to_string(),
            ));
        }

        let confirmed_at = match booking_status {
            BookingStatus::Confirmed => Some(now),
            _ => None,
        };

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings
                (ticket_id, agent_name, agent_phone, agent_email,
                 passenger_name, passenger_passport, passenger_phone, passenger_email,
                 pax_count, selling_price, payment_type, partial_amount,
                 payment_method, payment_details, comments, status,
                 created_by, confirmed_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(request.ticket_id)
        .bind(&request.agent_info.name)
        .bind(&request.agent_info.phone)
        .bind(&request.agent_info.email)
        .bind(&request.passenger_info.name)
        .bind(&request.passenger_info.passport_no)
        .bind(&request.passenger_info.phone)
        .bind(&request.passenger_info.email)
        .bind(request.passenger_info.pax_count)
        .bind(request.selling_price)
        .bind(request.payment_type)
        .bind(request.partial_amount)
        .bind(&request.payment_method)
        .bind(&request.payment_details)
        .bind(&request.comments)
        .bind(booking_status)
        .bind(created_by)
        .bind(confirmed_at)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Move a booking to a new status and cascade the linked ticket in one
    /// transaction, so the pair can never be committed half-updated.
    pub async fn update_status_cascade(
        &self,
        booking: &Booking,
        status: BookingStatus,
        actor: Uuid,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        match status {
            BookingStatus::Confirmed => {
                sqlx::query(
                    "UPDATE bookings SET status = $2, confirmed_at = NOW(), updated_at = NOW() WHERE id = $1",
                )
                .bind(booking.id)
                .bind(status)
                .execute(&mut *tx)
                .await?;
            }
            _ => {
                sqlx::query("UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1")
                    .bind(booking.id)
                    .bind(status)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        match status.cascaded_ticket_status() {
            Some(TicketStatus::Sold) => {
                sqlx::query(
                    r#"
                    UPDATE tickets
                    SET status = 'sold', sold_by = $2, sold_at = NOW(),
                        locked_until = NULL, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(booking.ticket_id)
                .bind(actor)
                .execute(&mut *tx)
                .await?;
            }
            Some(ticket_status) => {
                sqlx::query(
                    r#"
                    UPDATE tickets
                    SET status = $2, locked_until = NULL, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(booking.ticket_id)
                .bind(ticket_status)
                .execute(&mut *tx)
                .await?;
            }
            None => {}
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn count_total(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
