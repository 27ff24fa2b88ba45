use sqlx::PgPool;
use std::collections::HashMap;
use ticketpro_shared::{CreateTicketBatchRequest, UpdateTicketBatchRequest};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::ticket_batch::BatchTicketStats;
use crate::models::TicketBatch;

/// Ticket row generated alongside a new batch.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub flight_number: String,
    pub selling_price: i64,
    pub aircraft: String,
    pub terminal: String,
    pub arrival_time: String,
    pub duration: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchFilters {
    pub country: Option<String>,
    pub airline: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Clone)]
pub struct TicketBatchRepository {
    pool: PgPool,
}

impl TicketBatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, filters: &BatchFilters) -> Result<Vec<TicketBatch>, AppError> {
        let mut query = String::from("SELECT * FROM ticket_batches");
        let mut clauses = Vec::new();
        let mut bind_idx = 1;
        if filters.country.is_some() {
            clauses.push(format!("country_code = ${bind_idx}"));
            bind_idx += 1;
        }
        if filters.airline.is_some() {
            clauses.push(format!("airline_name ILIKE '%' || ${bind_idx} || '%'"));
            bind_idx += 1;
        }
        if filters.date_from.is_some() {
            clauses.push(format!("flight_date >= ${bind_idx}"));
            bind_idx += 1;
        }
        if filters.date_to.is_some() {
            clauses.push(format!("flight_date <= ${bind_idx}"));
        }
        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }
        query.push_str(" ORDER BY created_at DESC");

        let mut db_query = sqlx::query_as::<_, TicketBatch>(&query);
        if let Some(country) = &filters.country {
            db_query = db_query.bind(country);
        }
        if let Some(airline) = &filters.airline {
            db_query = db_query.bind(airline);
        }
        if let Some(date_from) = &filters.date_from {
            db_query = db_query.bind(date_from);
        }
        if let Some(date_to) = &filters.date_to {
            db_query = db_query.bind(date_to);
        }

        let batches = db_query.fetch_all(&self.pool).await?;
        Ok(batches)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TicketBatch>, AppError> {
        let batch = sqlx::query_as::<_, TicketBatch>("SELECT * FROM ticket_batches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(batch)
    }

    /// Create the batch and its tickets in one transaction: either the batch
    /// arrives with its full inventory or not at all.
    pub async fn create_with_tickets(
        &self,
        request: &CreateTicketBatchRequest,
        tickets: &[NewTicket],
        created_by: Uuid,
    ) -> Result<TicketBatch, AppError> {
        let mut tx = self.pool.begin().await?;

        let batch = sqlx::query_as::<_, TicketBatch>(
            r#"
            INSERT INTO ticket_batches
                (country_code, airline_name, flight_date, flight_time, buying_price,
                 quantity, agent_name, agent_contact, agent_address, remarks, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(request.country.to_uppercase())
        .bind(&request.airline)
        .bind(&request.flight_date)
        .bind(&request.flight_time)
        .bind(request.buying_price)
        .bind(request.quantity)
        .bind(&request.agent_name)
        .bind(&request.agent_contact)
        .bind(&request.agent_address)
        .bind(&request.remarks)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        for ticket in tickets {
            sqlx::query(
                r#"
                INSERT INTO tickets
                    (batch_id, flight_number, status, selling_price, aircraft,
                     terminal, arrival_time, duration, available_seats, total_seats)
                VALUES ($1, $2, 'available', $3, $4, $5, $6, $7, 1, 1)
                "#,
            )
            .bind(batch.id)
            .bind(&ticket.flight_number)
            .bind(ticket.selling_price)
            .bind(&ticket.aircraft)
            .bind(&ticket.terminal)
            .bind(&ticket.arrival_time)
            .bind(&ticket.duration)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(batch)
    }

    pub async fn update(
        &self,
        id: Uuid,
        updates: &UpdateTicketBatchRequest,
    ) -> Result<Option<TicketBatch>, AppError> {
        let batch = sqlx::query_as::<_, TicketBatch>(
            r#"
            UPDATE ticket_batches
            SET flight_date = COALESCE($2, flight_date),
                flight_time = COALESCE($3, flight_time),
                agent_name = COALESCE($4, agent_name),
                agent_contact = COALESCE($5, agent_contact),
                agent_address = COALESCE($6, agent_address),
                remarks = COALESCE($7, remarks),
                document_url = COALESCE($8, document_url)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&updates.flight_date)
        .bind(&updates.flight_time)
        .bind(&updates.agent_name)
        .bind(&updates.agent_contact)
        .bind(&updates.agent_address)
        .bind(&updates.remarks)
        .bind(&updates.document_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(batch)
    }

    /// Delete a batch and its tickets, refusing while any ticket is sold.
    /// The sold check runs inside the same transaction as the deletes.
    pub async fn delete_if_unsold(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM ticket_batches WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if !exists {
            let _ = tx.rollback().await;
            return Err(AppError::NotFound("Ticket batch not found".to_string()));
        }

        let sold = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tickets WHERE batch_id = $1 AND status = 'sold'",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if sold > 0 {
            let _ = tx.rollback().await;
            return Err(AppError::Conflict(
                "Cannot delete batch with sold tickets".to_string(),
            ));
        }

        let booked = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bookings b
            JOIN tickets t ON b.ticket_id = t.id
            WHERE t.batch_id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if booked > 0 {
            let _ = tx.rollback().await;
            return Err(AppError::Conflict(
                "Cannot delete batch with existing bookings".to_string(),
            ));
        }

        sqlx::query("DELETE FROM tickets WHERE batch_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM ticket_batches WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ticket_batches")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Ticket counters for every batch, keyed by batch id.
    pub async fn ticket_stats(&self) -> Result<HashMap<Uuid, BatchTicketStats>, AppError> {
        let rows = sqlx::query_as::<_, (Uuid, i64, i64, i64, i64)>(
            r#"
            SELECT
                batch_id,
                COUNT(*) FILTER (WHERE status = 'sold'),
                COUNT(*) FILTER (WHERE status = 'locked'),
                COUNT(*) FILTER (WHERE status = 'available'),
                COALESCE(SUM(selling_price) FILTER (WHERE status = 'sold'), 0)::BIGINT
            FROM tickets
            GROUP BY batch_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(batch_id, sold, locked, available, revenue)| {
                (
                    batch_id,
                    BatchTicketStats {
                        sold,
                        locked,
                        available,
                        revenue,
                    },
                )
            })
            .collect())
    }

    /// Total and available ticket counts per country, for the country cards.
    pub async fn stats_by_country(&self) -> Result<HashMap<String, (i64, i64)>, AppError> {
        let rows = sqlx::query_as::<_, (String, i64, i64)>(
            r#"
            SELECT
                tb.country_code,
                COUNT(t.id),
                COUNT(t.id) FILTER (WHERE t.status = 'available')
            FROM ticket_batches tb
            LEFT JOIN tickets t ON tb.id = t.batch_id
            GROUP BY tb.country_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(code, total, available)| (code, (total, available)))
            .collect())
    }
}
