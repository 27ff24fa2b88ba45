use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use rand::Rng;
use serde::Deserialize;
use ticketpro_shared::{
    default_selling_price, ApiResponse, BatchListData, BatchWithStats, CreateTicketBatchRequest,
    Permission, UpdateTicketBatchRequest,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::handlers::request_meta;
use crate::middleware::AuthenticatedUser;
use crate::models::Airline;
use crate::repositories::{BatchFilters, NewActivityLog, NewTicket, Repositories};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchListQuery {
    pub country: Option<String>,
    pub airline: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[get("")]
pub async fn list_batches(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    query: web::Query<BatchListQuery>,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::ViewProfit)?;

    let filters = BatchFilters {
        country: query.country.clone(),
        airline: query.airline.clone(),
        date_from: query.date_from.clone(),
        date_to: query.date_to.clone(),
    };
    let batches = repos.batches.find_all(&filters).await?;
    let stats = repos.batches.ticket_stats().await?;

    let batches: Vec<BatchWithStats> = batches
        .into_iter()
        .map(|batch| {
            let ticket_stats = stats.get(&batch.id).copied().unwrap_or_default();
            BatchWithStats {
                id: batch.id,
                country_code: batch.country_code,
                airline_name: batch.airline_name,
                flight_date: batch.flight_date,
                flight_time: batch.flight_time,
                buying_price: batch.buying_price,
                quantity: batch.quantity,
                agent_name: batch.agent_name,
                agent_contact: batch.agent_contact,
                agent_address: batch.agent_address,
                remarks: batch.remarks,
                document_url: batch.document_url,
                created_by: batch.created_by,
                created_at: batch.created_at,
                sold: ticket_stats.sold,
                locked: ticket_stats.locked,
                available: ticket_stats.available,
                total_cost: batch.buying_price * batch.quantity as i64,
                profit: ticket_stats.profit(batch.buying_price),
            }
        })
        .collect();

    let total = batches.len() as i64;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Ticket batches retrieved successfully",
        BatchListData { batches, total },
    )))
}

#[get("/{id}")]
pub async fn get_batch(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::ViewProfit)?;

    let id = path.into_inner();
    let batch = repos
        .batches
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket batch not found".to_string()))?;
    let tickets = repos.tickets.find_by_batch(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Ticket batch retrieved successfully",
        serde_json::json!({ "batch": batch, "tickets": tickets }),
    )))
}

#[post("")]
pub async fn create_batch(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    request: web::Json<CreateTicketBatchRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::CreateBatches)?;
    request.validate()?;

    let country_code = request.country.to_uppercase();
    repos
        .countries
        .find_by_code(&country_code)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown country '{country_code}'")))?;

    let airline_code = repos
        .airlines
        .find_by_name(&request.airline)
        .await?
        .and_then(|a| a.code)
        .unwrap_or_else(|| "XX".to_string());
    let aircraft = Airline::default_aircraft(&request.airline);
    let selling_price = default_selling_price(request.buying_price);

    let mut rng = rand::thread_rng();
    let tickets: Vec<NewTicket> = (0..request.quantity)
        .map(|_| NewTicket {
            flight_number: format!("{} {}", airline_code, rng.gen_range(100..1000)),
            selling_price,
            aircraft: aircraft.to_string(),
            terminal: format!("Terminal {}", rng.gen_range(1..4)),
            arrival_time: "18:45".to_string(),
            duration: "4h 15m".to_string(),
        })
        .collect();

    let batch = repos
        .batches
        .create_with_tickets(&request, &tickets, user.id)
        .await?;

    tracing::info!(
        "batch {} created: {} x {} tickets for {}",
        batch.id,
        request.airline,
        request.quantity,
        country_code
    );

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "create_ticket_batch", "ticket_batch")
                .entity_id(batch.id)
                .details(serde_json::json!({
                    "airline": request.airline,
                    "country": country_code,
                    "quantity": request.quantity,
                    "buying_price": request.buying_price,
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "Ticket batch created successfully",
        serde_json::json!({ "batch": batch, "ticketsCreated": tickets.len() }),
    )))
}

#[put("/{id}")]
pub async fn update_batch(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateTicketBatchRequest>,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::EditBatches)?;
    request.validate()?;

    let batch = repos
        .batches
        .update(path.into_inner(), &request)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket batch not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Ticket batch updated successfully",
        serde_json::json!({ "batch": batch }),
    )))
}

#[delete("/{id}")]
pub async fn delete_batch(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::DeleteBatches)?;

    let id = path.into_inner();
    repos.batches.delete_if_unsold(id).await?;

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "delete_ticket_batch", "ticket_batch")
                .entity_id(id)
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Ticket batch deleted successfully")))
}
