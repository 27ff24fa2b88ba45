use actix_web::{get, patch, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use ticketpro_shared::{
    ApiResponse, CountryTicketsData, CountryWithStats, Permission, TicketListData, TicketStatus,
    UpdateStatusRequest,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::request_meta;
use crate::middleware::AuthenticatedUser;
use crate::models::Pagination;
use crate::repositories::{NewActivityLog, Repositories, TicketFilters};

#[derive(Debug, Deserialize)]
pub struct TicketListQuery {
    pub country: Option<String>,
    pub status: Option<String>,
    pub airline: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn parse_status(status: Option<&str>) -> Result<Option<TicketStatus>, AppError> {
    status
        .map(|s| {
            s.parse::<TicketStatus>()
                .map_err(|_| AppError::Validation("Invalid status".to_string()))
        })
        .transpose()
}

#[get("")]
pub async fn list_tickets(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    query: web::Query<TicketListQuery>,
) -> Result<HttpResponse, AppError> {
    let filters = TicketFilters {
        country: query.country.clone(),
        status: parse_status(query.status.as_deref())?,
        airline: query.airline.clone(),
    };
    let pagination = Pagination::new(query.limit, query.offset);

    let (tickets, total) = repos.tickets.find_with_batch(&filters, pagination).await?;

    let include_buying_price = user.has_permission(Permission::ViewBuyingPrice);
    let tickets = tickets
        .into_iter()
        .map(|t| t.into_response(include_buying_price))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Tickets retrieved successfully",
        TicketListData {
            tickets,
            total,
            limit: pagination.limit,
            offset: pagination.offset,
        },
    )))
}

#[derive(Debug, Deserialize)]
pub struct CountryTicketsQuery {
    pub status: Option<String>,
    pub airline: Option<String>,
}

#[get("/country/{country_code}")]
pub async fn list_country_tickets(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<String>,
    query: web::Query<CountryTicketsQuery>,
) -> Result<HttpResponse, AppError> {
    let country_code = path.into_inner().to_uppercase();
    let filters = TicketFilters {
        country: Some(country_code.clone()),
        status: parse_status(query.status.as_deref())?,
        airline: query.airline.clone(),
    };

    let tickets = repos.tickets.find_all_filtered(&filters).await?;
    let total = tickets.len() as i64;

    let include_buying_price = user.has_permission(Permission::ViewBuyingPrice);
    let tickets = tickets
        .into_iter()
        .map(|t| t.into_response(include_buying_price))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Country tickets retrieved successfully",
        CountryTicketsData {
            tickets,
            country: country_code,
            total,
        },
    )))
}

#[get("/dashboard/stats")]
pub async fn dashboard_stats(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let mut stats = repos.tickets.dashboard_stats().await?;

    if !user.has_permission(Permission::ViewProfit) {
        stats.estimated_profit = None;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Dashboard statistics retrieved successfully",
        stats,
    )))
}

#[get("/countries/stats")]
pub async fn countries_stats(
    _user: AuthenticatedUser,
    repos: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let countries = repos.countries.find_all().await?;
    let stats = repos.batches.stats_by_country().await?;

    let countries: Vec<CountryWithStats> = countries
        .into_iter()
        .map(|country| {
            let (total, available) = stats.get(&country.code).copied().unwrap_or((0, 0));
            CountryWithStats {
                code: country.code,
                name: country.name,
                flag: country.flag,
                created_at: country.created_at,
                total_tickets: total,
                available_tickets: available,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Countries with statistics retrieved successfully",
        serde_json::json!({ "countries": countries }),
    )))
}

#[get("/{id}")]
pub async fn get_ticket(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let ticket = repos
        .tickets
        .find_by_id_with_batch(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    let include_buying_price = user.has_permission(Permission::ViewBuyingPrice);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Ticket retrieved successfully",
        serde_json::json!({ "ticket": ticket.into_response(include_buying_price) }),
    )))
}

#[patch("/{id}/status")]
pub async fn update_ticket_status(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateStatusRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status = request
        .status
        .parse::<TicketStatus>()
        .map_err(|_| AppError::Validation("Invalid status".to_string()))?;

    if status == TicketStatus::Sold && !user.has_permission(Permission::ConfirmSales) {
        return Err(AppError::Authorization(
            "Permission required to mark tickets as sold".to_string(),
        ));
    }

    let ticket = repos
        .tickets
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    let sold_by = (status == TicketStatus::Sold).then_some(user.id);
    let updated = repos.tickets.update_status(id, status, sold_by).await?;
    if !updated {
        return Err(AppError::Internal(
            "Failed to update ticket status".to_string(),
        ));
    }

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "update_ticket_status", "ticket")
                .entity_id(id)
                .details(serde_json::json!({
                    "old_status": ticket.status,
                    "new_status": status,
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Ticket status updated successfully")))
}
