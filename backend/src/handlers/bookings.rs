use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use ticketpro_shared::{
    ApiResponse, BookingListData, BookingStatus, CreateBookingRequest, PaymentType, Permission,
    UpdateStatusRequest,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::handlers::request_meta;
use crate::middleware::AuthenticatedUser;
use crate::models::{Booking, Pagination};
use crate::repositories::{NewActivityLog, Repositories};

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A caller may act on a booking they created; everyone else needs the
/// view-all-bookings capability.
fn check_booking_access(user: &AuthenticatedUser, booking: &Booking) -> Result<(), AppError> {
    if booking.created_by == user.id || user.has_permission(Permission::ViewAllBookings) {
        Ok(())
    } else {
        Err(AppError::Authorization("Access denied".to_string()))
    }
}

#[get("")]
pub async fn list_bookings(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    query: web::Query<BookingListQuery>,
) -> Result<HttpResponse, AppError> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            s.parse::<BookingStatus>()
                .map_err(|_| AppError::Validation("Invalid status".to_string()))
        })
        .transpose()?;
    let pagination = Pagination::new(query.limit, query.offset);

    let created_by = if user.has_permission(Permission::ViewAllBookings) {
        None
    } else {
        Some(user.id)
    };

    let (bookings, total) = repos.bookings.find(created_by, status, pagination).await?;
    let bookings = bookings.into_iter().map(Booking::into_response).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Bookings retrieved successfully",
        BookingListData {
            bookings,
            total,
            limit: pagination.limit,
            offset: pagination.offset,
        },
    )))
}

#[get("/{id}")]
pub async fn get_booking(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = repos
        .bookings
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    check_booking_access(&user, &booking)?;

    let ticket = repos.tickets.find_by_id_with_batch(booking.ticket_id).await?;
    let include_buying_price = user.has_permission(Permission::ViewBuyingPrice);
    let ticket = ticket.map(|t| t.into_response(include_buying_price));

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Booking retrieved successfully",
        serde_json::json!({ "booking": booking.into_response(), "ticket": ticket }),
    )))
}

#[post("")]
pub async fn create_booking(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    request: web::Json<CreateBookingRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    request
        .validate_payment()
        .map_err(AppError::Validation)?;

    // Missing ticket and unavailable ticket are different failures; the
    // availability itself is only decided by the atomic claim below.
    repos
        .tickets
        .find_by_id(request.ticket_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    let booking = repos.bookings.create(&request, user.id).await?;

    let amount = match request.payment_type {
        PaymentType::Full => request.selling_price * request.passenger_info.pax_count as i64,
        PaymentType::Partial => request.partial_amount.unwrap_or(0),
    };
    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "create_booking", "booking")
                .entity_id(booking.id)
                .details(serde_json::json!({
                    "ticket_id": request.ticket_id,
                    "passenger_name": request.passenger_info.name,
                    "payment_type": request.payment_type,
                    "amount": amount,
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    let booking_id = booking.id;
    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "Booking created successfully",
        serde_json::json!({ "booking": booking.into_response(), "bookingId": booking_id }),
    )))
}

#[patch("/{id}/status")]
pub async fn update_booking_status(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateStatusRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status = request
        .status
        .parse::<BookingStatus>()
        .map_err(|_| AppError::Validation("Invalid status".to_string()))?;

    let booking = repos
        .bookings
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    check_booking_access(&user, &booking)?;

    if status == BookingStatus::Confirmed && !user.has_permission(Permission::ConfirmSales) {
        return Err(AppError::Authorization(
            "Permission required to confirm bookings".to_string(),
        ));
    }

    repos
        .bookings
        .update_status_cascade(&booking, status, user.id)
        .await?;

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "update_booking_status", "booking")
                .entity_id(id)
                .details(serde_json::json!({
                    "old_status": booking.status,
                    "new_status": status,
                    "ticket_status": status.cascaded_ticket_status(),
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message(
        "Booking status updated successfully",
    )))
}

#[delete("/{id}")]
pub async fn cancel_booking(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let booking = repos
        .bookings
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    check_booking_access(&user, &booking)?;

    if booking.status == BookingStatus::Confirmed
        && !user.has_permission(Permission::OverrideLocks)
    {
        return Err(AppError::Validation(
            "Cannot cancel confirmed booking without override permission".to_string(),
        ));
    }

    repos
        .bookings
        .update_status_cascade(&booking, BookingStatus::Cancelled, user.id)
        .await?;

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "cancel_booking", "booking")
                .entity_id(id)
                .details(serde_json::json!({ "reason": "manual_cancellation" }))
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Booking cancelled successfully")))
}
