use actix_web::{get, HttpResponse};
use ticketpro_shared::ApiResponse;

#[get("/ping")]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::message("pong"))
}
