use actix_web::HttpRequest;

use crate::models::activity_log::RequestMeta;

pub mod auth;
pub mod bookings;
pub mod health;
pub mod settings;
pub mod ticket_batches;
pub mod tickets;
pub mod users;

/// Caller address and agent, recorded with every activity-log entry.
pub fn request_meta(req: &HttpRequest) -> RequestMeta {
    RequestMeta {
        ip_address: req
            .connection_info()
            .realip_remote_addr()
            .map(|ip| ip.to_string()),
        user_agent: req
            .headers()
            .get("User-Agent")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string()),
    }
}
