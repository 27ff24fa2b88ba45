use actix_web::{get, post, web, HttpRequest, HttpResponse};
use std::sync::Arc;
use ticketpro_shared::{ApiResponse, LoginData, LoginRequest};
use validator::Validate;

use crate::error::AppError;
use crate::handlers::request_meta;
use crate::middleware::AuthenticatedUser;
use crate::repositories::{NewActivityLog, Repositories};
use crate::utils::jwt::JwtService;

#[post("/login")]
pub async fn login(
    repos: web::Data<Repositories>,
    jwt_service: web::Data<Arc<JwtService>>,
    request: web::Json<LoginRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let user = repos
        .users
        .find_by_username(&request.username)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

    if !user.is_active() {
        return Err(AppError::Authentication("Account is inactive".to_string()));
    }

    let password_ok = bcrypt::verify(&request.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;
    if !password_ok {
        return Err(AppError::Authentication(
            "Invalid username or password".to_string(),
        ));
    }

    repos.users.update_last_login(user.id).await?;

    repos
        .activity
        .record(NewActivityLog::new(user.id, "login", "auth").meta(request_meta(&http_req)))
        .await;

    let token = jwt_service.generate_token(&user)?;
    tracing::info!("user '{}' logged in", user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Login successful",
        LoginData {
            user: user.into_response(),
            token,
        },
    )))
}

#[get("/me")]
pub async fn me(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let profile = repos
        .users
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "User profile retrieved",
        profile.into_response(),
    )))
}

#[post("/logout")]
pub async fn logout() -> HttpResponse {
    // Tokens are stateless; logout is an acknowledgement for the client.
    HttpResponse::Ok().json(ApiResponse::message("Logout successful"))
}
