use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use ticketpro_shared::{
    ApiResponse, ChangePasswordRequest, CreateUserRequest, Permission, UpdateProfileRequest,
    UpdateUserRequest, UserResponse, UserRole,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::handlers::request_meta;
use crate::middleware::AuthenticatedUser;
use crate::models::User;
use crate::repositories::{NewActivityLog, Repositories};
use crate::utils::validation::{validate_phone, validate_username};

#[get("")]
pub async fn list_users(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::ManageUsers)?;

    let users: Vec<UserResponse> = repos
        .users
        .find_all()
        .await?
        .into_iter()
        .map(User::into_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Users retrieved successfully",
        serde_json::json!({ "users": users }),
    )))
}

#[post("")]
pub async fn create_user(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    request: web::Json<CreateUserRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::ManageUsers)?;
    request.validate()?;
    validate_username(&request.username)
        .map_err(|_| AppError::Validation("Invalid username format".to_string()))?;

    if repos
        .users
        .find_by_username(&request.username)
        .await?
        .is_some()
    {
        return Err(AppError::Validation("Username already exists".to_string()));
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;
    let created = repos.users.create(&request, password_hash).await?;

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "create_user", "user")
                .entity_id(created.id)
                .details(serde_json::json!({
                    "username": created.username,
                    "role": created.role,
                    "created_by": user.name,
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "User created successfully",
        serde_json::json!({ "user": created.into_response() }),
    )))
}

#[put("/profile/me")]
pub async fn update_profile(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    if let Some(phone) = &request.phone {
        validate_phone(phone)
            .map_err(|_| AppError::Validation("Invalid phone number".to_string()))?;
    }

    let updated = repos
        .users
        .update_profile(user.id, &request)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Profile updated successfully",
        serde_json::json!({ "user": updated.into_response() }),
    )))
}

#[put("/profile/password")]
pub async fn change_password(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    request: web::Json<ChangePasswordRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    if !request.passwords_match() {
        return Err(AppError::Validation("Passwords don't match".to_string()));
    }

    let account = repos
        .users
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let current_ok = bcrypt::verify(&request.current_password, &account.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;
    if !current_ok {
        return Err(AppError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&request.new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;
    repos.users.update_password(user.id, password_hash).await?;

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "update_password", "user")
                .entity_id(user.id)
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Password updated successfully")))
}

#[get("/{id}")]
pub async fn get_user(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::ManageUsers)?;

    let found = repos
        .users
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "User retrieved successfully",
        serde_json::json!({ "user": found.into_response() }),
    )))
}

#[put("/{id}")]
pub async fn update_user(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateUserRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::ManageUsers)?;
    request.validate()?;

    let id = path.into_inner();
    repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // An admin cannot demote themselves out of the admin role.
    if id == user.id && matches!(request.role, Some(role) if role != UserRole::Admin) {
        return Err(AppError::Validation(
            "Cannot change your own admin role".to_string(),
        ));
    }

    let updated = repos
        .users
        .update(id, &request)
        .await?
        .ok_or_else(|| AppError::Internal("Failed to update user".to_string()))?;

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "update_user", "user")
                .entity_id(id)
                .details(serde_json::json!({
                    "updates": request.into_inner(),
                    "updated_by": user.name,
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "User updated successfully",
        serde_json::json!({ "user": updated.into_response() }),
    )))
}

#[delete("/{id}")]
pub async fn delete_user(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::ManageUsers)?;

    let id = path.into_inner();
    if id == user.id {
        return Err(AppError::Validation(
            "Cannot delete your own account".to_string(),
        ));
    }

    let target = repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !repos.users.delete(id).await? {
        return Err(AppError::Internal("Failed to delete user".to_string()));
    }

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "delete_user", "user")
                .entity_id(id)
                .details(serde_json::json!({
                    "deleted_username": target.username,
                    "deleted_by": user.name,
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted successfully")))
}
