use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use std::{
    future::{ready, Future, Ready},
    pin::Pin,
    rc::Rc,
    sync::Arc,
};
use ticketpro_shared::{Permission, UserRole};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::User;
use crate::repositories::UserRepository;
use crate::utils::jwt::JwtService;

/// Caller identity attached to the request after the bearer token and the
/// user's account status have been verified.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }

    /// Gate an endpoint on a capability; 403 when the role lacks it.
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Permission '{permission}' required"
            )))
        }
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            role: user.role,
        }
    }
}

impl actix_web::FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(user.ok_or_else(|| {
            AppError::Authentication("Authentication required".to_string())
        }))
    }
}

pub struct AuthMiddleware {
    jwt_service: Arc<JwtService>,
    users: UserRepository,
}

impl AuthMiddleware {
    pub fn new(jwt_service: Arc<JwtService>, users: UserRepository) -> Self {
        Self { jwt_service, users }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_service: self.jwt_service.clone(),
            users: self.users.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_service: Arc<JwtService>,
    users: UserRepository,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let jwt_service = self.jwt_service.clone();
        let users = self.users.clone();

        Box::pin(async move {
            let token = bearer_token(&req)
                .ok_or_else(|| AppError::Authentication("Access token required".to_string()))?;

            let claims = jwt_service.validate_token(&token)?;
            let user_id = claims.user_id()?;

            let user = users
                .find_by_id(user_id)
                .await?
                .filter(User::is_active)
                .ok_or_else(|| {
                    AppError::Authentication("User not found or inactive".to_string())
                })?;

            req.extensions_mut().insert(AuthenticatedUser::from(user));
            service.call(req).await
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}
