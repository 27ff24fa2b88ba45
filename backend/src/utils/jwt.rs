use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use ticketpro_shared::{UserRole, JWT_MIN_SECRET_LEN, JWT_TOKEN_EXPIRY};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // user id
    pub username: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.len() < JWT_MIN_SECRET_LEN {
            return Err(AppError::Internal(format!(
                "JWT_SECRET must be at least {JWT_MIN_SECRET_LEN} characters long"
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub", "iat"]);
        validation.leeway = 30; // clock skew

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now
            + Duration::from_std(JWT_TOKEN_EXPIRY)
                .map_err(|_| AppError::Internal("Invalid token expiry duration".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to encode JWT: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use ticketpro_shared::UserStatus;

    const SECRET: &str = "a-test-secret-that-is-long-enough-to-pass";

    fn test_user() -> User {
        let now: DateTime<Utc> = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "manager".to_string(),
            password_hash: String::new(),
            name: "Manager User".to_string(),
            email: None,
            phone: None,
            role: UserRole::Manager,
            status: UserStatus::Active,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn rejects_short_secrets() {
        assert!(JwtService::new("too-short").is_err());
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let service = JwtService::new(SECRET).unwrap();
        let user = test_user();

        let token = service.generate_token(&user).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.username, "manager");
        assert_eq!(claims.role, UserRole::Manager);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let service = JwtService::new(SECRET).unwrap();
        let other = JwtService::new("another-secret-that-is-also-long-enough").unwrap();

        let token = other.generate_token(&test_user()).unwrap();
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn rejects_expired_tokens() {
        let service = JwtService::new(SECRET).unwrap();
        let user = test_user();

        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn rejects_garbage_tokens() {
        let service = JwtService::new(SECRET).unwrap();
        assert!(service.validate_token("not-a-jwt").is_err());
    }
}
