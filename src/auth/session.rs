//! Session tokens
//!
//! The session lives in a single HttpOnly cookie holding an HS256 token. The
//! token expires after the idle timeout and is re-issued on every request, so
//! an active user stays logged in while an idle one is dropped.

use crate::auth::Role;
use crate::config::SessionConfig;
use crate::error::AppError;
use crate::models::User;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: i32,
    /// User email
    pub email: String,
    /// User role
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Signing keys and cookie settings, built once from configuration
#[derive(Clone)]
pub struct SessionKeys {
    cookie_name: String,
    idle_timeout: Duration,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            idle_timeout: Duration::minutes(config.idle_timeout_minutes),
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Start a session for a freshly authenticated user
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        self.sign(user.user_id, &user.email, user.role)
    }

    /// Extend a live session by another idle period
    pub fn refresh(&self, claims: &Claims) -> Result<String, AppError> {
        self.sign(claims.sub, &claims.email, claims.role)
    }

    fn sign(&self, user_id: i32, email: &str, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            exp: (now + self.idle_timeout).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to create session token: {}", e)))
    }

    /// Decode and validate a session token
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Session expired".to_string())
                }
                _ => AppError::Unauthorized("Invalid session".to_string()),
            })
    }

    /// Cookie carrying the given token
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }

    /// Cookie that clears the session in the browser
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.cookie_name.clone(), String::new()))
            .path("/")
            .build();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(idle_minutes: i64) -> SessionKeys {
        SessionKeys::new(&SessionConfig {
            cookie_name: "test_session".to_string(),
            secret: "unit-test-secret".to_string(),
            idle_timeout_minutes: idle_minutes,
        })
    }

    #[test]
    fn test_token_round_trip() {
        let keys = keys(30);
        let token = keys.sign(12, "agent@travel.vn", Role::TravelAgent).unwrap();
        let claims = keys.decode(&token).unwrap();

        assert_eq!(claims.sub, 12);
        assert_eq!(claims.role, Role::TravelAgent);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let keys = keys(-1);
        let token = keys.sign(1, "a@b.vn", Role::Customer).unwrap();
        assert!(matches!(keys.decode(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let token = keys(30).sign(1, "a@b.vn", Role::Admin).unwrap();
        let other = SessionKeys::new(&SessionConfig {
            cookie_name: "test_session".to_string(),
            secret: "another-secret".to_string(),
            idle_timeout_minutes: 30,
        });
        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn test_cookie_is_http_only() {
        let cookie = keys(30).cookie("abc".to_string());
        assert_eq!(cookie.name(), "test_session");
        assert_eq!(cookie.http_only(), Some(true));
    }
}
