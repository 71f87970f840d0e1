//! Session middleware and extractors
//!
//! Reads the session cookie, exposes the claims to handlers and slides the
//! idle timeout forward on each response.

use crate::auth::{Claims, Role};
use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;
use tracing::{debug, info, warn};

/// Decode the session cookie and refresh it after the handler ran
///
/// The account is reloaded on every request, so a session ends as soon as
/// the user is removed, changes role or has their registration withdrawn.
pub async fn session_middleware(
    State(state): State<SharedState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let decoded = jar
        .get(state.sessions.cookie_name())
        .and_then(|cookie| match state.sessions.decode(cookie.value()) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Ignoring session cookie: {}", e);
                None
            }
        });

    let mut revoked = false;
    let claims = match decoded {
        Some(claims) => match session_account_is_active(&state, &claims).await {
            Ok(true) => Some(claims),
            Ok(false) => {
                info!("Ending session of user {} ({})", claims.sub, claims.email);
                revoked = true;
                None
            }
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    if let Some(claims) = &claims {
        request.extensions_mut().insert(claims.clone());
    }

    let mut response = next.run(request).await;

    // Login and logout set the cookie themselves
    let handler_set_cookie = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&format!("{}=", state.sessions.cookie_name())));
    if handler_set_cookie {
        return response;
    }

    let cookie = match claims {
        Some(claims) => match state.sessions.refresh(&claims) {
            Ok(token) => state.sessions.cookie(token),
            Err(e) => {
                warn!("Could not refresh session: {}", e);
                return response;
            }
        },
        None if revoked => state.sessions.removal_cookie(),
        None => return response,
    };

    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => warn!("Could not encode session cookie: {}", e),
    }

    response
}

/// The account must still exist with the session's role and be allowed to sign in
async fn session_account_is_active(state: &SharedState, claims: &Claims) -> Result<bool, AppError> {
    Ok(state
        .users
        .find(claims.sub)
        .await?
        .is_some_and(|user| user.role == claims.role && user.can_sign_in()))
}

/// Require specific role
pub fn require_role(claims: &Claims, required: Role) -> Result<(), AppError> {
    let has_permission = match required {
        Role::Customer => true,
        Role::TravelAgent => claims.role.can_manage_tours(),
        Role::Admin => claims.role.can_administer(),
    };

    if !has_permission {
        return Err(AppError::Forbidden(format!(
            "Requires {} role, you have {}",
            required, claims.role
        )));
    }

    Ok(())
}

fn session_claims(parts: &Parts) -> Result<Claims, AppError> {
    parts
        .extensions
        .get::<Claims>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Please log in to continue".to_string()))
}

/// Any logged-in user
pub struct CurrentUser(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_claims(parts).map(CurrentUser)
    }
}

/// A logged-in administrator
pub struct AdminUser(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = session_claims(parts)?;
        require_role(&claims, Role::Admin)?;
        Ok(AdminUser(claims))
    }
}

/// An administrator or travel agent, allowed to manage tours
pub struct StaffUser(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = session_claims(parts)?;
        require_role(&claims, Role::TravelAgent)?;
        Ok(StaffUser(claims))
    }
}

/// The session user when there is one
pub struct MaybeUser(pub Option<Claims>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Claims>().cloned()))
    }
}
