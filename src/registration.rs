//! Travel-agent registration approval
//!
//! An administrator accepts or rejects a pending request. The applicant is
//! notified by email, but the decision is recorded whether or not the email
//! goes out.

use crate::error::{ApiResult, AppError};
use crate::mailer::OutgoingEmail;
use crate::models::RegistrationStatus;
use crate::state::AppState;
use tracing::{info, warn};

/// Outcome chosen by the administrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Unaccept,
}

impl Decision {
    pub fn status(&self) -> RegistrationStatus {
        match self {
            Decision::Accept => RegistrationStatus::Accept,
            Decision::Unaccept => RegistrationStatus::Unaccept,
        }
    }

    fn email(&self, to: &str) -> OutgoingEmail {
        let body = match self {
            Decision::Accept => {
                "Your travel agent registration has been approved. You can now log in and manage your tours."
            }
            Decision::Unaccept => {
                "We are unable to provide travel agent services to your account at this time. Please contact the administrator for details."
            }
        };
        OutgoingEmail {
            to: to.to_string(),
            subject: format!("Hello {}", to),
            body: body.to_string(),
        }
    }
}

/// Notify the applicant and record the decision
///
/// `email` overrides the stored address when it is non-blank. Returns whether
/// the notification was delivered.
pub async fn decide(
    state: &AppState,
    user_id: i32,
    email: Option<&str>,
    decision: Decision,
) -> ApiResult<bool> {
    let user = state
        .users
        .find(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let recipient = email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(&user.email);

    let delivered = match state.mailer.send(decision.email(recipient)).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Registration email to {} for user {} failed: {}",
                recipient, user_id, e
            );
            false
        }
    };

    let status = decision.status();
    if !state.users.set_registration_status(user_id, status).await? {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    info!("Registration of user {} set to {}", user_id, status);
    Ok(delivered)
}
