//! Customer feedback submission

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::forms::validate_body;
use crate::models::{FeedbackForm, NewFeedback};
use crate::state::SharedState;
use axum::{extract::State, response::Redirect, Form};
use tracing::info;

/// POST /Feedback/Create
pub async fn create_feedback(
    State(state): State<SharedState>,
    CurrentUser(claims): CurrentUser,
    Form(form): Form<FeedbackForm>,
) -> ApiResult<Redirect> {
    let form = form.trimmed();
    validate_body("CreateFeedback", &form)?;

    let feedback = state
        .feedbacks
        .insert(NewFeedback {
            user_id: claims.sub,
            parent_id: None,
            content: form.content,
        })
        .await?;

    info!("Feedback {} posted by user {}", feedback.feedback_id, claims.sub);
    Ok(Redirect::to("/"))
}
