//! Account route handlers: registration, login and logout

use crate::auth::{hash_password, verify_password, Role};
use crate::error::{ApiResult, AppError};
use crate::forms::validate_body;
use crate::models::{LoginForm, NewUser, RegisterForm, RegistrationStatus};
use crate::state::SharedState;
use axum::{extract::State, response::Redirect, Form};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

/// POST /Account/Register
pub async fn register(
    State(state): State<SharedState>,
    Form(form): Form<RegisterForm>,
) -> ApiResult<Redirect> {
    let form = form.normalized();
    validate_body(RegisterForm::VIEW, &form)?;

    if state.users.find_by_email(&form.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let (role, registration_status) = if form.travel_agent {
        (Role::TravelAgent, Some(RegistrationStatus::Pending))
    } else {
        (Role::Customer, None)
    };

    let user = state
        .users
        .insert(NewUser {
            email: form.email,
            password_hash: hash_password(&form.password)?,
            first_name: form.first_name,
            last_name: form.last_name,
            phone_number: form.phone_number,
            role,
            registration_status,
        })
        .await?;

    info!("User registered: {} (id: {}, role: {})", user.email, user.user_id, user.role);
    Ok(Redirect::to("/Account/Login"))
}

/// POST /Account/Login
pub async fn login(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<(CookieJar, Redirect)> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .users
        .find_by_email(form.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&form.password, &user.password_hash)? {
        warn!("Failed login attempt for {}", user.email);
        return Err(invalid());
    }

    if !user.can_sign_in() {
        return Err(AppError::Forbidden(
            "Your travel agent registration has not been accepted yet".to_string(),
        ));
    }

    let token = state.sessions.issue(&user)?;
    info!("User logged in: {} (id: {})", user.email, user.user_id);
    Ok((jar.add(state.sessions.cookie(token)), Redirect::to("/")))
}

/// POST /Account/Logout
pub async fn logout(State(state): State<SharedState>, jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.add(state.sessions.removal_cookie()), Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use crate::auth::Role;
    use crate::db::UserRepository;
    use crate::models::RegistrationStatus;
    use crate::test_support::TestApp;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    const PASSWORD: &str = "correct-horse";

    async fn register(app: &TestApp, email: &str, travel_agent: bool) -> StatusCode {
        let agent = if travel_agent { "true" } else { "false" };
        app.post_form(
            "/Account/Register",
            None,
            &[
                ("Email", email),
                ("Password", PASSWORD),
                ("FirstName", "Mai"),
                ("LastName", ""),
                ("PhoneNumber", ""),
                ("TravelAgent", agent),
            ],
        )
        .await
        .status
    }

    async fn login(app: &TestApp, email: &str, password: &str) -> crate::test_support::TestResponse {
        app.post_form(
            "/Account/Login",
            None,
            &[("Email", email), ("Password", password)],
        )
        .await
    }

    #[tokio::test]
    async fn test_register_then_login_sets_session_cookie() {
        let app = TestApp::new();
        assert_eq!(register(&app, "mai@travel.vn", false).await, StatusCode::SEE_OTHER);

        let user = app.store.find_by_email("mai@travel.vn").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Customer);
        assert_ne!(user.password_hash, PASSWORD);
        assert_eq!(user.last_name, None);

        let response = login(&app, "mai@travel.vn", PASSWORD).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert!(response
            .set_cookie
            .iter()
            .any(|c| c.starts_with("travelbook_session=") && c.contains("HttpOnly")));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let app = TestApp::new();
        register(&app, "dup@travel.vn", false).await;
        assert_eq!(register(&app, "dup@travel.vn", false).await, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let app = TestApp::new();
        register(&app, "mai@travel.vn", false).await;

        assert_eq!(
            login(&app, "mai@travel.vn", "wrong-password").await.status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            login(&app, "nobody@travel.vn", PASSWORD).await.status,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_travel_agent_waits_for_acceptance() {
        let app = TestApp::new();
        register(&app, "agent@travel.vn", true).await;

        let user = app.store.find_by_email("agent@travel.vn").await.unwrap().unwrap();
        assert_eq!(user.role, Role::TravelAgent);
        assert_eq!(user.registration_status, Some(RegistrationStatus::Pending));

        assert_eq!(
            login(&app, "agent@travel.vn", PASSWORD).await.status,
            StatusCode::FORBIDDEN
        );

        app.store
            .set_registration_status(user.user_id, RegistrationStatus::Accept)
            .await
            .unwrap();
        assert_eq!(
            login(&app, "agent@travel.vn", PASSWORD).await.status,
            StatusCode::SEE_OTHER
        );
    }

    #[tokio::test]
    async fn test_invalid_registration_is_rejected() {
        let app = TestApp::new();
        let response = app
            .post_form(
                "/Account/Register",
                None,
                &[("Email", "not-an-email"), ("Password", "123")],
            )
            .await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.json["errors"]["Email"].is_array());
        assert!(response.json["errors"]["Password"].is_array());
        assert!(response.json["model"].get("Password").is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let app = TestApp::new();
        let (_, cookie) = app.login_as(Role::Customer).await;

        let response = app.post_form("/Account/Logout", Some(&cookie), &[]).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.set_cookie.len(), 1);
        assert!(response.set_cookie[0].starts_with("travelbook_session=;"));
    }
}
