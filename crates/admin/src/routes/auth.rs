//! Authentication route handlers.
//!
//! Handles staff login, registration, and logout against the local
//! `PostgreSQL` credential store.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::set_current_user;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state
        .auth_service()
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            Redirect::to("/customers").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            let redirect_url = format!("/auth/login?error={}", urlencoding::encode(&e.summary()));
            Redirect::to(&redirect_url).into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    match state
        .auth_service()
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(_) => Redirect::to(&format!(
            "/auth/login?success={}",
            urlencoding::encode("Registration successful! You can now log in.")
        ))
        .into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            let redirect_url = format!(
                "/auth/register?error={}",
                urlencoding::encode(&e.summary())
            );
            Redirect::to(&redirect_url).into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Session destruction is best effort; the user lands on the login page
/// either way.
pub async fn logout(session: Session) -> Response {
    crate::services::auth::logout(&session).await;

    Redirect::to(&format!(
        "/auth/login?success={}",
        urlencoding::encode("You have been logged out")
    ))
    .into_response()
}
