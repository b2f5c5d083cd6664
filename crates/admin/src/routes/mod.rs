//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (database ping)
//!
//! # Auth
//! GET  /auth/login                - Login page
//! POST /auth/login                - Login action
//! GET  /auth/register             - Register page
//! POST /auth/register             - Register action
//! POST /auth/logout               - Logout action
//!
//! # Customers (require authenticated session)
//! GET  /customers                 - Roster page (?q= name substring filter)
//! POST /customers                 - Create customer
//! GET  /customers/{idpel}/edit    - Edit form (prefilled)
//! POST /customers/{idpel}         - Update customer
//! POST /customers/{idpel}/delete  - Delete customer
//! GET  /customers/{idpel}/upload  - Invoice upload form
//! POST /customers/{idpel}/upload  - Multipart upload + email send
//! ```

pub mod auth;
pub mod customers;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Maximum multipart body size for invoice uploads (10 MiB).
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index).post(customers::create))
        .route("/{idpel}/edit", get(customers::edit_form))
        .route("/{idpel}", post(customers::update))
        .route("/{idpel}/delete", post(customers::delete))
        .route(
            "/{idpel}/upload",
            get(customers::upload_form)
                .post(customers::upload)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        // The roster is the home page
        .route("/", get(root))
        // Auth routes
        .nest("/auth", auth_routes())
        // Customer routes
        .nest("/customers", customer_routes())
}

/// Redirect the root to the customer roster.
async fn root() -> Redirect {
    Redirect::to("/customers")
}
