//! Integration tests for Gardu.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p gardu-cli -- migrate
//!
//! # Start the admin server
//! cargo run -p gardu-admin
//!
//! # Run integration tests
//! cargo test -p gardu-integration-tests -- --ignored
//! ```
//!
//! The tests drive the running server over HTTP with a cookie-carrying
//! client, registering a throwaway staff account per test for the
//! authenticated routes.

use reqwest::Client;
use uuid::Uuid;

/// Base URL for the admin panel (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create an HTTP client that carries session cookies across requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a throwaway staff account and log the client in.
///
/// Returns the account email so tests can assert on it.
///
/// # Panics
///
/// Panics if registration or login fails.
pub async fn register_and_login(client: &Client) -> String {
    let base_url = admin_base_url();
    let email = format!("staff-{}@integration.test", Uuid::new_v4());
    let password = format!("pw-{}", Uuid::new_v4());

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("username", "Integration Staff"),
            ("email", &email),
            ("password", &password),
        ])
        .send()
        .await
        .expect("Failed to register test account");
    assert!(resp.status().is_success() || resp.status().is_redirection());

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", &email), ("password", &password)])
        .send()
        .await
        .expect("Failed to log in test account");
    assert!(resp.status().is_success() || resp.status().is_redirection());

    email
}

/// Generate a unique IDPEL for a test customer.
#[must_use]
pub fn unique_idpel() -> String {
    // Numeric-looking and unique across runs
    format!("52{}", Uuid::new_v4().as_u128() % 10_000_000_000)
}
