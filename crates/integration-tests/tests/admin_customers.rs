//! Integration tests for customer management.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running (cargo run -p gardu-admin)
//!
//! Run with: cargo test -p gardu-integration-tests -- --ignored

use gardu_integration_tests::{admin_base_url, client, register_and_login, unique_idpel};
use reqwest::{Client, StatusCode};

/// Test helper: Create a customer via the form endpoint.
async fn create_customer(client: &Client, idpel: &str, name: &str, email: &str) {
    let base_url = admin_base_url();
    let resp = client
        .post(format!("{base_url}/customers"))
        .form(&[
            ("idpel", idpel),
            ("name", name),
            ("email", email),
            ("phone", "0800"),
        ])
        .send()
        .await
        .expect("Failed to create customer");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.url().query().unwrap_or_default().contains("success"),
        "expected success redirect, got: {:?}",
        resp.url().query()
    );
}

/// Test helper: Delete a customer, ignoring failures.
async fn delete_customer(client: &Client, idpel: &str) {
    let base_url = admin_base_url();
    let _ = client
        .post(format!("{base_url}/customers/{idpel}/delete"))
        .send()
        .await;
}

// ============================================================================
// Create & Get
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_create_then_get_customer() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    let idpel = unique_idpel();
    create_customer(&client, &idpel, "Budi", "budi@test.com").await;

    // The edit form is prefilled from the stored record
    let resp = client
        .get(format!("{base_url}/customers/{idpel}/edit"))
        .send()
        .await
        .expect("Failed to get edit form");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(&idpel));
    assert!(body.contains("Budi"));
    assert!(body.contains("budi@test.com"));

    delete_customer(&client, &idpel).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_create_duplicate_idpel_conflicts() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    let idpel = unique_idpel();
    create_customer(&client, &idpel, "Budi", "budi@test.com").await;

    // Same IDPEL again: rejected, and the roster still has exactly one row
    let resp = client
        .post(format!("{base_url}/customers"))
        .form(&[
            ("idpel", idpel.as_str()),
            ("name", "Budi Kedua"),
            ("email", "budi2@test.com"),
            ("phone", "0800"),
        ])
        .send()
        .await
        .expect("Failed to post create");

    assert!(
        resp.url()
            .query()
            .unwrap_or_default()
            .contains("IDPEL%20already%20exists")
            || resp.url().query().unwrap_or_default().contains("error"),
    );

    let body = client
        .get(format!("{base_url}/customers"))
        .send()
        .await
        .expect("Failed to get roster")
        .text()
        .await
        .expect("Failed to read roster");
    assert_eq!(body.matches(&idpel).count(), 1, "expected exactly one row");
    assert!(!body.contains("Budi Kedua"));

    delete_customer(&client, &idpel).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_create_invalid_email_rejected() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    let idpel = unique_idpel();
    let resp = client
        .post(format!("{base_url}/customers"))
        .form(&[
            ("idpel", idpel.as_str()),
            ("name", "Budi"),
            ("email", "budi@test.com, not-an-email"),
            ("phone", "0800"),
        ])
        .send()
        .await
        .expect("Failed to post create");

    assert!(resp.url().query().unwrap_or_default().contains("error"));

    // Nothing was stored
    let resp = client
        .get(format!("{base_url}/customers/{idpel}/edit"))
        .send()
        .await
        .expect("Failed to get edit form");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Update & Delete
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_update_replaces_fields_wholesale() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    let idpel = unique_idpel();
    create_customer(&client, &idpel, "Budi", "budi@test.com").await;

    let resp = client
        .post(format!("{base_url}/customers/{idpel}"))
        .form(&[
            ("name", "Budi Santoso"),
            ("email", "budi@test.com, keuangan@test.com"),
            ("phone", "0811"),
        ])
        .send()
        .await
        .expect("Failed to post update");
    assert!(resp.url().query().unwrap_or_default().contains("success"));

    let body = client
        .get(format!("{base_url}/customers/{idpel}/edit"))
        .send()
        .await
        .expect("Failed to get edit form")
        .text()
        .await
        .expect("Failed to read response");
    assert!(body.contains("Budi Santoso"));
    assert!(body.contains("keuangan@test.com"));
    assert!(body.contains("0811"));

    delete_customer(&client, &idpel).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_update_missing_customer_not_found() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    // Never created
    let idpel = unique_idpel();
    let resp = client
        .post(format!("{base_url}/customers/{idpel}"))
        .form(&[
            ("name", "Nobody"),
            ("email", "nobody@test.com"),
            ("phone", ""),
        ])
        .send()
        .await
        .expect("Failed to post update");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_delete_missing_customer_not_found() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    let idpel = unique_idpel();
    let resp = client
        .post(format!("{base_url}/customers/{idpel}/delete"))
        .send()
        .await
        .expect("Failed to post delete");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_delete_removes_row() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    let idpel = unique_idpel();
    create_customer(&client, &idpel, "Budi", "budi@test.com").await;

    let resp = client
        .post(format!("{base_url}/customers/{idpel}/delete"))
        .send()
        .await
        .expect("Failed to post delete");
    assert!(resp.url().query().unwrap_or_default().contains("success"));

    let resp = client
        .get(format!("{base_url}/customers/{idpel}/edit"))
        .send()
        .await
        .expect("Failed to get edit form");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Roster & Search
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_roster_search_filters_by_name_substring() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    let match_idpel = unique_idpel();
    let other_idpel = unique_idpel();
    // Unique marker so the assertion is immune to leftover rows
    let marker = format!("Zulkifli-{}", &match_idpel);
    create_customer(&client, &match_idpel, &marker, "zul@test.com").await;
    create_customer(&client, &other_idpel, "Rahmat", "rahmat@test.com").await;

    let body = client
        .get(format!("{base_url}/customers?q={marker}"))
        .send()
        .await
        .expect("Failed to search")
        .text()
        .await
        .expect("Failed to read response");

    assert!(body.contains(&match_idpel));
    assert!(!body.contains(&other_idpel));

    delete_customer(&client, &match_idpel).await;
    delete_customer(&client, &other_idpel).await;
}
