//! Integration tests for the invoice upload-and-notify flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running (cargo run -p gardu-admin)
//!
//! The sending path depends on the configured SMTP relay; these tests only
//! exercise the failure and validation branches that do not require a
//! deliverable mailbox. The gateway-failure contract itself is covered by
//! unit tests against the stubbed gateway.
//!
//! Run with: cargo test -p gardu-integration-tests -- --ignored

use gardu_integration_tests::{admin_base_url, client, register_and_login, unique_idpel};
use reqwest::{StatusCode, multipart};

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_upload_form_shows_customer() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    let idpel = unique_idpel();
    let resp = client
        .post(format!("{base_url}/customers"))
        .form(&[
            ("idpel", idpel.as_str()),
            ("name", "Budi"),
            ("email", "budi@test.com"),
            ("phone", "0800"),
        ])
        .send()
        .await
        .expect("Failed to create customer");
    assert!(resp.status().is_success());

    let body = client
        .get(format!("{base_url}/customers/{idpel}/upload"))
        .send()
        .await
        .expect("Failed to get upload form")
        .text()
        .await
        .expect("Failed to read response");

    assert!(body.contains("Budi"));
    assert!(body.contains("budi@test.com"));

    let _ = client
        .post(format!("{base_url}/customers/{idpel}/delete"))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_upload_to_missing_customer_not_found() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    let idpel = unique_idpel();
    let form = multipart::Form::new().part(
        "files",
        multipart::Part::bytes(b"%PDF-".to_vec()).file_name("tagihan.pdf"),
    );

    let resp = client
        .post(format!("{base_url}/customers/{idpel}/upload"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to post upload");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_upload_without_files_rejected() {
    let client = client();
    let base_url = admin_base_url();
    register_and_login(&client).await;

    let idpel = unique_idpel();
    let resp = client
        .post(format!("{base_url}/customers"))
        .form(&[
            ("idpel", idpel.as_str()),
            ("name", "Budi"),
            ("email", "budi@test.com"),
            ("phone", "0800"),
        ])
        .send()
        .await
        .expect("Failed to create customer");
    assert!(resp.status().is_success());

    // Multipart body with no file parts
    let form = multipart::Form::new().text("note", "no files here");
    let resp = client
        .post(format!("{base_url}/customers/{idpel}/upload"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to post upload");

    // Redirected back to the upload form with a field error
    assert!(resp.url().path().ends_with("/upload"));
    assert!(resp.url().query().unwrap_or_default().contains("error"));

    let _ = client
        .post(format!("{base_url}/customers/{idpel}/delete"))
        .send()
        .await;
}
