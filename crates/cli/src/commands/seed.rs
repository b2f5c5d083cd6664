//! Seed the first staff account.
//!
//! Registration is normally done through the web form, but a fresh
//! deployment has nobody to log in as; this command creates the initial
//! account directly against the database.

use secrecy::SecretString;
use tracing::info;

use gardu_admin::db;
use gardu_admin::db::users::UserRepository;
use gardu_admin::services::auth::hash_password;
use gardu_core::Email;

/// Create a staff account with a hashed password.
///
/// # Errors
///
/// Returns an error if environment variables are missing, the email is
/// malformed, or the account already exists.
pub async fn staff_account(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "ADMIN_DATABASE_URL not set")?;

    let email = Email::parse(email)?;
    let password_hash = hash_password(password)?;

    // Connect to database
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let users = UserRepository::new(&pool);
    let user = users.create(username, &email, &password_hash).await?;

    info!(user_id = %user.id, email = %user.email, "Staff account created");
    Ok(())
}
