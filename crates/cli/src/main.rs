//! Gardu CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! gardu-cli migrate
//!
//! # Seed the first staff account
//! gardu-cli seed -u petugas -e petugas@example.test -p <password>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Create the first staff account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gardu-cli")]
#[command(author, version, about = "Gardu CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the first staff account
    Seed {
        /// Staff display name
        #[arg(short, long)]
        username: String,

        /// Staff login email address
        #[arg(short, long)]
        email: String,

        /// Plaintext password (stored only as an argon2 hash)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            username,
            email,
            password,
        } => {
            commands::seed::staff_account(&username, &email, &password).await?;
        }
    }
    Ok(())
}
