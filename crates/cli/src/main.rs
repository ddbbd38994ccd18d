//! Donelist CLI - Database migrations and user management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! dl-cli migrate
//!
//! # Create a user account
//! dl-cli user create -u alice -p secret123
//!
//! # Delete a user account and all of their todos
//! dl-cli user delete -u alice
//! ```
//!
//! # Commands
//!
//! - `migrate` - Apply database migrations
//! - `user create` - Register a user account
//! - `user delete` - Remove a user account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dl-cli")]
#[command(author, version, about = "Donelist CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user account
    Create {
        /// Username to register
        #[arg(short, long)]
        username: String,

        /// Password for the account
        #[arg(short, long)]
        password: String,
    },
    /// Delete a user account and all of their todos
    Delete {
        /// Username to delete
        #[arg(short, long)]
        username: String,
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
        Commands::User { action } => match action {
            UserAction::Create { username, password } => {
                commands::user::create(&username, &password).await?;
            }
            UserAction::Delete { username } => {
                commands::user::delete(&username).await?;
            }
        },
    }
    Ok(())
}
