//! Advanced cart CLI - Database migrations and cart management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (orders, settings, sessions)
//! ac-cli migrate
//!
//! # Show or change the cart settings
//! ac-cli settings get
//! ac-cli settings set display-non-current-carts true
//!
//! # Save a cart for later / make it current again
//! ac-cli carts archive 101
//! ac-cli carts restore 101
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::settings::SettingKey;

#[derive(Parser)]
#[command(name = "ac-cli")]
#[command(author, version, about = "Advanced cart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Show or change cart settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Archive or restore carts
    Carts {
        #[command(subcommand)]
        action: CartsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current cart settings as JSON
    Get,
    /// Change one cart setting
    Set {
        /// Setting to change
        #[arg(value_enum)]
        key: SettingKey,

        /// New value
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

#[derive(Subcommand)]
enum CartsAction {
    /// Mark a cart non-current
    Archive {
        /// Order ID of the cart
        cart_id: i32,
    },
    /// Make a cart current again, archiving the cart it replaces
    Restore {
        /// Order ID of the cart
        cart_id: i32,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Settings { action } => match action {
            SettingsAction::Get => commands::settings::get().await?,
            SettingsAction::Set { key, value } => commands::settings::set(key, value).await?,
        },
        Commands::Carts { action } => match action {
            CartsAction::Archive { cart_id } => commands::carts::archive(cart_id).await?,
            CartsAction::Restore { cart_id } => commands::carts::restore(cart_id).await?,
        },
    }
    Ok(())
}
