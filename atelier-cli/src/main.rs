//! Atelier CLI - moderation console for the marketplace integrity API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use uuid::Uuid;

mod client;
mod commands;

use client::{ApiClient, DEFAULT_SERVER_URL};

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Moderation console for the Atelier marketplace", long_about = None)]
struct Cli {
    /// Server base URL (or set ATELIER_SERVER_URL)
    #[arg(long, global = true, env = "ATELIER_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the listings awaiting review
    Queue,

    /// Show one listing with its full audit trail
    Show {
        /// Listing id
        #[arg(value_name = "LISTING_ID")]
        id: Uuid,
    },

    /// Approve a queued listing (restores it to the catalog)
    Approve {
        /// Listing id
        #[arg(value_name = "LISTING_ID")]
        id: Uuid,

        /// Written justification for the verdict
        #[arg(short, long)]
        reason: String,
    },

    /// Reject a queued listing (terminal for this authoring cycle)
    Reject {
        /// Listing id
        #[arg(value_name = "LISTING_ID")]
        id: Uuid,

        /// Written justification for the verdict
        #[arg(short, long)]
        reason: String,
    },

    /// File a community integrity report against a listing
    Report {
        /// Listing id
        #[arg(value_name = "LISTING_ID")]
        id: Uuid,

        /// Why the listing looks untrustworthy
        #[arg(short, long)]
        reason: String,
    },

    /// Check server health and readiness
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.server)?;

    match cli.command {
        Commands::Queue => commands::queue::execute(&client).await,
        Commands::Show { id } => commands::show::execute(&client, id).await,
        Commands::Approve { id, reason } => {
            commands::review::execute(&client, id, "approved", &reason).await
        }
        Commands::Reject { id, reason } => {
            commands::review::execute(&client, id, "rejected", &reason).await
        }
        Commands::Report { id, reason } => commands::report::execute(&client, id, &reason).await,
        Commands::Health => commands::health::execute(&client).await,
    }
}
