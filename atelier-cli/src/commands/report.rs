//! Report command implementation.

use anyhow::{bail, Result};
use colored::Colorize;
use tracing::info;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::commands::show::print_listing;

/// Execute the report command.
pub async fn execute(client: &ApiClient, id: Uuid, reason: &str) -> Result<()> {
    if reason.trim().is_empty() {
        bail!("A report requires a non-empty reason");
    }

    let listing = client.report(id, reason).await?;
    info!(listing_id = %id, "Report filed");

    println!("{}", "Report recorded.".yellow());
    print_listing(&listing);

    Ok(())
}
