//! Review command implementation (approve / reject).

use anyhow::{bail, Result};
use colored::Colorize;
use tracing::info;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::commands::show::print_listing;

/// Execute a moderator verdict.
pub async fn execute(client: &ApiClient, id: Uuid, verdict: &str, reason: &str) -> Result<()> {
    // The server rejects empty reasons too; failing early gives a
    // friendlier message than a 400 round trip
    if reason.trim().is_empty() {
        bail!("A review requires a non-empty reason");
    }

    let listing = client.review(id, verdict, reason).await?;
    info!(listing_id = %id, verdict, "Verdict applied");

    match verdict {
        "approved" => println!("{}", "Listing approved and restored to the catalog.".green()),
        _ => println!("{}", "Listing rejected.".red()),
    }
    print_listing(&listing);

    Ok(())
}
