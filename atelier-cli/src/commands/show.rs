//! Show command implementation.

use anyhow::Result;
use colored::Colorize;
use uuid::Uuid;

use crate::client::{ApiClient, ListingView};

/// Execute the show command.
pub async fn execute(client: &ApiClient, id: Uuid) -> Result<()> {
    let listing = client.listing(id).await?;
    print_listing(&listing);
    Ok(())
}

/// Print one listing with its full audit trail.
pub fn print_listing(listing: &ListingView) {
    let status = match listing.moderation_status.as_str() {
        "approved" => listing.moderation_status.green().bold(),
        "rejected" => listing.moderation_status.red().bold(),
        "flagged" => listing.moderation_status.red(),
        _ => listing.moderation_status.yellow(),
    };

    println!();
    println!("{} {}", listing.title.bold(), status);
    println!("  {} {}", "id:".dimmed(), listing.id);
    println!(
        "  {} {} ({})",
        "seller:".dimmed(),
        listing.seller_name,
        listing.seller_id
    );
    println!("  {} {}", "category:".dimmed(), listing.category);
    println!("  {} {:.2}", "price:".dimmed(), listing.price);
    println!("  {} {}", "revision:".dimmed(), listing.revision);
    if let Some(reason) = &listing.moderation_reason {
        println!("  {} {}", "reason:".dimmed(), reason);
    }

    if listing.moderation_logs.is_empty() {
        return;
    }

    println!();
    println!("  {}", "Audit trail:".bold());
    for entry in &listing.moderation_logs {
        let confidence = entry
            .confidence
            .map(|c| format!(" ({:.2})", c))
            .unwrap_or_default();
        println!(
            "    {} {} {}{}",
            entry.timestamp.to_rfc3339().dimmed(),
            entry.kind,
            entry.status,
            confidence
        );
        if !entry.reason.is_empty() {
            println!("      {}", entry.reason.dimmed());
        }
    }
    println!();
}
