//! Queue command implementation.

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use crate::client::ApiClient;

/// Execute the queue command.
pub async fn execute(client: &ApiClient) -> Result<()> {
    let queue = client.queue().await?;
    info!(count = queue.len(), "Fetched review queue");

    if queue.is_empty() {
        println!("{}", "Review queue is empty.".green());
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!("{} listing(s) awaiting review", queue.len()).bold()
    );
    println!();

    for listing in queue {
        let status = match listing.moderation_status.as_str() {
            "flagged" => listing.moderation_status.red().bold(),
            _ => listing.moderation_status.yellow(),
        };

        println!("  {} {}", listing.id.to_string().dimmed(), status);
        println!("     {} ({})", listing.title.bold(), listing.seller_name);
        if let Some(reason) = &listing.moderation_reason {
            println!("     {} {}", "reason:".dimmed(), reason);
        }
        println!(
            "     {} {}",
            "updated:".dimmed(),
            listing.updated_at.to_rfc3339()
        );
        println!();
    }

    Ok(())
}
