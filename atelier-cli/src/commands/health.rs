//! Health command implementation.

use anyhow::Result;
use colored::Colorize;

use crate::client::ApiClient;

/// Execute the health command.
pub async fn execute(client: &ApiClient) -> Result<()> {
    let health = client.health().await?;
    let ready = client.ready().await?;

    println!();
    println!(
        "  {} {} v{}",
        "service:".dimmed(),
        health.service,
        health.version
    );
    println!(
        "  {} {}",
        "status:".dimmed(),
        if health.status == "healthy" {
            health.status.green()
        } else {
            health.status.red()
        }
    );
    println!(
        "  {} {}",
        "ready:".dimmed(),
        if ready.ready {
            "yes".green()
        } else {
            "no".red()
        }
    );
    println!("  {} {}", "catalog:".dimmed(), ready.catalog);
    println!("  {} {}", "classifier:".dimmed(), ready.classifier);
    if let Some(message) = &ready.message {
        println!("  {} {}", "message:".dimmed(), message);
    }
    println!();

    Ok(())
}
