//! Status and audit-trail commands

use colored::*;

use crate::display;
use crate::store::StateStore;

/// Show the most recent executed transfers, newest first.
pub async fn transfers(store: &StateStore, limit: usize) -> anyhow::Result<()> {
    let engine = store.load_engine()?;
    let records = engine.recent_transfers(limit).await;

    println!("{}", "Executed Transfers".bright_white().bold());
    println!("{}", "─".repeat(80));

    if records.is_empty() {
        println!("  No transfers executed yet.");
        return Ok(());
    }

    println!("  {:<14} {:<46} {:<14}", "AMOUNT", "RECIPIENT", "BALANCE AFTER");
    println!("  {}", "─".repeat(76));
    for record in records {
        println!(
            "  {:<14} {:<46} {:<14}",
            record.amount.to_string().bright_cyan(),
            record.recipient.as_str(),
            record.balance_after.to_string(),
        );
    }
    Ok(())
}

/// Show object counts and the state file location.
pub async fn show(store: &StateStore) -> anyhow::Result<()> {
    let state = store.load()?;

    println!("{}", "Firewall Status".bright_white().bold());
    println!("{}", "─".repeat(50));
    display::kv("State file", &store.path().display().to_string());
    display::kv("Admin credentials", &state.admins.len().to_string());
    display::kv("Vaults", &state.vaults.len().to_string());
    display::kv("Permissions", &state.permissions.len().to_string());
    display::kv("Proposals", &state.proposals.len().to_string());
    display::kv("Executed transfers", &state.transfers.len().to_string());

    let pending = state.proposals.iter().filter(|p| !p.executed).count();
    if pending > 0 {
        display::info(&format!("{pending} proposal(s) still pending"));
    }
    Ok(())
}
