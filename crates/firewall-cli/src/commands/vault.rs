//! Vault commands - create, fund, inspect

use colored::*;
use firewall_types::{AdminCapId, Amount, VaultId};

use crate::display;
use crate::store::StateStore;

/// Create an empty vault under an AdminCap.
pub async fn create(store: &StateStore, admin: &str) -> anyhow::Result<()> {
    let admin = AdminCapId::parse(admin)?;
    let engine = store.load_engine()?;

    match engine.create_vault(&admin).await {
        Ok(vault) => {
            store.save_engine(&engine).await?;
            display::success("Vault created");
            display::kv("Vault", &vault.id.to_string());
            display::kv("Balance", &vault.balance.to_string());
        }
        Err(err) => display::denial(&err),
    }
    Ok(())
}

/// Deposit coins into a vault. Anyone may top up a shared vault.
pub async fn deposit(store: &StateStore, vault: &str, amount: &str) -> anyhow::Result<()> {
    let vault = VaultId::parse(vault)?;
    let amount = Amount::parse_decimal(amount)?;
    let engine = store.load_engine()?;

    match engine.deposit(&vault, amount).await {
        Ok(balance) => {
            store.save_engine(&engine).await?;
            display::success(&format!("Deposited {amount}"));
            display::kv("New balance", &balance.to_string());
        }
        Err(err) => display::denial(&err),
    }
    Ok(())
}

/// Show a vault's balance and the permissions issued against it.
pub async fn info(store: &StateStore, vault: &str) -> anyhow::Result<()> {
    let vault = VaultId::parse(vault)?;
    let engine = store.load_engine()?;

    let Some(state) = engine.vault(&vault).await else {
        display::error(&format!("Vault not found: {vault}"));
        return Ok(());
    };

    println!("{}", format!("Vault {}", state.id).bright_white().bold());
    println!("{}", "─".repeat(60));
    display::kv("Balance", &state.balance.to_string());

    let permissions = engine.permissions_for_vault(&vault).await;
    if permissions.is_empty() {
        display::info("No permissions issued against this vault");
    } else {
        println!();
        println!("  {:<42} {:<14} {:<14} {}", "PERMISSION", "CAP", "USED", "STATE");
        println!("  {}", "─".repeat(80));
        for p in permissions {
            let state = if p.revoked { "revoked".red() } else { "active".green() };
            println!(
                "  {:<42} {:<14} {:<14} {}",
                p.id.to_string().bright_cyan(),
                p.max_per_transfer.to_string(),
                p.used.to_string(),
                state,
            );
        }
    }
    Ok(())
}
