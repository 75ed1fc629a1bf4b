//! Permission commands - issue, revoke, inspect

use colored::*;
use firewall_engine::{Clock, SystemClock};
use firewall_types::{AdminCapId, Address, Amount, PermissionId, VaultId, NO_EXPIRY};

use crate::display;
use crate::store::StateStore;

const MILLIS_PER_MINUTE: u64 = 60_000;

/// Issue a scoped spending permission to an agent.
pub async fn issue(
    store: &StateStore,
    admin: &str,
    vault: &str,
    agent: &str,
    max_per_transfer: &str,
    total_quota: &str,
    expires_in_mins: u64,
) -> anyhow::Result<()> {
    let admin = AdminCapId::parse(admin)?;
    let vault = VaultId::parse(vault)?;
    let agent = Address::parse(agent)?;
    let max_per_transfer = Amount::parse_decimal(max_per_transfer)?;
    let total_quota = Amount::parse_decimal(total_quota)?;

    // Minutes-from-now, like the original console; 0 keeps the no-expiry
    // sentinel
    let expires_at = if expires_in_mins > 0 {
        SystemClock
            .now()
            .saturating_add(expires_in_mins.saturating_mul(MILLIS_PER_MINUTE))
    } else {
        NO_EXPIRY
    };

    let engine = store.load_engine()?;
    match engine
        .issue_permission(&admin, &vault, agent, max_per_transfer, total_quota, expires_at)
        .await
    {
        Ok(permission) => {
            store.save_engine(&engine).await?;
            display::success("Permission issued");
            display::kv("Permission", &permission.id.to_string());
            display::kv("Agent", permission.agent.as_str());
            display::kv("Per-transfer cap", &permission.max_per_transfer.to_string());
            display::kv("Total quota", &quota_display(&permission.total_quota));
            display::kv("Expires", &expiry_display(permission.expires_at));
        }
        Err(err) => display::denial(&err),
    }
    Ok(())
}

/// Revoke a permission. Irreversible.
pub async fn revoke(store: &StateStore, admin: &str, permission: &str) -> anyhow::Result<()> {
    let admin = AdminCapId::parse(admin)?;
    let permission = PermissionId::parse(permission)?;
    let engine = store.load_engine()?;

    match engine.revoke_permission(&admin, &permission).await {
        Ok(()) => {
            store.save_engine(&engine).await?;
            display::success(&format!("Permission {permission} revoked"));
            display::info("Revocation is permanent; pending proposals can no longer execute");
        }
        Err(err) => display::denial(&err),
    }
    Ok(())
}

/// Show a permission's limits, usage, and proposal history.
pub async fn info(store: &StateStore, permission: &str) -> anyhow::Result<()> {
    let permission = PermissionId::parse(permission)?;
    let engine = store.load_engine()?;

    let Some(state) = engine.permission(&permission).await else {
        display::error(&format!("Permission not found: {permission}"));
        return Ok(());
    };

    println!("{}", format!("Permission {}", state.id).bright_white().bold());
    println!("{}", "─".repeat(60));
    display::kv("Vault", &state.vault.to_string());
    display::kv("Agent", state.agent.as_str());
    display::kv("Per-transfer cap", &state.max_per_transfer.to_string());
    display::kv("Total quota", &quota_display(&state.total_quota));
    display::kv("Used", &state.used.to_string());
    if let Some(remaining) = state.remaining_quota() {
        display::kv("Remaining quota", &remaining.to_string());
    }
    display::kv("Expires", &expiry_display(state.expires_at));
    display::kv(
        "State",
        if state.revoked { "revoked" } else { "active" },
    );

    let proposals = engine.proposals_for_permission(&permission).await;
    if !proposals.is_empty() {
        println!();
        println!("  {:<42} {:<14} {}", "PROPOSAL", "AMOUNT", "STATE");
        println!("  {}", "─".repeat(66));
        for p in proposals {
            let state = if p.executed { "executed".green() } else { "pending".yellow() };
            println!(
                "  {:<42} {:<14} {}",
                p.id.to_string().bright_cyan(),
                p.amount.to_string(),
                state,
            );
        }
    }
    Ok(())
}

fn quota_display(quota: &Amount) -> String {
    if quota.is_zero() {
        "unlimited".to_string()
    } else {
        quota.to_string()
    }
}

fn expiry_display(expires_at: u64) -> String {
    if expires_at == NO_EXPIRY {
        "never".to_string()
    } else {
        format!("{expires_at} (epoch ms)")
    }
}
