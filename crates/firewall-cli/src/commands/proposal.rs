//! Proposal commands - the two-phase transfer surface

use colored::*;
use firewall_types::{Address, Amount, PermissionId, ProposalId, VaultId};

use crate::display;
use crate::store::StateStore;

/// Propose a transfer under a permission. Only the permission's agent may
/// call this; quota is not screened until execution.
pub async fn create(
    store: &StateStore,
    permission: &str,
    caller: &str,
    recipient: &str,
    amount: &str,
) -> anyhow::Result<()> {
    let permission = PermissionId::parse(permission)?;
    let caller = Address::parse(caller)?;
    let recipient = Address::parse(recipient)?;
    let amount = Amount::parse_decimal(amount)?;

    let engine = store.load_engine()?;
    match engine
        .propose_transfer(&permission, &caller, recipient, amount)
        .await
    {
        Ok(proposal) => {
            store.save_engine(&engine).await?;
            display::success("Transfer proposed");
            display::kv("Proposal", &proposal.id.to_string());
            display::kv("Recipient", proposal.recipient.as_str());
            display::kv("Amount", &proposal.amount.to_string());
            display::info("Execute it with: firewall proposal execute");
        }
        Err(err) => display::denial(&err),
    }
    Ok(())
}

/// Execute a pending proposal against its permission and vault.
pub async fn execute(
    store: &StateStore,
    vault: &str,
    permission: &str,
    proposal: &str,
) -> anyhow::Result<()> {
    let vault = VaultId::parse(vault)?;
    let permission = PermissionId::parse(permission)?;
    let proposal = ProposalId::parse(proposal)?;

    let engine = store.load_engine()?;
    match engine.execute_transfer(&vault, &permission, &proposal).await {
        Ok(record) => {
            store.save_engine(&engine).await?;
            display::success("Transfer executed");
            display::kv("Amount", &record.amount.to_string());
            display::kv("Recipient", record.recipient.as_str());
            display::kv("Vault balance", &record.balance_after.to_string());
        }
        Err(err) => display::denial(&err),
    }
    Ok(())
}

/// Show a proposal.
pub async fn info(store: &StateStore, proposal: &str) -> anyhow::Result<()> {
    let proposal = ProposalId::parse(proposal)?;
    let engine = store.load_engine()?;

    let Some(state) = engine.proposal(&proposal).await else {
        display::error(&format!("Proposal not found: {proposal}"));
        return Ok(());
    };

    println!("{}", format!("Proposal {}", state.id).bright_white().bold());
    println!("{}", "─".repeat(60));
    display::kv("Permission", &state.permission.to_string());
    display::kv("Recipient", state.recipient.as_str());
    display::kv("Amount", &state.amount.to_string());
    display::kv("Created at", &format!("{} (epoch ms)", state.created_at));
    if state.executed {
        let executed_at = state
            .executed_at
            .map(|t| format!("{t} (epoch ms)"))
            .unwrap_or_else(|| "unknown".to_string());
        println!("      State: {}", "executed".green());
        display::kv("Executed at", &executed_at);
    } else {
        println!("      State: {}", "pending".yellow());
    }
    Ok(())
}
