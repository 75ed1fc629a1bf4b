//! Scripted walk-through of the firewall
//!
//! Runs an in-memory engine on a manual clock (nothing is persisted) through
//! the happy path and then every denial, printing the abort code each guard
//! reports.

use std::sync::Arc;

use colored::*;
use firewall_engine::{Clock, Firewall, ManualClock};
use firewall_types::{Address, Amount, FirewallError, NO_EXPIRY};

use crate::display;

const NO_QUOTA: Amount = Amount(0);

fn show_denial(label: &str, result: Result<impl std::fmt::Debug, FirewallError>) {
    match result {
        Ok(_) => display::error(&format!("{label}: unexpectedly allowed")),
        Err(err) => match err.abort_code() {
            Some(code) => display::success(&format!("{label}: denied with abort code {code}")),
            None => display::success(&format!("{label}: denied with {}", err.error_code())),
        },
    }
}

pub async fn run() -> anyhow::Result<()> {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let engine = Firewall::with_clock(clock.clone());

    display::section("1. Fund a vault");
    let admin = engine.create_admin().await;
    let vault = engine.create_vault(&admin.id).await?;
    engine.deposit(&vault.id, Amount::parse_decimal("10")?).await?;
    display::success("AdminCap minted, vault created and funded with 10 coins");
    display::kv("AdminCap", &admin.id.to_string());
    display::kv("Vault", &vault.id.to_string());

    display::section("2. Delegate to an agent");
    let agent = Address::random();
    let permission = engine
        .issue_permission(
            &admin.id,
            &vault.id,
            agent.clone(),
            Amount::parse_decimal("5")?,
            Amount::parse_decimal("10")?,
            NO_EXPIRY,
        )
        .await?;
    display::success("Permission issued: 5 coins per transfer, 10 coins total");
    display::kv("Permission", &permission.id.to_string());
    display::kv("Agent", agent.as_str());

    display::section("3. Two-phase transfer");
    let recipient = Address::random();
    let proposal = engine
        .propose_transfer(&permission.id, &agent, recipient.clone(), Amount::parse_decimal("3")?)
        .await?;
    display::success("Agent proposed 3 coins");
    let record = engine
        .execute_transfer(&vault.id, &permission.id, &proposal.id)
        .await?;
    display::success(&format!(
        "Executed: {} coins to {}, vault balance now {}",
        record.amount,
        record.recipient,
        record.balance_after
    ));

    display::section("4. The firewall says no");

    show_denial(
        "Stranger proposes under the agent's permission",
        engine
            .propose_transfer(&permission.id, &Address::random(), recipient.clone(), Amount::new(1))
            .await,
    );

    show_denial(
        "Agent proposes 6 coins against the 5-coin cap",
        engine
            .propose_transfer(&permission.id, &agent, recipient.clone(), Amount::parse_decimal("6")?)
            .await,
    );

    // Burn the rest of the quota, then try once more
    let exhaust = engine
        .propose_transfer(&permission.id, &agent, recipient.clone(), Amount::parse_decimal("5")?)
        .await?;
    engine
        .execute_transfer(&vault.id, &permission.id, &exhaust.id)
        .await?;
    display::info("Quota now exhausted: 8 of 10 coins used, next transfer of 3 would breach it");
    let over_quota = engine
        .propose_transfer(&permission.id, &agent, recipient.clone(), Amount::parse_decimal("3")?)
        .await?;
    show_denial(
        "Executing past the total quota",
        engine
            .execute_transfer(&vault.id, &permission.id, &over_quota.id)
            .await,
    );

    show_denial(
        "Re-executing an already executed proposal",
        engine
            .execute_transfer(&vault.id, &permission.id, &proposal.id)
            .await,
    );

    display::section("5. Expiry");
    let short_lived = engine
        .issue_permission(
            &admin.id,
            &vault.id,
            agent.clone(),
            Amount::parse_decimal("1")?,
            NO_QUOTA,
            clock.now() + 60_000,
        )
        .await?;
    display::info("Issued a permission expiring in one minute, then fast-forwarded two");
    clock.advance(120_000);
    show_denial(
        "Proposing under the expired permission",
        engine
            .propose_transfer(&short_lived.id, &agent, recipient.clone(), Amount::new(1))
            .await,
    );

    display::section("6. Revocation");
    engine.revoke_permission(&admin.id, &permission.id).await?;
    show_denial(
        "Proposing under the revoked permission",
        engine
            .propose_transfer(&permission.id, &agent, recipient, Amount::new(1))
            .await,
    );

    println!();
    println!(
        "  {} vault balance ends at {}, with {} executed transfers on the audit trail",
        "Done:".bright_white().bold(),
        engine.vault(&vault.id).await.map(|v| v.balance.to_string()).unwrap_or_default(),
        engine.transfers().await.len(),
    );
    Ok(())
}
