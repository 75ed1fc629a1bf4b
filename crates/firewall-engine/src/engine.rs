//! The `Firewall` orchestrator
//!
//! Owns the object stores and implements every state-transition entry point.
//! Lock acquisition order is fixed (admins, vaults, permissions, proposals,
//! transfers); each transition takes all the write locks it needs up front,
//! validates every precondition, and only then mutates, so a failed call
//! leaves no observable change.

use std::collections::HashMap;
use std::sync::Arc;

use firewall_types::{
    ActionProposal, AdminCap, AdminCapId, Address, Amount, FirewallError, Permission,
    PermissionId, ProposalId, Result, Timestamp, TransferRecord, Vault, VaultId, NO_EXPIRY,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::clock::{Clock, SystemClock};

/// The authorization engine.
///
/// Thread-safe and cheap to clone; clones share the same underlying state.
#[derive(Clone)]
pub struct Firewall {
    /// Registered administrator credentials
    pub(crate) admins: Arc<RwLock<HashMap<AdminCapId, AdminCap>>>,
    /// Pooled balances
    pub(crate) vaults: Arc<RwLock<HashMap<VaultId, Vault>>>,
    /// Issued spending capabilities
    pub(crate) permissions: Arc<RwLock<HashMap<PermissionId, Permission>>>,
    /// Pending and executed proposals (never deleted)
    pub(crate) proposals: Arc<RwLock<HashMap<ProposalId, ActionProposal>>>,
    /// Append-only execution audit trail
    pub(crate) transfers: Arc<RwLock<Vec<TransferRecord>>>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Firewall {
    /// Create an empty engine on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty engine with an injected time source.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            admins: Arc::new(RwLock::new(HashMap::new())),
            vaults: Arc::new(RwLock::new(HashMap::new())),
            permissions: Arc::new(RwLock::new(HashMap::new())),
            proposals: Arc::new(RwLock::new(HashMap::new())),
            transfers: Arc::new(RwLock::new(Vec::new())),
            clock,
        }
    }

    // ── Admin issuance ────────────────────────────────────────────────────

    /// Mint and register a new administrator credential.
    ///
    /// No preconditions; any number of independent credentials may exist.
    pub async fn create_admin(&self) -> AdminCap {
        let mut admins = self.admins.write().await;
        let admin = AdminCap::new(self.clock.now());
        admins.insert(admin.id.clone(), admin.clone());
        info!(admin = %admin.id, "admin credential created");
        admin
    }

    /// Create an empty vault. Requires a registered AdminCap.
    pub async fn create_vault(&self, admin: &AdminCapId) -> Result<Vault> {
        let admins = self.admins.read().await;
        let mut vaults = self.vaults.write().await;

        Self::require_admin(&admins, admin)?;

        let vault = Vault::new(self.clock.now());
        vaults.insert(vault.id.clone(), vault.clone());
        info!(vault = %vault.id, admin = %admin, "vault created");
        Ok(vault)
    }

    /// Credit a vault. No authorization required - anyone may top up a
    /// shared vault. Returns the new balance.
    pub async fn deposit(&self, vault: &VaultId, amount: Amount) -> Result<Amount> {
        let mut vaults = self.vaults.write().await;

        let vault_state = vaults
            .get_mut(vault)
            .ok_or_else(|| FirewallError::VaultNotFound {
                vault_id: vault.to_string(),
            })?;
        let new_balance = vault_state.credit(amount)?;
        info!(vault = %vault, amount = %amount, balance = %new_balance, "deposit");
        Ok(new_balance)
    }

    // ── Permission issuance and revocation ────────────────────────────────

    /// Issue a spending permission against a vault.
    ///
    /// Preconditions: registered AdminCap, known vault, positive per-transfer
    /// cap, quota either unlimited (zero) or at least the cap, and an expiry
    /// that is either the no-expiry sentinel or strictly in the future.
    pub async fn issue_permission(
        &self,
        admin: &AdminCapId,
        vault: &VaultId,
        agent: Address,
        max_per_transfer: Amount,
        total_quota: Amount,
        expires_at: Timestamp,
    ) -> Result<Permission> {
        let admins = self.admins.read().await;
        let vaults = self.vaults.read().await;
        let mut permissions = self.permissions.write().await;

        Self::require_admin(&admins, admin)?;
        if !vaults.contains_key(vault) {
            return Err(FirewallError::VaultNotFound {
                vault_id: vault.to_string(),
            });
        }
        if max_per_transfer.is_zero() {
            return Err(FirewallError::invalid_amount(
                "per-transfer cap must be greater than zero",
            ));
        }
        // A quota below the cap would make the permission unreachable
        if !total_quota.is_zero() && total_quota < max_per_transfer {
            return Err(FirewallError::invalid_amount(
                "total quota must be zero (unlimited) or at least the per-transfer cap",
            ));
        }
        let now = self.clock.now();
        if expires_at != NO_EXPIRY && expires_at <= now {
            return Err(FirewallError::invalid_amount(
                "expiry must be in the future or zero (no expiry)",
            ));
        }

        let permission = Permission::new(
            vault.clone(),
            agent,
            max_per_transfer,
            total_quota,
            expires_at,
            now,
        );
        permissions.insert(permission.id.clone(), permission.clone());
        info!(
            permission = %permission.id,
            vault = %vault,
            agent = %permission.agent,
            cap = %max_per_transfer,
            quota = %total_quota,
            expires_at,
            "permission issued"
        );
        Ok(permission)
    }

    /// Set a permission's kill switch. Requires a registered AdminCap.
    ///
    /// Irreversible; already-executed proposals are unaffected.
    pub async fn revoke_permission(
        &self,
        admin: &AdminCapId,
        permission: &PermissionId,
    ) -> Result<()> {
        let admins = self.admins.read().await;
        let mut permissions = self.permissions.write().await;

        Self::require_admin(&admins, admin)?;
        let permission_state =
            permissions
                .get_mut(permission)
                .ok_or_else(|| FirewallError::PermissionNotFound {
                    permission_id: permission.to_string(),
                })?;
        permission_state.revoke();
        info!(permission = %permission, admin = %admin, "permission revoked");
        Ok(())
    }

    // ── Proposal creation ─────────────────────────────────────────────────

    /// Record a transfer proposal under a permission.
    ///
    /// Precondition order is part of the contract: agent (code 0), revoked
    /// (1), expired (2), amount positive and within cap (3). Quota is NOT
    /// screened here - competing proposals are resolved at execution against
    /// the live usage counter.
    pub async fn propose_transfer(
        &self,
        permission: &PermissionId,
        caller: &Address,
        recipient: Address,
        amount: Amount,
    ) -> Result<ActionProposal> {
        let permissions = self.permissions.read().await;
        let mut proposals = self.proposals.write().await;

        let permission_state =
            permissions
                .get(permission)
                .ok_or_else(|| FirewallError::PermissionNotFound {
                    permission_id: permission.to_string(),
                })?;

        let now = self.clock.now();
        permission_state.check_agent(caller)?;
        permission_state.check_active(now)?;
        permission_state.check_transfer_cap(amount)?;

        let proposal = ActionProposal::new(permission.clone(), recipient, amount, now);
        proposals.insert(proposal.id.clone(), proposal.clone());
        info!(
            proposal = %proposal.id,
            permission = %permission,
            recipient = %proposal.recipient,
            amount = %amount,
            "transfer proposed"
        );
        Ok(proposal)
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Execute a pending proposal against its permission and vault.
    ///
    /// Precondition order is part of the contract: already-executed (code 4),
    /// proposal/permission binding (5), permission/vault binding (6), revoked
    /// (1), expired (2), per-transfer cap re-check (3), quota against live
    /// usage (7), then vault balance (a lower-level failure, no abort code).
    /// The debit, usage increment, executed flag, and audit entry commit
    /// together or not at all.
    pub async fn execute_transfer(
        &self,
        vault: &VaultId,
        permission: &PermissionId,
        proposal: &ProposalId,
    ) -> Result<TransferRecord> {
        let mut vaults = self.vaults.write().await;
        let mut permissions = self.permissions.write().await;
        let mut proposals = self.proposals.write().await;
        let mut transfers = self.transfers.write().await;

        let vault_state = vaults
            .get_mut(vault)
            .ok_or_else(|| FirewallError::VaultNotFound {
                vault_id: vault.to_string(),
            })?;
        let permission_state =
            permissions
                .get_mut(permission)
                .ok_or_else(|| FirewallError::PermissionNotFound {
                    permission_id: permission.to_string(),
                })?;
        let proposal_state =
            proposals
                .get_mut(proposal)
                .ok_or_else(|| FirewallError::ProposalNotFound {
                    proposal_id: proposal.to_string(),
                })?;

        let now = self.clock.now();
        proposal_state.check_pending()?;
        proposal_state.check_permission(permission)?;
        permission_state.check_vault(vault)?;
        permission_state.check_active(now)?;
        permission_state.check_transfer_cap(proposal_state.amount)?;
        permission_state.check_quota(proposal_state.amount)?;

        // Post-state of the usage counter, validated before any mutation so
        // the commit below cannot fail halfway
        let new_used = permission_state
            .used
            .checked_add(proposal_state.amount)
            .ok_or_else(|| FirewallError::invalid_amount("usage counter overflow"))?;
        let balance_after = vault_state.debit(proposal_state.amount)?;

        permission_state.used = new_used;
        proposal_state.mark_executed(now);

        let record = TransferRecord {
            proposal: proposal_state.id.clone(),
            permission: permission_state.id.clone(),
            vault: vault_state.id.clone(),
            recipient: proposal_state.recipient.clone(),
            amount: proposal_state.amount,
            balance_after,
            executed_at: now,
        };
        transfers.push(record.clone());
        info!(
            proposal = %record.proposal,
            permission = %record.permission,
            vault = %record.vault,
            recipient = %record.recipient,
            amount = %record.amount,
            balance = %balance_after,
            "transfer executed"
        );
        Ok(record)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub async fn admin_count(&self) -> usize {
        self.admins.read().await.len()
    }

    pub async fn vault(&self, vault: &VaultId) -> Option<Vault> {
        self.vaults.read().await.get(vault).cloned()
    }

    pub async fn permission(&self, permission: &PermissionId) -> Option<Permission> {
        self.permissions.read().await.get(permission).cloned()
    }

    pub async fn proposal(&self, proposal: &ProposalId) -> Option<ActionProposal> {
        self.proposals.read().await.get(proposal).cloned()
    }

    /// All permissions issued against a vault.
    pub async fn permissions_for_vault(&self, vault: &VaultId) -> Vec<Permission> {
        let permissions = self.permissions.read().await;
        permissions
            .values()
            .filter(|p| &p.vault == vault)
            .cloned()
            .collect()
    }

    /// All proposals (pending and executed) under a permission.
    pub async fn proposals_for_permission(&self, permission: &PermissionId) -> Vec<ActionProposal> {
        let proposals = self.proposals.read().await;
        proposals
            .values()
            .filter(|p| &p.permission == permission)
            .cloned()
            .collect()
    }

    /// The full execution audit trail, oldest first.
    pub async fn transfers(&self) -> Vec<TransferRecord> {
        self.transfers.read().await.clone()
    }

    /// Most recent executions, newest first.
    pub async fn recent_transfers(&self, limit: usize) -> Vec<TransferRecord> {
        let transfers = self.transfers.read().await;
        transfers.iter().rev().take(limit).cloned().collect()
    }

    fn require_admin(admins: &HashMap<AdminCapId, AdminCap>, admin: &AdminCapId) -> Result<()> {
        if !admins.contains_key(admin) {
            return Err(FirewallError::unauthorized(format!(
                "{admin} is not a registered admin credential"
            )));
        }
        Ok(())
    }
}

impl Default for Firewall {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn manual_engine(now: Timestamp) -> (Firewall, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        (Firewall::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_create_vault_requires_registered_admin() {
        let (engine, _) = manual_engine(1_000);
        let result = engine.create_vault(&AdminCapId::new()).await;
        assert!(matches!(result, Err(FirewallError::Unauthorized { .. })));

        let admin = engine.create_admin().await;
        assert!(engine.create_vault(&admin.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_admins_are_not_deduplicated() {
        let (engine, _) = manual_engine(1_000);
        engine.create_admin().await;
        engine.create_admin().await;
        assert_eq!(engine.admin_count().await, 2);
    }

    #[tokio::test]
    async fn test_deposit_unknown_vault() {
        let (engine, _) = manual_engine(1_000);
        let result = engine.deposit(&VaultId::new(), Amount::new(1)).await;
        assert!(matches!(result, Err(FirewallError::VaultNotFound { .. })));
    }

    #[tokio::test]
    async fn test_issue_permission_validates_arguments() {
        let (engine, _) = manual_engine(1_000);
        let admin = engine.create_admin().await;
        let vault = engine.create_vault(&admin.id).await.unwrap();
        let agent = Address::random();

        // Zero per-transfer cap
        let result = engine
            .issue_permission(
                &admin.id,
                &vault.id,
                agent.clone(),
                Amount::zero(),
                Amount::zero(),
                NO_EXPIRY,
            )
            .await;
        assert!(matches!(result, Err(FirewallError::InvalidAmount { .. })));

        // Quota below the cap is unreachable
        let result = engine
            .issue_permission(
                &admin.id,
                &vault.id,
                agent.clone(),
                Amount::new(100),
                Amount::new(99),
                NO_EXPIRY,
            )
            .await;
        assert!(matches!(result, Err(FirewallError::InvalidAmount { .. })));

        // Expiry in the past
        let result = engine
            .issue_permission(
                &admin.id,
                &vault.id,
                agent.clone(),
                Amount::new(100),
                Amount::zero(),
                999,
            )
            .await;
        assert!(matches!(result, Err(FirewallError::InvalidAmount { .. })));

        // Unknown vault
        let result = engine
            .issue_permission(
                &admin.id,
                &VaultId::new(),
                agent,
                Amount::new(100),
                Amount::zero(),
                NO_EXPIRY,
            )
            .await;
        assert!(matches!(result, Err(FirewallError::VaultNotFound { .. })));
    }

    #[tokio::test]
    async fn test_quota_equal_to_cap_is_allowed() {
        let (engine, _) = manual_engine(1_000);
        let admin = engine.create_admin().await;
        let vault = engine.create_vault(&admin.id).await.unwrap();
        let result = engine
            .issue_permission(
                &admin.id,
                &vault.id,
                Address::random(),
                Amount::new(100),
                Amount::new(100),
                NO_EXPIRY,
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_propose_screens_in_contract_order() {
        let (engine, _) = manual_engine(1_000);
        let admin = engine.create_admin().await;
        let vault = engine.create_vault(&admin.id).await.unwrap();
        let agent = Address::random();
        let permission = engine
            .issue_permission(
                &admin.id,
                &vault.id,
                agent.clone(),
                Amount::new(100),
                Amount::zero(),
                NO_EXPIRY,
            )
            .await
            .unwrap();
        engine.revoke_permission(&admin.id, &permission.id).await.unwrap();

        // Wrong caller against a revoked permission: the agent check (code 0)
        // must fire before the revocation check (code 1)
        let err = engine
            .propose_transfer(&permission.id, &Address::random(), Address::random(), Amount::new(1))
            .await
            .unwrap_err();
        assert_eq!(err.abort_code(), Some(0));

        let err = engine
            .propose_transfer(&permission.id, &agent, Address::random(), Amount::new(1))
            .await
            .unwrap_err();
        assert_eq!(err.abort_code(), Some(1));
    }

    #[tokio::test]
    async fn test_failed_propose_creates_no_proposal() {
        let (engine, _) = manual_engine(1_000);
        let admin = engine.create_admin().await;
        let vault = engine.create_vault(&admin.id).await.unwrap();
        let agent = Address::random();
        let permission = engine
            .issue_permission(
                &admin.id,
                &vault.id,
                agent.clone(),
                Amount::new(100),
                Amount::zero(),
                NO_EXPIRY,
            )
            .await
            .unwrap();

        let err = engine
            .propose_transfer(&permission.id, &agent, Address::random(), Amount::new(101))
            .await
            .unwrap_err();
        assert_eq!(err.abort_code(), Some(3));
        assert!(engine.proposals_for_permission(&permission.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_execute_binding_mismatches() {
        let (engine, _) = manual_engine(1_000);
        let admin = engine.create_admin().await;
        let vault_a = engine.create_vault(&admin.id).await.unwrap();
        let vault_b = engine.create_vault(&admin.id).await.unwrap();
        engine.deposit(&vault_a.id, Amount::new(1_000)).await.unwrap();
        engine.deposit(&vault_b.id, Amount::new(1_000)).await.unwrap();

        let agent = Address::random();
        let permission_a = engine
            .issue_permission(
                &admin.id,
                &vault_a.id,
                agent.clone(),
                Amount::new(100),
                Amount::zero(),
                NO_EXPIRY,
            )
            .await
            .unwrap();
        let permission_b = engine
            .issue_permission(
                &admin.id,
                &vault_b.id,
                agent.clone(),
                Amount::new(100),
                Amount::zero(),
                NO_EXPIRY,
            )
            .await
            .unwrap();
        let proposal_a = engine
            .propose_transfer(&permission_a.id, &agent, Address::random(), Amount::new(50))
            .await
            .unwrap();

        // Proposal under permission A executed against permission B: code 5
        let err = engine
            .execute_transfer(&vault_b.id, &permission_b.id, &proposal_a.id)
            .await
            .unwrap_err();
        assert_eq!(err.abort_code(), Some(5));

        // Right permission, wrong vault: code 6
        let err = engine
            .execute_transfer(&vault_b.id, &permission_a.id, &proposal_a.id)
            .await
            .unwrap_err();
        assert_eq!(err.abort_code(), Some(6));

        // Nothing moved
        assert_eq!(engine.vault(&vault_a.id).await.unwrap().balance, Amount::new(1_000));
        assert_eq!(engine.vault(&vault_b.id).await.unwrap().balance, Amount::new(1_000));
    }

    #[tokio::test]
    async fn test_insufficient_funds_is_not_an_abort_code() {
        let (engine, _) = manual_engine(1_000);
        let admin = engine.create_admin().await;
        let vault = engine.create_vault(&admin.id).await.unwrap();
        engine.deposit(&vault.id, Amount::new(40)).await.unwrap();

        let agent = Address::random();
        let permission = engine
            .issue_permission(
                &admin.id,
                &vault.id,
                agent.clone(),
                Amount::new(100),
                Amount::zero(),
                NO_EXPIRY,
            )
            .await
            .unwrap();
        let proposal = engine
            .propose_transfer(&permission.id, &agent, Address::random(), Amount::new(50))
            .await
            .unwrap();

        let err = engine
            .execute_transfer(&vault.id, &permission.id, &proposal.id)
            .await
            .unwrap_err();
        assert!(matches!(err, FirewallError::InsufficientFunds { .. }));
        assert_eq!(err.abort_code(), None);

        // The proposal stays pending and is retryable after a top-up
        assert!(!engine.proposal(&proposal.id).await.unwrap().executed);
        engine.deposit(&vault.id, Amount::new(10)).await.unwrap();
        assert!(engine
            .execute_transfer(&vault.id, &permission.id, &proposal.id)
            .await
            .is_ok());
    }
}
