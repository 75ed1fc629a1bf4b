//! Permission - delegated, bounded, revocable, time-limited spending capability
//!
//! A permission scopes what one agent may do against one vault: a hard
//! per-transfer ceiling, an optional cumulative quota, and an optional
//! absolute expiry. Everything except `used` and `revoked` is immutable
//! after issuance.

use crate::{
    amount::Amount,
    error::{FirewallError, Result},
    identity::{Address, PermissionId, VaultId},
    Timestamp, NO_EXPIRY,
};
use serde::{Deserialize, Serialize};

/// A delegated spending capability issued against one vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    /// The vault this permission was issued against
    pub vault: VaultId,
    /// Sole entity authorized to create proposals under this permission
    pub agent: Address,
    /// Hard per-action ceiling; always greater than zero
    pub max_per_transfer: Amount,
    /// Cumulative ceiling across all executed proposals; zero means unlimited
    pub total_quota: Amount,
    /// Running total of amounts already executed
    pub used: Amount,
    /// Absolute deadline in epoch milliseconds; zero means no expiry
    pub expires_at: Timestamp,
    /// Administrator-set kill switch; never reset once set
    pub revoked: bool,
    pub issued_at: Timestamp,
}

impl Permission {
    pub fn new(
        vault: VaultId,
        agent: Address,
        max_per_transfer: Amount,
        total_quota: Amount,
        expires_at: Timestamp,
        issued_at: Timestamp,
    ) -> Self {
        Self {
            id: PermissionId::new(),
            vault,
            agent,
            max_per_transfer,
            total_quota,
            used: Amount::zero(),
            expires_at,
            revoked: false,
            issued_at,
        }
    }

    /// Whether the quota is the "unlimited" sentinel.
    pub fn is_unlimited(&self) -> bool {
        self.total_quota.is_zero()
    }

    /// Whether the permission is past its deadline at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at != NO_EXPIRY && now >= self.expires_at
    }

    /// Quota still available, or `None` when unlimited.
    pub fn remaining_quota(&self) -> Option<Amount> {
        if self.is_unlimited() {
            None
        } else {
            Some(self.total_quota.checked_sub(self.used).unwrap_or(Amount::zero()))
        }
    }

    /// Caller must be the designated agent (abort code 0).
    pub fn check_agent(&self, caller: &Address) -> Result<()> {
        if caller != &self.agent {
            return Err(FirewallError::NotPermissionAgent {
                permission_id: self.id.to_string(),
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    /// Permission must be neither revoked (code 1) nor expired (code 2),
    /// checked in that order.
    pub fn check_active(&self, now: Timestamp) -> Result<()> {
        if self.revoked {
            return Err(FirewallError::PermissionRevoked {
                permission_id: self.id.to_string(),
            });
        }
        if self.is_expired(now) {
            return Err(FirewallError::PermissionExpired {
                permission_id: self.id.to_string(),
                expires_at: self.expires_at,
            });
        }
        Ok(())
    }

    /// Permission must have been issued against `vault` (code 6).
    pub fn check_vault(&self, vault: &VaultId) -> Result<()> {
        if &self.vault != vault {
            return Err(FirewallError::VaultMismatch {
                permission_id: self.id.to_string(),
                vault_id: vault.to_string(),
            });
        }
        Ok(())
    }

    /// Amount must be positive and within the per-transfer cap (code 3).
    pub fn check_transfer_cap(&self, amount: Amount) -> Result<()> {
        if amount.is_zero() || amount > self.max_per_transfer {
            return Err(FirewallError::ExceedsTransferCap {
                permission_id: self.id.to_string(),
                requested: amount.0,
                cap: self.max_per_transfer.0,
            });
        }
        Ok(())
    }

    /// Executing `amount` must not push cumulative usage past the quota
    /// (code 7). Screened against the live `used` counter at commit time,
    /// never at proposal time.
    pub fn check_quota(&self, amount: Amount) -> Result<()> {
        if self.is_unlimited() {
            return Ok(());
        }
        let projected = self.used.checked_add(amount);
        match projected {
            Some(total) if total <= self.total_quota => Ok(()),
            _ => Err(FirewallError::QuotaExceeded {
                permission_id: self.id.to_string(),
                used: self.used.0,
                requested: amount.0,
                quota: self.total_quota.0,
            }),
        }
    }

    /// Add an executed amount to the usage counter.
    pub fn record_usage(&mut self, amount: Amount) -> Result<()> {
        self.used = self
            .used
            .checked_add(amount)
            .ok_or_else(|| FirewallError::invalid_amount("usage counter overflow"))?;
        Ok(())
    }

    /// Set the kill switch. Irreversible; idempotent on a revoked permission.
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}
