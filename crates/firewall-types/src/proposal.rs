//! Transfer proposals and the execution audit trail
//!
//! An `ActionProposal` is the first half of the two-phase propose/execute
//! split: a concrete intent (amount, recipient) recorded under a permission
//! and screened again at commit time. Executed proposals are never deleted;
//! together with `TransferRecord` entries they form the audit history.

use crate::{
    amount::Amount,
    error::{FirewallError, Result},
    identity::{Address, PermissionId, ProposalId, VaultId},
    Timestamp,
};
use serde::{Deserialize, Serialize};

/// A single proposed transfer, bound to exactly one permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionProposal {
    pub id: ProposalId,
    /// The permission this proposal was created under
    pub permission: PermissionId,
    pub recipient: Address,
    pub amount: Amount,
    pub created_at: Timestamp,
    /// Transitions false -> true exactly once; never reverts
    pub executed: bool,
    pub executed_at: Option<Timestamp>,
}

impl ActionProposal {
    pub fn new(
        permission: PermissionId,
        recipient: Address,
        amount: Amount,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: ProposalId::new(),
            permission,
            recipient,
            amount,
            created_at,
            executed: false,
            executed_at: None,
        }
    }

    /// Proposal must not have been executed yet (abort code 4).
    pub fn check_pending(&self) -> Result<()> {
        if self.executed {
            return Err(FirewallError::ProposalAlreadyExecuted {
                proposal_id: self.id.to_string(),
            });
        }
        Ok(())
    }

    /// Proposal must have been created under `permission` (code 5).
    pub fn check_permission(&self, permission: &PermissionId) -> Result<()> {
        if &self.permission != permission {
            return Err(FirewallError::ProposalPermissionMismatch {
                proposal_id: self.id.to_string(),
                permission_id: permission.to_string(),
            });
        }
        Ok(())
    }

    /// Flip to the terminal executed state.
    pub fn mark_executed(&mut self, now: Timestamp) {
        self.executed = true;
        self.executed_at = Some(now);
    }
}

/// Append-only audit entry written by each successful execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub proposal: ProposalId,
    pub permission: PermissionId,
    pub vault: VaultId,
    pub recipient: Address,
    pub amount: Amount,
    /// Vault balance immediately after the debit
    pub balance_after: Amount,
    pub executed_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_proposal() -> ActionProposal {
        ActionProposal::new(
            PermissionId::new(),
            Address::random(),
            Amount::new(1_000_000_000),
            5_000,
        )
    }

    #[test]
    fn test_starts_pending() {
        let proposal = test_proposal();
        assert!(!proposal.executed);
        assert_eq!(proposal.executed_at, None);
        assert!(proposal.check_pending().is_ok());
    }

    #[test]
    fn test_executes_exactly_once() {
        let mut proposal = test_proposal();
        proposal.mark_executed(6_000);
        assert!(proposal.executed);
        assert_eq!(proposal.executed_at, Some(6_000));

        let err = proposal.check_pending().unwrap_err();
        assert_eq!(err.abort_code(), Some(4));
    }

    #[test]
    fn test_permission_binding() {
        let proposal = test_proposal();
        assert!(proposal.check_permission(&proposal.permission).is_ok());

        let other = PermissionId::new();
        let err = proposal.check_permission(&other).unwrap_err();
        assert_eq!(err.abort_code(), Some(5));
    }
}
