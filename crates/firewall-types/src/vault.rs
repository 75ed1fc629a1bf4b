//! Vault - shared pooled balance of the single asset
//!
//! Invariants:
//!
//! 1. The balance is never negative
//! 2. A debit never exceeds the current balance
//! 3. Only transfer execution debits; anyone may credit

use crate::{
    amount::Amount,
    error::{FirewallError, Result},
    identity::VaultId,
    Timestamp,
};
use serde::{Deserialize, Serialize};

/// A shared balance holder. Many permissions may be issued against one vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub id: VaultId,
    pub balance: Amount,
    pub created_at: Timestamp,
}

impl Vault {
    /// Create an empty vault.
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            id: VaultId::new(),
            balance: Amount::zero(),
            created_at,
        }
    }

    /// Credit the balance. Returns the new balance.
    ///
    /// Rejects zero amounts and credits that would overflow the balance
    /// representation.
    pub fn credit(&mut self, amount: Amount) -> Result<Amount> {
        if amount.is_zero() {
            return Err(FirewallError::invalid_amount(
                "deposit must be greater than zero",
            ));
        }
        let new_balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| FirewallError::invalid_amount("vault balance overflow"))?;
        self.balance = new_balance;
        Ok(new_balance)
    }

    /// Debit the balance. Returns the new balance.
    pub fn debit(&mut self, amount: Amount) -> Result<Amount> {
        let new_balance =
            self.balance
                .checked_sub(amount)
                .ok_or_else(|| FirewallError::InsufficientFunds {
                    vault_id: self.id.to_string(),
                    requested: amount.0,
                    available: self.balance.0,
                })?;
        self.balance = new_balance;
        Ok(new_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_debit() {
        let mut vault = Vault::new(0);
        assert_eq!(vault.credit(Amount::new(1000)).unwrap(), Amount::new(1000));
        assert_eq!(vault.debit(Amount::new(400)).unwrap(), Amount::new(600));
        assert_eq!(vault.balance, Amount::new(600));
    }

    #[test]
    fn test_zero_credit_rejected() {
        let mut vault = Vault::new(0);
        assert!(matches!(
            vault.credit(Amount::zero()),
            Err(FirewallError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_credit_overflow_rejected() {
        let mut vault = Vault::new(0);
        vault.credit(Amount::new(u64::MAX)).unwrap();
        let result = vault.credit(Amount::new(1));
        assert!(matches!(result, Err(FirewallError::InvalidAmount { .. })));
        // Failed credit leaves the balance untouched
        assert_eq!(vault.balance, Amount::new(u64::MAX));
    }

    #[test]
    fn test_debit_never_goes_negative() {
        let mut vault = Vault::new(0);
        vault.credit(Amount::new(100)).unwrap();
        let result = vault.debit(Amount::new(200));
        assert!(matches!(
            result,
            Err(FirewallError::InsufficientFunds { requested: 200, available: 100, .. })
        ));
        assert_eq!(vault.balance, Amount::new(100));
    }
}
