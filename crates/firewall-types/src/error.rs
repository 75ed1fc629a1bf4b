//! Error types for the Action Firewall
//!
//! All errors are explicit and fail closed. The firewall's own abort
//! conditions form a closed enumeration with stable numeric codes so a
//! remote caller can map a failure to a precise explanation without parsing
//! message strings. Lower-level failures (unknown objects, malformed input,
//! insufficient funds) are distinct and deliberately carry no abort code.

use thiserror::Error;

/// Result type for firewall operations
pub type Result<T> = std::result::Result<T, FirewallError>;

/// Firewall error types
#[derive(Debug, Clone, Error)]
pub enum FirewallError {
    // ========================================================================
    // Firewall abort conditions (stable numeric codes 0-7)
    // ========================================================================

    /// Caller is not the permission's designated agent
    #[error("Caller {caller} is not the agent for permission {permission_id}")]
    NotPermissionAgent { permission_id: String, caller: String },

    /// Permission has been revoked
    #[error("Permission {permission_id} has been revoked")]
    PermissionRevoked { permission_id: String },

    /// Permission has expired
    #[error("Permission {permission_id} expired at {expires_at}")]
    PermissionExpired { permission_id: String, expires_at: u64 },

    /// Amount exceeds the permission's per-transfer cap
    #[error("Amount {requested} exceeds per-transfer cap {cap} of permission {permission_id}")]
    ExceedsTransferCap {
        permission_id: String,
        requested: u64,
        cap: u64,
    },

    /// Proposal already executed
    #[error("Proposal {proposal_id} has already been executed")]
    ProposalAlreadyExecuted { proposal_id: String },

    /// Proposal does not belong to the given permission
    #[error("Proposal {proposal_id} does not belong to permission {permission_id}")]
    ProposalPermissionMismatch {
        proposal_id: String,
        permission_id: String,
    },

    /// Permission was not issued against the given vault
    #[error("Permission {permission_id} was not issued against vault {vault_id}")]
    VaultMismatch {
        permission_id: String,
        vault_id: String,
    },

    /// Cumulative usage would exceed the permission's total quota
    #[error(
        "Quota exceeded for permission {permission_id}: used {used} + requested {requested} > quota {quota}"
    )]
    QuotaExceeded {
        permission_id: String,
        used: u64,
        requested: u64,
        quota: u64,
    },

    // ========================================================================
    // Lower-level conditions (no abort code)
    // ========================================================================

    /// Insufficient funds in the vault
    #[error("Insufficient funds in vault {vault_id}: requested {requested}, available {available}")]
    InsufficientFunds {
        vault_id: String,
        requested: u64,
        available: u64,
    },

    /// Malformed or out-of-range amount
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// Malformed external address
    #[error("Invalid address: {value}")]
    InvalidAddress { value: String },

    /// Malformed input field
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// Admin-gated call without a recognized AdminCap
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Vault not found
    #[error("Vault {vault_id} not found")]
    VaultNotFound { vault_id: String },

    /// Permission not found
    #[error("Permission {permission_id} not found")]
    PermissionNotFound { permission_id: String },

    /// Proposal not found
    #[error("Proposal {proposal_id} not found")]
    ProposalNotFound { proposal_id: String },
}

impl FirewallError {
    /// Create an invalid amount error
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// The firewall's stable numeric abort code, when this is one of the
    /// closed abort conditions. Lower-level failures return `None` and must
    /// not be conflated with the numbered codes.
    pub fn abort_code(&self) -> Option<u8> {
        match self {
            Self::NotPermissionAgent { .. } => Some(0),
            Self::PermissionRevoked { .. } => Some(1),
            Self::PermissionExpired { .. } => Some(2),
            Self::ExceedsTransferCap { .. } => Some(3),
            Self::ProposalAlreadyExecuted { .. } => Some(4),
            Self::ProposalPermissionMismatch { .. } => Some(5),
            Self::VaultMismatch { .. } => Some(6),
            Self::QuotaExceeded { .. } => Some(7),
            _ => None,
        }
    }

    /// Get a stable error code string for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotPermissionAgent { .. } => "NOT_PERMISSION_AGENT",
            Self::PermissionRevoked { .. } => "PERMISSION_REVOKED",
            Self::PermissionExpired { .. } => "PERMISSION_EXPIRED",
            Self::ExceedsTransferCap { .. } => "EXCEEDS_TRANSFER_CAP",
            Self::ProposalAlreadyExecuted { .. } => "PROPOSAL_ALREADY_EXECUTED",
            Self::ProposalPermissionMismatch { .. } => "PROPOSAL_PERMISSION_MISMATCH",
            Self::VaultMismatch { .. } => "VAULT_MISMATCH",
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidAddress { .. } => "INVALID_ADDRESS",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::VaultNotFound { .. } => "VAULT_NOT_FOUND",
            Self::PermissionNotFound { .. } => "PERMISSION_NOT_FOUND",
            Self::ProposalNotFound { .. } => "PROPOSAL_NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abort_codes_are_stable() {
        let cases: Vec<(FirewallError, u8)> = vec![
            (
                FirewallError::NotPermissionAgent {
                    permission_id: "p".into(),
                    caller: "c".into(),
                },
                0,
            ),
            (FirewallError::PermissionRevoked { permission_id: "p".into() }, 1),
            (
                FirewallError::PermissionExpired {
                    permission_id: "p".into(),
                    expires_at: 1,
                },
                2,
            ),
            (
                FirewallError::ExceedsTransferCap {
                    permission_id: "p".into(),
                    requested: 2,
                    cap: 1,
                },
                3,
            ),
            (FirewallError::ProposalAlreadyExecuted { proposal_id: "a".into() }, 4),
            (
                FirewallError::ProposalPermissionMismatch {
                    proposal_id: "a".into(),
                    permission_id: "p".into(),
                },
                5,
            ),
            (
                FirewallError::VaultMismatch {
                    permission_id: "p".into(),
                    vault_id: "v".into(),
                },
                6,
            ),
            (
                FirewallError::QuotaExceeded {
                    permission_id: "p".into(),
                    used: 5,
                    requested: 6,
                    quota: 10,
                },
                7,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.abort_code(), Some(code), "{}", err.error_code());
        }
    }

    #[test]
    fn test_lower_level_errors_have_no_abort_code() {
        let errors = [
            FirewallError::InsufficientFunds {
                vault_id: "v".into(),
                requested: 2,
                available: 1,
            },
            FirewallError::invalid_amount("zero"),
            FirewallError::unauthorized("no admin cap"),
            FirewallError::VaultNotFound { vault_id: "v".into() },
        ];
        for err in errors {
            assert_eq!(err.abort_code(), None, "{}", err.error_code());
        }
    }

    #[test]
    fn test_error_code_strings() {
        let err = FirewallError::QuotaExceeded {
            permission_id: "p".into(),
            used: 0,
            requested: 1,
            quota: 1,
        };
        assert_eq!(err.error_code(), "QUOTA_EXCEEDED");
    }
}
