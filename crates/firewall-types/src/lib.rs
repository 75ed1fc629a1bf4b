//! Firewall Types - Canonical domain types for the Action Firewall
//!
//! This crate contains all foundational types for the firewall with zero
//! dependencies on other firewall crates. It defines:
//!
//! - Identity types (AdminCapId, VaultId, PermissionId, ProposalId, Address)
//! - The base-unit `Amount` type with 9-decimal precision
//! - Entity records (AdminCap, Vault, Permission, ActionProposal)
//! - The TransferRecord audit entry
//! - The closed error taxonomy with stable numeric abort codes
//!
//! # Architectural Invariants
//!
//! These types support the core firewall security invariants:
//!
//! 1. Vault balances are never negative and are debited only by execution
//! 2. Permission usage is monotonically non-decreasing and quota-bounded
//! 3. Revocation is sticky - a revoked permission never comes back
//! 4. A proposal executes at most once and is never destroyed

pub mod admin;
pub mod amount;
pub mod error;
pub mod identity;
pub mod permission;
pub mod proposal;
pub mod vault;

pub use admin::*;
pub use amount::*;
pub use error::*;
pub use identity::*;
pub use permission::*;
pub use proposal::*;
pub use vault::*;

/// Epoch-millisecond timestamp, as supplied by the engine's clock.
pub type Timestamp = u64;

/// Sentinel expiry meaning "never expires".
pub const NO_EXPIRY: Timestamp = 0;
