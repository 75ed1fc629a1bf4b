//! Firewall Engine - the authorization state machine
//!
//! The engine is the only component that moves value. It issues and revokes
//! delegated spending permissions, records transfer proposals, and performs
//! the single transition that debits a vault. Every transition either fully
//! commits or fails with a typed error and no observable state change.
//!
//! # Two-phase transfers
//!
//! Agents may PROPOSE transfers; only execution moves money. Proposal-time
//! checks screen the agent, revocation, expiry, and the per-transfer cap.
//! Quota is deliberately screened only at execution, against the live usage
//! counter, so competing proposals under one permission are resolved at the
//! moment of commit.
//!
//! # Concurrency
//!
//! Object stores live behind `tokio::sync::RwLock`s acquired in a fixed
//! order. A transition takes every lock it needs before validating, so its
//! checks and mutations form one critical section: racing executions are
//! ordered, first commit wins, and the loser re-validates against updated
//! state.

pub mod clock;
pub mod engine;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::Firewall;
pub use state::FirewallState;
