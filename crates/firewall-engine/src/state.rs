//! Full-state snapshots
//!
//! The engine is in-memory; persistence technology is the caller's choice.
//! `FirewallState` is a serde-serializable export of every object store so a
//! front end can save and restore the engine between runs.

use std::collections::HashMap;
use std::sync::Arc;

use firewall_types::{ActionProposal, AdminCap, Permission, TransferRecord, Vault};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::engine::Firewall;

/// Serializable export of the engine's complete object state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirewallState {
    pub admins: Vec<AdminCap>,
    pub vaults: Vec<Vault>,
    pub permissions: Vec<Permission>,
    pub proposals: Vec<ActionProposal>,
    pub transfers: Vec<TransferRecord>,
}

impl Firewall {
    /// Export the full engine state.
    ///
    /// Takes read locks on every store in the engine's fixed order, so the
    /// snapshot is a consistent cut - no transition can interleave. Entries
    /// are sorted by ID so the export is deterministic.
    pub async fn snapshot(&self) -> FirewallState {
        let admins = self.admins.read().await;
        let vaults = self.vaults.read().await;
        let permissions = self.permissions.read().await;
        let proposals = self.proposals.read().await;
        let transfers = self.transfers.read().await;

        let mut state = FirewallState {
            admins: admins.values().cloned().collect(),
            vaults: vaults.values().cloned().collect(),
            permissions: permissions.values().cloned().collect(),
            proposals: proposals.values().cloned().collect(),
            transfers: transfers.clone(),
        };
        state.admins.sort_by_key(|a| a.id.0);
        state.vaults.sort_by_key(|v| v.id.0);
        state.permissions.sort_by_key(|p| p.id.0);
        state.proposals.sort_by_key(|p| p.id.0);
        state
    }

    /// Rebuild an engine from a snapshot with the given time source.
    pub fn from_snapshot(state: FirewallState, clock: Arc<dyn Clock>) -> Self {
        Self {
            admins: Arc::new(RwLock::new(
                state.admins.into_iter().map(|a| (a.id.clone(), a)).collect(),
            )),
            vaults: Arc::new(RwLock::new(
                state.vaults.into_iter().map(|v| (v.id.clone(), v)).collect(),
            )),
            permissions: Arc::new(RwLock::new(
                state
                    .permissions
                    .into_iter()
                    .map(|p| (p.id.clone(), p))
                    .collect::<HashMap<_, _>>(),
            )),
            proposals: Arc::new(RwLock::new(
                state
                    .proposals
                    .into_iter()
                    .map(|p| (p.id.clone(), p))
                    .collect::<HashMap<_, _>>(),
            )),
            transfers: Arc::new(RwLock::new(state.transfers)),
            clock,
        }
    }
}
