//! Administrator credential

use crate::{identity::AdminCapId, Timestamp};
use serde::{Deserialize, Serialize};

/// Unforgeable administrator credential.
///
/// Holding a registered `AdminCapId` is the ownership proof for vault
/// creation and permission issuance/revocation. Any number of independent
/// credentials may exist; the engine does not deduplicate administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCap {
    pub id: AdminCapId,
    pub created_at: Timestamp,
}

impl AdminCap {
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            id: AdminCapId::new(),
            created_at,
        }
    }
}
