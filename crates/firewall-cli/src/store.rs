//! Engine state persistence
//!
//! The engine itself is in-memory; the CLI snapshots it to a JSON file after
//! each mutating command and restores it on the next run. Default location
//! is `~/.firewall/state.json`, overridable with `--state-file` or the
//! `FIREWALL_STATE` environment variable.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use firewall_engine::{Firewall, FirewallState, SystemClock};

pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Resolve the state file path: CLI flag, then `FIREWALL_STATE`, then
    /// the default under the home directory.
    pub fn resolve(flag: Option<PathBuf>) -> Self {
        let path = flag
            .or_else(|| std::env::var_os("FIREWALL_STATE").map(PathBuf::from))
            .unwrap_or_else(Self::default_path);
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_path() -> PathBuf {
        dirs_next::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".firewall")
            .join("state.json")
    }

    /// Load the saved state; a missing file is an empty engine.
    pub fn load(&self) -> anyhow::Result<FirewallState> {
        if !self.path.exists() {
            return Ok(FirewallState::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading state file {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing state file {}", self.path.display()))
    }

    /// Load the saved state into an engine on the system clock.
    pub fn load_engine(&self) -> anyhow::Result<Firewall> {
        Ok(Firewall::from_snapshot(self.load()?, Arc::new(SystemClock)))
    }

    /// Snapshot the engine back to disk.
    pub async fn save_engine(&self, engine: &Firewall) -> anyhow::Result<()> {
        let state = engine.snapshot().await;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating state directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&state)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing state file {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firewall_types::Amount;

    #[tokio::test]
    async fn test_missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::resolve(Some(dir.path().join("state.json")));
        assert_eq!(store.load().unwrap(), FirewallState::default());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::resolve(Some(dir.path().join("nested").join("state.json")));

        let engine = store.load_engine().unwrap();
        let admin = engine.create_admin().await;
        let vault = engine.create_vault(&admin.id).await.unwrap();
        engine.deposit(&vault.id, Amount::new(42)).await.unwrap();
        store.save_engine(&engine).await.unwrap();

        let reloaded = store.load_engine().unwrap();
        assert_eq!(reloaded.vault(&vault.id).await.unwrap().balance, Amount::new(42));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error_not_a_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();
        let store = StateStore::resolve(Some(path));
        assert!(store.load().is_err());
    }
}
