//! Admin commands - mint administrator credentials

use crate::display;
use crate::store::StateStore;

/// Mint and register a new AdminCap.
pub async fn create(store: &StateStore) -> anyhow::Result<()> {
    let engine = store.load_engine()?;
    let admin = engine.create_admin().await;
    store.save_engine(&engine).await?;

    display::success("AdminCap created");
    display::kv("AdminCap", &admin.id.to_string());
    display::info("This ID authorizes vault creation and permission issuance/revocation");
    Ok(())
}
