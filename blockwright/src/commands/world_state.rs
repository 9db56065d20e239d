//! `blockwright world-state`: one `get_world_state` call, for checking the
//! world service without involving the model.

use anyhow::{Context, Result};
use blockwright_agent::{HttpWorldClient, WorldApi};
use blockwright_core::config::env_keys::world;
use blockwright_core::config::{load_dotenv, Overlay, ProcessEnv, WorldConfig};
use serde_json::json;

pub async fn show_world_state(world_url: Option<String>) -> Result<()> {
    load_dotenv();
    let env = ProcessEnv;
    let source = Overlay::new(&env).set(world::URL, world_url);
    let config = WorldConfig::from_source(&source).context("configuration error")?;
    let client = HttpWorldClient::new(&config)?;

    match client.get_world_state().await {
        Ok(snapshot) => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", json!({ "error": err.to_string(), "kind": err.kind() }));
            Err(err).context(format!("world service at {} failed", config.base_url))
        }
    }
}
