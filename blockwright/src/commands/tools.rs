//! `blockwright tools`: dump the catalog the model receives.

use anyhow::Result;
use blockwright_agent::extensions::ToolRegistry;

pub fn print_tools(enable_memory: bool) -> Result<()> {
    let registry = ToolRegistry::standard(enable_memory);
    println!(
        "{}",
        serde_json::to_string_pretty(registry.all_tool_definitions())?
    );
    Ok(())
}
