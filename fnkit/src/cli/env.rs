use anyhow::Result;
use fnkit_core::config::ToolkitConfig;

pub fn run(config: &ToolkitConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
