//! Default configuration command.

use anyhow::Result;
use edge_config::AppConfig;

pub fn run() -> Result<()> {
    print!("{}", AppConfig::default().to_toml()?);
    Ok(())
}
