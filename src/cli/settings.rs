use anyhow::Result;

use crate::core::AppConfig;

pub fn run(config: &AppConfig) -> Result<()> {
    let settings = config.settings()?;
    println!("{}", settings.summary());
    println!("API host: {}", config.api_hostname);
    Ok(())
}
