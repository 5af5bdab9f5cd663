use anyhow::Result;
use kbsave_core::ScanConfig;

pub fn run(config: &ScanConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
