use anyhow::bail;
use reel_report::types::Config;
use std::path::Path;

fn mask(key: &mut Option<String>) {
    if key.is_some() {
        *key = Some("***".to_string());
    }
}

pub(crate) fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if !force && std::fs::metadata(path).is_ok() {
        bail!(
            "Configuration file `{}` already exists, use --force to overwrite it",
            path.display()
        );
    }

    Config::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Print the effective configuration with API keys masked
pub(crate) fn show(config: &Config) -> anyhow::Result<()> {
    let mut config = config.clone();
    mask(&mut config.weather.api_key);
    mask(&mut config.tmdb.api_key);
    mask(&mut config.youtube.api_key);

    print!("{}", serde_yml::to_string(&config)?);
    Ok(())
}
