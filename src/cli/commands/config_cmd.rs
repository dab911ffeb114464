//! Configuration management commands.

use pageshell::config::Config;

use crate::cli::icons::{dim_arrow, info};

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    match &config.source_path {
        Some(path) => eprintln!("{} Loaded from {}", info(), path.display()),
        None => eprintln!("{} No config file found, using defaults", info()),
    }
    eprintln!(
        "{} Records stored in {}",
        dim_arrow(),
        config.store_file().display()
    );

    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
