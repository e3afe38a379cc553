//! Config command handler

use std::process::ExitCode;

use anyhow::Result;

use super::ConfigCommands;
use crate::cli::describe_source;
use crate::config::{LoadedConfig, default_config_path};

/// Print the effective configuration as TOML, or the per-user config path
pub fn handle_config_command(args: ConfigCommands, loaded: &LoadedConfig) -> Result<ExitCode> {
    if args.path {
        let path = default_config_path()
            .ok_or_else(|| anyhow::anyhow!("No config directory on this platform"))?;
        println!("{}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", describe_source(loaded));
    print!("{}", loaded.config.to_toml()?);
    Ok(ExitCode::SUCCESS)
}
