//! Config command - configuration management.

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use parley_config::{ParleyConfig, save_config, xdg_config_path};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show,

    /// Show which config files were checked and loaded
    Which,

    /// Show the user configuration file path
    Path,

    /// Write a config file with default values
    Init {
        /// Create project-local config (./parley.toml) instead of user config
        #[arg(long)]
        local: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let resolved = ParleyConfig {
                server: Some(ctx.config.config.server()),
                cache: Some(ctx.config.config.cache()),
                auth: Some(ctx.config.config.auth()),
            };
            print!("{}", resolved.to_toml()?);
            if ctx.verbose {
                println!("# server override: {}", ctx.server_url);
            }
        }
        ConfigCommand::Which => {
            for source in &ctx.config.sources {
                let mark = if source.loaded { "loaded" } else { "missing" };
                println!("{:8} {}", mark, source.path.display());
            }
        }
        ConfigCommand::Path => {
            let path = xdg_config_path()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { local, force } => {
            let path = if local {
                PathBuf::from("parley.toml")
            } else {
                xdg_config_path().ok_or_else(|| anyhow!("Could not determine config directory"))?
            };

            if path.exists() && !force {
                return Err(anyhow!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
            }

            let defaults = ParleyConfig {
                server: Some(Default::default()),
                cache: Some(Default::default()),
                auth: None,
            };
            save_config(&defaults, &path)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
