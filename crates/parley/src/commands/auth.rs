//! Auth command - manage stored bearer tokens.

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use parley_client::{StoredTokens, TokenStore as _};
use serde::Serialize;

use super::{Context, print_json};

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Store an access token (and optionally a refresh token)
    Login {
        /// Access token sent as the bearer credential
        #[arg(long)]
        access: String,

        /// Refresh token used after a 401
        #[arg(long)]
        refresh: Option<String>,

        /// Access token lifetime in seconds
        #[arg(long)]
        expires_in: Option<u64>,
    },

    /// Show whether tokens are stored
    Status,

    /// Remove stored tokens
    Logout,
}

#[derive(Debug, Serialize)]
struct AuthStatus {
    logged_in: bool,
    has_refresh_token: bool,
    token_file: Option<String>,
}

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    let token_file = ctx
        .config
        .token_file()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;
    let store = ctx.token_store();

    match args.command {
        AuthCommand::Login {
            access,
            refresh,
            expires_in,
        } => {
            let tokens = StoredTokens {
                access_token: access,
                refresh_token: refresh,
                expires_in,
            };
            store.save(&tokens).await?;
            println!("Tokens saved to {}", token_file.display());
        }
        AuthCommand::Status => {
            let tokens = store.load().await?;
            let status = AuthStatus {
                logged_in: tokens.is_some(),
                has_refresh_token: tokens
                    .as_ref()
                    .is_some_and(|t| t.refresh_token.is_some()),
                token_file: Some(token_file.display().to_string()),
            };

            if ctx.json_output {
                return print_json(&status);
            }

            if status.logged_in {
                println!("Logged in (tokens in {})", token_file.display());
                if !status.has_refresh_token {
                    println!("No refresh token stored; a 401 will not be retried.");
                }
            } else {
                println!("Not logged in. Run 'parley auth login --access <token>'.");
            }
        }
        AuthCommand::Logout => {
            store.clear().await?;
            println!("Stored tokens removed");
        }
    }

    Ok(())
}
