//! Token command - request an avatar API token.

use anyhow::Result;
use clap::Args;
use console::Style;
use parley_client::TokenGrant;

use super::{Context, print_json};

/// Arguments for the token command.
#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Print the full token instead of a masked preview
    #[arg(long)]
    pub reveal: bool,
}

/// Run the token command.
pub async fn run(args: TokenArgs, ctx: &Context) -> Result<()> {
    let broker = ctx.broker()?;
    let grant = broker.initialize().await?;
    let shown = displayed_token(&grant, args.reveal);

    if ctx.json_output {
        return print_json(&TokenGrant { token: shown });
    }

    let dim = Style::new().dim();
    println!("{} {}", dim.apply_to("Token:"), shown);
    if ctx.verbose {
        println!("{} {}", dim.apply_to("Server:"), ctx.server_url);
    }

    Ok(())
}

/// The token as printed: masked unless `reveal` is set.
fn displayed_token(grant: &TokenGrant, reveal: bool) -> String {
    if reveal {
        grant.token.clone()
    } else {
        mask(&grant.token)
    }
}

/// Keep the first few characters of a secret.
fn mask(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    if prefix.len() == token.len() {
        "*".repeat(token.len())
    } else {
        format!("{}…", prefix)
    }
}
