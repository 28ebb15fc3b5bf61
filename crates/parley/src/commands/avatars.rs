//! Avatars command - list talking avatars.

use anyhow::Result;
use clap::Args;
use console::{Style, style};

use super::{Context, print_json};

/// Arguments for the avatars command.
#[derive(Args, Debug)]
pub struct AvatarsArgs {
    /// Show the built-in avatar list if the backend cannot be reached
    #[arg(long)]
    pub fallback: bool,
}

/// Run the avatars command.
pub async fn run(args: AvatarsArgs, ctx: &Context) -> Result<()> {
    let broker = ctx.broker()?;

    let avatars = if args.fallback {
        broker.talking_avatars_or_fallback().await
    } else {
        broker.talking_avatars().await?
    };

    if ctx.json_output {
        return print_json(&avatars);
    }

    let dim = Style::new().dim();

    println!();
    println!("{}", style("Talking Avatars").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    if avatars.is_empty() {
        println!("  {}", dim.apply_to("No avatars available"));
    }
    for avatar in &avatars {
        println!("  {}  {}", style(&avatar.id).cyan(), avatar.name);
        if ctx.verbose
            && let Some(preview) = &avatar.preview_url
        {
            println!("      {}", dim.apply_to(preview));
        }
    }
    println!();

    Ok(())
}
