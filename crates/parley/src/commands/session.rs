//! Session command - create and close avatar sessions.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};

use super::{Context, print_json};

/// Arguments for the session command.
#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Create a session for an avatar
    Create {
        /// Avatar ID
        avatar_id: String,
    },

    /// Close a session
    Close {
        /// Session ID
        session_id: String,
    },
}

/// Run the session command.
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    let broker = ctx.broker()?;

    match args.command {
        SessionCommand::Create { avatar_id } => {
            let session = broker.create_session(&avatar_id).await?;

            if ctx.json_output {
                return print_json(&session);
            }

            let dim = Style::new().dim();
            println!("{} {}", style("✓").green(), style("Session created").bold());
            println!("  {} {}", dim.apply_to("Session:"), session.id);
            println!("  {} {}", dim.apply_to("Avatar:"), session.avatar_id);
            if ctx.verbose {
                for (key, value) in &session.extra {
                    println!("  {} {}", dim.apply_to(format!("{}:", key)), value);
                }
            }
        }
        SessionCommand::Close { session_id } => {
            let closed = broker.close_session(&session_id).await?;

            if ctx.json_output {
                return print_json(&serde_json::json!({ "id": session_id, "closed": closed }));
            }

            println!("{} Session {} closed", style("✓").green(), session_id);
        }
    }

    Ok(())
}
