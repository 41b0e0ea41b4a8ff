//! Refresh command - populates the directory and writes snapshots.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::{Context, interrupt_token};

/// Arguments for the refresh command.
#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Ignore snapshots and fetch everything from the API
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct RefreshOutput {
    users: usize,
    conversations: usize,
    users_snapshot: String,
    conversations_snapshot: String,
}

/// Run the refresh command.
pub async fn run(args: RefreshArgs, ctx: &Context) -> Result<()> {
    let provider = ctx.provider()?;
    let cancel = interrupt_token();

    if args.force {
        provider.fetch_all(&cancel).await?;
    } else {
        provider.refresh(&cancel).await?;
    }

    let cache = provider.cache();
    let output = RefreshOutput {
        users: cache.user_count(),
        conversations: cache.conversation_count(),
        users_snapshot: provider.snapshots().users_path().display().to_string(),
        conversations_snapshot: provider.snapshots().conversations_path().display().to_string(),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Users:         {}", output.users);
        println!("Conversations: {}", output.conversations);
        if ctx.verbose {
            println!("Snapshots:     {}", output.users_snapshot);
            println!("               {}", output.conversations_snapshot);
        }
    }
    Ok(())
}
