//! Users commands - resolve and look up directory users.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use slackline_directory::SearchType;

use super::{Context, interrupt_token, write_csv};

/// Arguments for the users command.
#[derive(Args, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// Find users matching a free-text query
    Resolve {
        /// Text to match
        query: String,

        /// Field to search: auto, username, display_name, real_name, email
        #[arg(short = 't', long, default_value = "auto")]
        search_type: SearchType,
    },

    /// Look up a single user by ID
    Get {
        /// User ID, e.g. U012AB3CD
        id: String,
    },
}

/// Run a users subcommand.
pub async fn run(args: UsersArgs, ctx: &Context) -> Result<()> {
    let provider = ctx.provider()?;
    provider.refresh_users(&interrupt_token()).await?;

    match args.command {
        UsersCommand::Resolve { query, search_type } => {
            let found = provider.resolve_users(&query, search_type)?;
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                write_csv(&found)?;
            }
        }
        UsersCommand::Get { id } => {
            let Some(user) = provider.cache().user(&id) else {
                bail!("no user with ID '{}'", id);
            };
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{} ({})", user.name, user.id);
                println!("  Real name:    {}", user.real_name);
                println!("  Display name: {}", user.profile.display_name);
                println!("  Email:        {}", user.profile.email);
                println!("  Bot:          {}", user.is_bot);
            }
        }
    }
    Ok(())
}
