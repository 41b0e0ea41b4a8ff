//! Channels commands - list and look up conversations.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use serde::Serialize;
use slackline_directory::{Conversation, ConversationType};

use super::{Context, interrupt_token, write_csv};

/// Arguments for the channels command.
#[derive(Args, Debug)]
pub struct ChannelsArgs {
    #[command(subcommand)]
    pub command: ChannelsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ChannelsCommand {
    /// List conversations of the given types, ordered by name
    List {
        /// Comma-separated: public_channel, private_channel, im, mpim
        #[arg(short, long, value_delimiter = ',', default_value = "public_channel")]
        types: Vec<ConversationType>,
    },

    /// Look up one conversation by ID or by name (`#general`, `@alice`)
    Get {
        /// Conversation ID or name
        key: String,
    },
}

/// Flat row for CSV output.
#[derive(Debug, Serialize)]
struct ChannelRow<'a> {
    id: &'a str,
    name: &'a str,
    topic: &'a str,
    purpose: &'a str,
    #[serde(rename = "memberCount")]
    member_count: u32,
}

impl<'a> From<&'a Conversation> for ChannelRow<'a> {
    fn from(c: &'a Conversation) -> Self {
        Self {
            id: &c.id,
            name: &c.name,
            topic: &c.topic,
            purpose: &c.purpose,
            member_count: c.member_count,
        }
    }
}

/// Run a channels subcommand.
pub async fn run(args: ChannelsArgs, ctx: &Context) -> Result<()> {
    let provider = ctx.provider()?;
    provider.refresh(&interrupt_token()).await?;

    match args.command {
        ChannelsCommand::List { types } => {
            let found = provider.conversations_by_type(&types);
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                let rows: Vec<ChannelRow<'_>> = found.iter().map(ChannelRow::from).collect();
                write_csv(&rows)?;
            }
        }
        ChannelsCommand::Get { key } => {
            let cache = provider.cache();
            let Some(found) = cache
                .conversation(&key)
                .or_else(|| cache.conversation_by_name(&key))
            else {
                bail!("no conversation '{}'", key);
            };
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                write_csv(&[ChannelRow::from(&found)])?;
            }
        }
    }
    Ok(())
}
