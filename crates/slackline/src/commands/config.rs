//! Config command - inspect resolved configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use slackline_config::CredentialSlot;

use super::{Context, display_path, provider_config};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show resolved settings and where each credential came from
    Show,

    /// Show which config files are loaded and their precedence
    Which,
}

#[derive(Debug, Serialize)]
struct SlotOutput {
    slot: &'static str,
    env_var: &'static str,
    source: Option<String>,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    credentials: Vec<SlotOutput>,
    users_snapshot: String,
    conversations_snapshot: String,
    proxy: Option<String>,
    ca_cert: Option<String>,
    ca_insecure: bool,
    pages_per_minute: u32,
    burst: u32,
}

/// Run a config subcommand.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Which => which(ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let settings = &ctx.settings;
    let resolved = provider_config(settings);

    let output = ShowOutput {
        credentials: CredentialSlot::ALL
            .iter()
            .map(|slot| SlotOutput {
                slot: slot.config_key(),
                env_var: slot.env_var(),
                source: settings.credentials.get(*slot).map(|s| s.source.to_string()),
            })
            .collect(),
        users_snapshot: resolved.users_snapshot.display().to_string(),
        conversations_snapshot: resolved.conversations_snapshot.display().to_string(),
        proxy: settings.proxy.clone(),
        ca_cert: settings.ca_cert.as_ref().map(|p| p.display().to_string()),
        ca_insecure: settings.ca_insecure,
        pages_per_minute: resolved.rate.pages_per_minute,
        burst: resolved.rate.burst,
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Credentials:");
    for slot in &output.credentials {
        println!(
            "  {:<16} {}",
            slot.slot,
            slot.source.as_deref().unwrap_or("not set")
        );
    }
    println!();
    println!("Snapshots:");
    println!("  users          {}", output.users_snapshot);
    println!("  conversations  {}", output.conversations_snapshot);
    println!();
    println!("HTTP:");
    println!("  proxy          {}", output.proxy.as_deref().unwrap_or("none"));
    println!("  ca_cert        {}", display_path(settings.ca_cert.as_ref()));
    println!("  ca_insecure    {}", output.ca_insecure);
    println!();
    println!("Fetch:");
    println!("  pages/minute   {}", output.pages_per_minute);
    println!("  burst          {}", output.burst);
    Ok(())
}

fn which(ctx: &Context) -> Result<()> {
    if ctx.json_output {
        let sources: Vec<_> = ctx
            .loaded
            .sources
            .iter()
            .map(|s| serde_json::json!({ "path": s.path.display().to_string(), "loaded": s.loaded }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }

    println!("Config files (lowest precedence first):");
    for source in &ctx.loaded.sources {
        let marker = if source.loaded { "loaded" } else { "not found" };
        println!("  {} ({})", source.path.display(), marker);
    }
    Ok(())
}
