//! Whoami command - authenticates and prints the identity.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use slackline_directory::Protocol;

use super::Context;

/// Arguments for the whoami command.
#[derive(Args, Debug)]
pub struct WhoamiArgs {}

#[derive(Debug, Serialize)]
struct WhoamiOutput {
    mode: &'static str,
    user: String,
    user_id: String,
    team: String,
    team_id: String,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    enterprise_id: Option<String>,
    protocol: &'static str,
    can_search: bool,
}

/// Run the whoami command.
pub async fn run(_args: WhoamiArgs, ctx: &Context) -> Result<()> {
    let provider = ctx.provider()?;
    let identity = provider.identity().await?;

    let output = WhoamiOutput {
        mode: provider.credential_mode().as_str(),
        user: identity.user.clone(),
        user_id: identity.user_id.clone(),
        team: identity.team.clone(),
        team_id: identity.team_id.clone(),
        url: identity.url.clone(),
        enterprise_id: identity.enterprise_id.clone(),
        protocol: match identity.protocol() {
            Protocol::Standard => "standard",
            Protocol::Enterprise => "enterprise",
        },
        can_search: provider.session().credential().can_search(),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", identity);
        println!("  Mode:     {}", output.mode);
        println!("  Protocol: {}", output.protocol);
        println!("  URL:      {}", output.url);
        if ctx.verbose {
            println!("  Search:   {}", if output.can_search { "yes" } else { "no" });
        }
    }
    Ok(())
}
