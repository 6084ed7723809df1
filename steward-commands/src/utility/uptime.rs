use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use steward_core::Context;
use steward_utils::time::format_uptime;

pub const META: CommandMeta = CommandMeta {
    name: "uptime",
    desc: "Show how long the bot has been running.",
    category: "utility",
    usage: "!uptime",
};

/// Report the process uptime.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let uptime = format_uptime(ctx.started_at.elapsed());

    http.create_message(msg.channel_id)
        .content(&format!("Up for {uptime}."))
        .await?;

    Ok(())
}
