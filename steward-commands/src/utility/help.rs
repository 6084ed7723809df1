use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{COMMANDS, CommandMeta};
use steward_core::Context;
use steward_utils::embed::build_basic_embed;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "List available commands.",
    category: "utility",
    usage: "!help",
};

/// List every registered command with its usage line.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;

    let mut description = String::new();
    for command in COMMANDS {
        description.push_str(&format!("`{}` — {}\n", command.usage, command.desc));
    }

    let embed = build_basic_embed("Commands", description)?;
    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
