//! Single-guild detail session and its invite action.

use tracing::{error, warn};
use twilight_model::channel::ChannelType;
use twilight_model::gateway::payload::incoming::{InteractionCreate, MessageCreate};
use twilight_model::id::{Id, marker::GuildMarker};

use steward_core::Context;
use steward_database::audit::record_invite_created;
use steward_utils::gate::authorize;
use steward_utils::parse::parse_guild_id;
use steward_utils::respond::{defer_component_update, respond_ephemeral_message};

use super::session::{DETAIL_TIMEOUT_SECS, DetailSession, GuildSession, sessions};
use super::snapshot::fetch_guild_record;
use super::view;
use super::{spawn_session_expiry, teardown_superseded_sessions};

/// Run the `guilds info <id>` subcommand: render the detail view and open
/// its session.
pub async fn run_info(
    ctx: Context,
    msg: Box<MessageCreate>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let Some(guild_id) = arg_tail.and_then(parse_guild_id) else {
        http.create_message(msg.channel_id)
            .content("Usage: `!guilds info <id>`")
            .await?;
        return Ok(());
    };

    let guild = match fetch_guild_record(http, Id::new(guild_id)).await {
        Ok(guild) => guild,
        Err(source) => {
            error!(?source, guild_id, "guild detail fetch failed");
            http.create_message(msg.channel_id)
                .content("I am not in that guild, or it could not be fetched.")
                .await?;
            return Ok(());
        }
    };

    let invoker_id = msg.author.id.get();
    let embed = view::build_detail_embed(&guild)?;
    let components = view::build_detail_components(guild.id, false);

    teardown_superseded_sessions(&ctx, invoker_id).await;

    let message = http
        .create_message(msg.channel_id)
        .embeds(&[embed])
        .components(&components)
        .await?
        .model()
        .await?;

    let message_id = message.id.get();
    let session = DetailSession::new(invoker_id, msg.channel_id.get(), guild);
    let expiry = spawn_session_expiry(ctx.clone(), message_id, DETAIL_TIMEOUT_SECS);
    sessions()
        .insert(message_id, invoker_id, GuildSession::Detail(session), expiry)
        .await;

    Ok(())
}

/// Handle a `guild_invite_<id>` press on a detail message.
///
/// The invite outcome is surfaced ephemerally; the detail view itself is
/// left untouched.
pub async fn handle_invite(
    ctx: Context,
    interaction: &InteractionCreate,
    guild_id: u64,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let Some(message) = interaction.message.as_ref() else {
        return Ok(());
    };
    let message_id = message.id.get();

    let Some(state) = sessions().get(message_id).await else {
        defer_component_update(http, interaction).await?;
        return Ok(());
    };

    let Some(actor_id) = interaction.author_id().map(|id| id.get()) else {
        defer_component_update(http, interaction).await?;
        return Ok(());
    };

    let session = state.lock().await;
    let GuildSession::Detail(detail) = &*session else {
        defer_component_update(http, interaction).await?;
        return Ok(());
    };

    if !authorize(actor_id, detail.invoker_id) || detail.guild.id != guild_id {
        defer_component_update(http, interaction).await?;
        return Ok(());
    }

    match create_invite(&ctx, Id::new(guild_id)).await {
        Ok(invite_url) => {
            respond_ephemeral_message(http, interaction, &format!("Invite created: {invite_url}"))
                .await?;
        }
        Err(source) => {
            error!(?source, guild_id, "invite creation failed");
            respond_ephemeral_message(
                http,
                interaction,
                "Could not create an invite for this guild.",
            )
            .await?;
        }
    }

    // The invite action counts as activity on the detail session.
    let expiry = spawn_session_expiry(ctx.clone(), message_id, DETAIL_TIMEOUT_SECS);
    sessions().rearm(message_id, expiry).await;

    Ok(())
}

/// Create an invite in the guild's first text channel.
async fn create_invite(ctx: &Context, guild_id: Id<GuildMarker>) -> anyhow::Result<String> {
    let http = &ctx.http;
    let channels = http.guild_channels(guild_id).await?.models().await?;

    let Some(channel) = channels
        .iter()
        .find(|channel| matches!(channel.kind, ChannelType::GuildText))
    else {
        anyhow::bail!("guild has no text channel to invite into");
    };

    let invite = http.create_invite(channel.id).await?.model().await?;

    if let Err(source) = record_invite_created(&ctx.db, guild_id.get(), &invite.code).await {
        // Bookkeeping only; the invite itself already exists.
        warn!(?source, guild_id = guild_id.get(), "invite audit write failed");
    }

    Ok(format!("https://discord.gg/{}", invite.code))
}
