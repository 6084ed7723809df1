//! Leave-guild confirmation sub-flow.
//!
//! A confirmation is always layered on detail content: either swapped onto a
//! live detail message via its Leave button, or rendered directly by the
//! `guilds leave <id>` subcommand. The window is short and the leave action
//! runs at most once per sub-session.

use tracing::{error, warn};
use twilight_model::gateway::payload::incoming::{InteractionCreate, MessageCreate};
use twilight_model::id::Id;

use steward_core::Context;
use steward_database::audit::record_guild_leave;
use steward_utils::gate::authorize;
use steward_utils::parse::parse_guild_id;
use steward_utils::respond::{
    defer_component_update, edit_original_content, respond_update_content,
};

use super::session::{
    CONFIRM_TIMEOUT_SECS, ConfirmEffect, ConfirmEvent, ConfirmationSession, GuildSession,
    apply_confirm_event, sessions,
};
use super::snapshot::{GuildRecord, fetch_guild_record};
use super::view;
use super::{spawn_session_expiry, teardown_superseded_sessions};

const CONFIRM_PROMPT: &str = "Leave pending confirmation. This cannot be undone.";

/// Run the `guilds leave <id>` subcommand: render detail content with the
/// confirmation pair on a fresh message.
pub async fn run_leave(
    ctx: Context,
    msg: Box<MessageCreate>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let Some(guild_id) = arg_tail.and_then(parse_guild_id) else {
        http.create_message(msg.channel_id)
            .content("Usage: `!guilds leave <id>`")
            .await?;
        return Ok(());
    };

    let guild = match fetch_guild_record(http, Id::new(guild_id)).await {
        Ok(guild) => guild,
        Err(source) => {
            error!(?source, guild_id, "guild fetch for leave failed");
            http.create_message(msg.channel_id)
                .content("I am not in that guild, or it could not be fetched.")
                .await?;
            return Ok(());
        }
    };

    let invoker_id = msg.author.id.get();
    let detail_embed = view::build_detail_embed(&guild)?;
    let prompt_embed = view::build_confirmation_embed(&guild)?;
    let components = view::build_confirmation_components();

    teardown_superseded_sessions(&ctx, invoker_id).await;

    let message = http
        .create_message(msg.channel_id)
        .content(CONFIRM_PROMPT)
        .embeds(&[detail_embed, prompt_embed])
        .components(&components)
        .await?
        .model()
        .await?;

    let message_id = message.id.get();
    let session = ConfirmationSession::new(invoker_id, msg.channel_id.get(), guild);
    let expiry = spawn_session_expiry(ctx.clone(), message_id, CONFIRM_TIMEOUT_SECS);
    sessions()
        .insert(
            message_id,
            invoker_id,
            GuildSession::Confirming(session),
            expiry,
        )
        .await;

    Ok(())
}

/// Handle a `leave_guild_<id>` press: swap a live detail view into its
/// confirmation sub-flow on the same message.
pub async fn handle_leave_request(
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

    let mut session = state.lock().await;
    let GuildSession::Detail(detail) = &*session else {
        // Only a detail view may spawn a confirmation; anything else is a
        // stale or mismatched control.
        defer_component_update(http, interaction).await?;
        return Ok(());
    };

    if !authorize(actor_id, detail.invoker_id) || detail.guild.id != guild_id {
        defer_component_update(http, interaction).await?;
        return Ok(());
    }

    let confirmation =
        ConfirmationSession::new(detail.invoker_id, detail.channel_id, detail.guild.clone());
    let detail_embed = view::build_detail_embed(&confirmation.guild)?;
    let prompt_embed = view::build_confirmation_embed(&confirmation.guild)?;
    *session = GuildSession::Confirming(confirmation);
    drop(session);

    respond_update_content(
        http,
        interaction,
        CONFIRM_PROMPT,
        &[detail_embed, prompt_embed],
        &view::build_confirmation_components(),
    )
    .await?;

    // The confirmation runs on its own, shorter window.
    let expiry = spawn_session_expiry(ctx.clone(), message_id, CONFIRM_TIMEOUT_SECS);
    sessions().rearm(message_id, expiry).await;

    Ok(())
}

/// Handle a `confirm_leave` / `cancel_leave` press.
pub async fn handle_confirmation(
    ctx: Context,
    interaction: &InteractionCreate,
    event: ConfirmEvent,
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

    let mut session = state.lock().await;
    let GuildSession::Confirming(confirmation) = &mut *session else {
        defer_component_update(http, interaction).await?;
        return Ok(());
    };

    if !authorize(actor_id, confirmation.invoker_id) {
        defer_component_update(http, interaction).await?;
        return Ok(());
    }

    let guild = confirmation.guild.clone();
    match apply_confirm_event(confirmation, event) {
        ConfirmEffect::Stale => {
            // The session resolved while this press was in flight.
            defer_component_update(http, interaction).await?;
        }
        ConfirmEffect::Cancelled => {
            drop(session);
            let detail_embed = view::build_detail_embed(&guild)?;
            respond_update_content(http, interaction, "Leave cancelled.", &[detail_embed], &[])
                .await?;
            sessions().remove(message_id).await;
        }
        ConfirmEffect::ExecuteLeave => {
            drop(session);
            execute_leave(&ctx, interaction, &guild).await?;
            sessions().remove(message_id).await;
        }
    }

    Ok(())
}

/// Execute the irreversible leave and paint the terminal notice.
///
/// The action is never retried: a failure is surfaced once and the session
/// resolves either way.
async fn execute_leave(
    ctx: &Context,
    interaction: &InteractionCreate,
    guild: &GuildRecord,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let detail_embed = view::build_detail_embed(guild)?;

    respond_update_content(http, interaction, "Leaving guild...", &[detail_embed], &[]).await?;

    match http.leave_guild(Id::new(guild.id)).await {
        Ok(_) => {
            if let Err(source) = record_guild_leave(&ctx.db, guild.id, &guild.name).await {
                warn!(?source, guild_id = guild.id, "leave audit write failed");
            }

            let notice = format!("Left guild **{}**.", guild.name.replace('@', "@\u{200B}"));
            edit_original_content(http, interaction, &notice, &[], &[]).await?;
        }
        Err(source) => {
            error!(?source, guild_id = guild.id, "leave guild failed");
            let detail_embed = view::build_detail_embed(guild)?;
            edit_original_content(
                http,
                interaction,
                "Failed to leave the guild. It was not retried.",
                &[detail_embed],
                &[],
            )
            .await?;
        }
    }

    Ok(())
}
