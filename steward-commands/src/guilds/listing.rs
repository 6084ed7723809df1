//! Paginated guild listing session.

use tracing::error;
use twilight_model::gateway::payload::incoming::{InteractionCreate, MessageCreate};

use steward_core::Context;
use steward_utils::gate::authorize;
use steward_utils::respond::{
    defer_component_update, edit_original_response, respond_ephemeral_embed,
    respond_ephemeral_message, respond_update_message,
};

use super::session::{
    GuildSession, LIST_TIMEOUT_SECS, ListEffect, ListEvent, ListSession, apply_list_event, sessions,
};
use super::snapshot::fetch_guild_collection;
use super::stats::aggregate;
use super::view;
use super::{spawn_session_expiry, teardown_superseded_sessions};

/// Run the `guilds list` subcommand: render page 0 and open the session.
pub async fn run_list(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let invoker_id = msg.author.id.get();

    let guilds = fetch_guild_collection(http).await?;
    let session = ListSession::new(invoker_id, msg.channel_id.get(), guilds);

    let embed = view::build_list_embed(&session)?;
    let components =
        view::build_list_components(session.current_page, session.total_pages(), false);

    teardown_superseded_sessions(&ctx, invoker_id).await;

    let message = http
        .create_message(msg.channel_id)
        .embeds(&[embed])
        .components(&components)
        .await?
        .model()
        .await?;

    // An empty collection is a terminal no-data view with nothing to track.
    if session.total_pages() == 0 {
        return Ok(());
    }

    let message_id = message.id.get();
    let expiry = spawn_session_expiry(ctx.clone(), message_id, LIST_TIMEOUT_SECS);
    sessions()
        .insert(message_id, invoker_id, GuildSession::List(session), expiry)
        .await;

    Ok(())
}

/// Handle one navigation/stats/refresh press on a listing message.
pub async fn handle_component(
    ctx: Context,
    interaction: &InteractionCreate,
    event: ListEvent,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let Some(message) = interaction.message.as_ref() else {
        return Ok(());
    };
    let message_id = message.id.get();

    let Some(state) = sessions().get(message_id).await else {
        // Stale control set from an expired or superseded session.
        defer_component_update(http, interaction).await?;
        return Ok(());
    };

    let Some(actor_id) = interaction.author_id().map(|id| id.get()) else {
        defer_component_update(http, interaction).await?;
        return Ok(());
    };

    let mut session = state.lock().await;
    let GuildSession::List(list) = &mut *session else {
        defer_component_update(http, interaction).await?;
        return Ok(());
    };

    if !authorize(actor_id, list.invoker_id) {
        // Non-invoker presses are acknowledged with no visible response.
        defer_component_update(http, interaction).await?;
        return Ok(());
    }

    let render = match apply_list_event(list, event) {
        ListEffect::Rerender => {
            let embed = view::build_list_embed(list)?;
            let components =
                view::build_list_components(list.current_page, list.total_pages(), false);
            respond_update_message(http, interaction, &[embed], &components).await
        }
        ListEffect::Refetch => {
            defer_component_update(http, interaction).await?;
            match fetch_guild_collection(http).await {
                Ok(guilds) => {
                    list.reset_with(guilds);
                    let embed = view::build_list_embed(list)?;
                    let components =
                        view::build_list_components(list.current_page, list.total_pages(), false);
                    edit_original_response(http, interaction, &[embed], &components).await
                }
                Err(source) => {
                    // The session keeps its previous collection; the press was
                    // already acknowledged, so the view simply stays put.
                    error!(?source, "guild refresh fetch failed");
                    Ok(())
                }
            }
        }
        ListEffect::ShowStats => match aggregate(&list.guilds) {
            Some(snapshot) => {
                let embed = view::build_stats_embed(&snapshot)?;
                respond_ephemeral_embed(http, interaction, embed).await
            }
            None => respond_ephemeral_message(http, interaction, "I am not in any guilds.").await,
        },
    };

    if let Err(source) = render {
        // The hosting message is gone or unwritable; drop the session.
        error!(?source, message_id, "listing render failed, tearing down session");
        drop(session);
        sessions().remove(message_id).await;
        return Ok(());
    }

    // Authorized activity rearms the inactivity window.
    let expiry = spawn_session_expiry(ctx.clone(), message_id, LIST_TIMEOUT_SECS);
    sessions().rearm(message_id, expiry).await;

    Ok(())
}
