//! Guild-management admin command family.

pub mod confirm;
pub mod detail;
pub mod listing;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod view;

use std::time::Duration;

use tracing::error;
use twilight_http::Client;
use twilight_model::gateway::payload::incoming::MessageCreate;
use twilight_model::id::Id;

use steward_core::Context;
use steward_utils::permissions::is_operator;

use crate::CommandMeta;
use session::{GuildSession, sessions};

pub const META: CommandMeta = CommandMeta {
    name: "guilds",
    desc: "Browse and manage the guilds this bot is a member of.",
    category: "admin",
    usage: "!guilds [list|info <id>|leave <id>|stats]",
};

/// Dispatch the `guilds` subcommands.
pub async fn run(
    ctx: Context,
    msg: Box<MessageCreate>,
    arg1: Option<&str>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    if msg.guild_id.is_none() {
        http.create_message(msg.channel_id)
            .content("This command only works in servers.")
            .await?;
        return Ok(());
    }

    if !is_operator(http, &msg).await? {
        http.create_message(msg.channel_id)
            .content("You are not permitted to use this command.")
            .await?;
        return Ok(());
    }

    match arg1.unwrap_or("list") {
        "list" => listing::run_list(ctx.clone(), msg).await,
        "info" => detail::run_info(ctx.clone(), msg, arg_tail).await,
        "leave" => confirm::run_leave(ctx.clone(), msg, arg_tail).await,
        "stats" => stats::run_stats(ctx.clone(), msg).await,
        _ => {
            http.create_message(msg.channel_id)
                .content(&format!("Usage: `{}`", META.usage))
                .await?;
            Ok(())
        }
    }
}

/// Spawn the inactivity timer for a session message.
///
/// On expiry the session is dropped from the registry and the message's
/// controls are disabled. Both halves are idempotent, so a timer firing
/// while a transition is mid-flight is harmless: it waits on the session
/// mutex and then paints the disabled state last.
pub(crate) fn spawn_session_expiry(
    ctx: Context,
    message_id: u64,
    timeout_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(timeout_secs)).await;

        let Some(state) = sessions().expire(message_id).await else {
            return;
        };

        let session = state.lock().await;
        disable_session_controls(&ctx.http, message_id, &session).await;
    })
}

/// Best-effort removal of interactivity from a session's message.
///
/// Listing and detail views keep their content with all buttons disabled; a
/// timed-out confirmation drops the confirm/cancel pair and leaves the
/// detail content as it was. Edit failures (e.g. the message was deleted)
/// are logged and swallowed.
pub(crate) async fn disable_session_controls(
    http: &Client,
    message_id: u64,
    session: &GuildSession,
) {
    let components = match session {
        GuildSession::List(list) => {
            view::build_list_components(list.current_page, list.total_pages(), true)
        }
        GuildSession::Detail(detail) => view::build_detail_components(detail.guild.id, true),
        GuildSession::Confirming(_) => Vec::new(),
    };

    let update = http
        .update_message(Id::new(session.channel_id()), Id::new(message_id))
        .components(Some(&components))
        .await;

    if let Err(source) = update {
        error!(?source, message_id, "failed to disable session controls");
    }
}

/// Tear down any live session already owned by this invoker.
///
/// Keeps one interactive session per invoker: the superseded messages lose
/// their controls before the new session renders.
pub(crate) async fn teardown_superseded_sessions(ctx: &Context, invoker_id: u64) {
    for (message_id, state) in sessions().take_by_invoker(invoker_id).await {
        let session = state.lock().await;
        disable_session_controls(&ctx.http, message_id, &session).await;
    }
}
