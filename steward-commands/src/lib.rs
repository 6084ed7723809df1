pub mod guilds;
pub mod utility;

use tracing::{debug, error};
use twilight_model::{
    application::interaction::InteractionData,
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
};

use steward_core::Context;
use steward_utils::COMMAND_PREFIX;
use steward_utils::parse::parse_custom_id_suffix;
use steward_utils::respond::defer_component_update;

use guilds::session::{ConfirmEvent, ListEvent};
use guilds::view::{
    CANCEL_LEAVE_ID, CONFIRM_LEAVE_ID, INVITE_PREFIX, LEAVE_PREFIX, NEXT_ID, PREVIOUS_ID,
    REFRESH_ID, STATS_ID,
};

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    guilds::META,
    utility::ping::META,
    utility::uptime::META,
    utility::help::META,
    // Add new commands here
];

#[derive(Clone, Copy)]
enum InteractionRoute {
    Listing(ListEvent),
    LeaveRequest(u64),
    Invite(u64),
    Confirmation(ConfirmEvent),
}

fn route_interaction(custom_id: &str) -> Option<InteractionRoute> {
    match custom_id {
        PREVIOUS_ID => return Some(InteractionRoute::Listing(ListEvent::Previous)),
        NEXT_ID => return Some(InteractionRoute::Listing(ListEvent::Next)),
        STATS_ID => return Some(InteractionRoute::Listing(ListEvent::Stats)),
        REFRESH_ID => return Some(InteractionRoute::Listing(ListEvent::Refresh)),
        CONFIRM_LEAVE_ID => return Some(InteractionRoute::Confirmation(ConfirmEvent::Confirm)),
        CANCEL_LEAVE_ID => return Some(InteractionRoute::Confirmation(ConfirmEvent::Cancel)),
        _ => {}
    }

    if let Some(guild_id) = parse_custom_id_suffix(custom_id, LEAVE_PREFIX) {
        return Some(InteractionRoute::LeaveRequest(guild_id));
    }
    if let Some(guild_id) = parse_custom_id_suffix(custom_id, INVITE_PREFIX) {
        return Some(InteractionRoute::Invite(guild_id));
    }

    None
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let content_owned = msg.content.clone();
    let content = content_owned.trim();

    if !content.starts_with(COMMAND_PREFIX) {
        return Ok(());
    }

    let content = content.trim_start_matches(COMMAND_PREFIX).trim();
    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    let rest = command_and_rest
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let (arg1, arg_tail): (Option<String>, Option<String>) = match rest {
        Some(value) => {
            let mut args = value.splitn(2, char::is_whitespace);
            let first = args
                .next()
                .filter(|arg| !arg.is_empty())
                .map(ToOwned::to_owned);
            let tail = args
                .next()
                .map(str::trim)
                .filter(|remaining| !remaining.is_empty())
                .map(ToOwned::to_owned);

            (first, tail)
        }
        None => (None, None),
    };

    let arg1 = arg1.as_deref();
    let arg_tail = arg_tail.as_deref();

    match cmd.as_str() {
        "guilds" => guilds::run(ctx.clone(), msg, arg1, arg_tail).await?,
        "ping" => utility::ping::run(ctx.clone(), msg).await?,
        "uptime" => utility::uptime::run(ctx.clone(), msg).await?,
        "help" => utility::help::run(ctx.clone(), msg).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let Some(InteractionData::MessageComponent(data)) = interaction.data.as_ref() else {
        return Ok(());
    };
    let custom_id = data.custom_id.clone();

    let Some(route) = route_interaction(&custom_id) else {
        return Ok(());
    };

    let handled = match route {
        InteractionRoute::Listing(event) => {
            guilds::listing::handle_component(ctx.clone(), &interaction, event).await
        }
        InteractionRoute::LeaveRequest(guild_id) => {
            guilds::confirm::handle_leave_request(ctx.clone(), &interaction, guild_id).await
        }
        InteractionRoute::Invite(guild_id) => {
            guilds::detail::handle_invite(ctx.clone(), &interaction, guild_id).await
        }
        InteractionRoute::Confirmation(event) => {
            guilds::confirm::handle_confirmation(ctx.clone(), &interaction, event).await
        }
    };

    // A handler failure must not leave a perceived dead button: log it and
    // acknowledge without surfacing an error; the session stays as it was.
    if let Err(source) = handled {
        error!(?source, custom_id = %custom_id, "interaction handler failed");
        if let Err(ack_source) = defer_component_update(&ctx.http, &interaction).await {
            debug!(?ack_source, "late acknowledgment failed (already answered?)");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_every_fixed_control_id() {
        assert!(matches!(
            route_interaction("guild_previous"),
            Some(InteractionRoute::Listing(ListEvent::Previous))
        ));
        assert!(matches!(
            route_interaction("guild_next"),
            Some(InteractionRoute::Listing(ListEvent::Next))
        ));
        assert!(matches!(
            route_interaction("guild_stats"),
            Some(InteractionRoute::Listing(ListEvent::Stats))
        ));
        assert!(matches!(
            route_interaction("guild_refresh"),
            Some(InteractionRoute::Listing(ListEvent::Refresh))
        ));
        assert!(matches!(
            route_interaction("confirm_leave"),
            Some(InteractionRoute::Confirmation(ConfirmEvent::Confirm))
        ));
        assert!(matches!(
            route_interaction("cancel_leave"),
            Some(InteractionRoute::Confirmation(ConfirmEvent::Cancel))
        ));
    }

    #[test]
    fn routes_suffixed_control_ids_to_their_guild() {
        assert!(matches!(
            route_interaction("leave_guild_42"),
            Some(InteractionRoute::LeaveRequest(42))
        ));
        assert!(matches!(
            route_interaction("guild_invite_42"),
            Some(InteractionRoute::Invite(42))
        ));
    }

    #[test]
    fn unknown_custom_ids_are_not_routed() {
        assert!(route_interaction("guild_unknown").is_none());
        assert!(route_interaction("leave_guild_abc").is_none());
        assert!(route_interaction("").is_none());
    }
}
