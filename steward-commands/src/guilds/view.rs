//! Embeds and button rows for the guild-management views.

use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};
use twilight_model::channel::message::embed::Embed;

use steward_utils::embed::{build_basic_embed, build_page_embed};

use super::session::{ListSession, PAGE_SIZE};
use super::snapshot::GuildRecord;
use super::stats::StatsSnapshot;

/// Component IDs routed by the interaction handler.
pub const PREVIOUS_ID: &str = "guild_previous";
pub const NEXT_ID: &str = "guild_next";
pub const STATS_ID: &str = "guild_stats";
pub const REFRESH_ID: &str = "guild_refresh";
pub const LEAVE_PREFIX: &str = "leave_guild_";
pub const INVITE_PREFIX: &str = "guild_invite_";
pub const CONFIRM_LEAVE_ID: &str = "confirm_leave";
pub const CANCEL_LEAVE_ID: &str = "cancel_leave";

fn button(custom_id: String, label: &str, style: ButtonStyle, disabled: bool) -> Component {
    Component::Button(Button {
        custom_id: Some(custom_id),
        disabled,
        emoji: None,
        label: Some(label.to_owned()),
        style,
        url: None,
        sku_id: None,
    })
}

fn action_row(components: Vec<Component>) -> Vec<Component> {
    vec![Component::ActionRow(ActionRow {
        components,
    })]
}

/// Navigation controls for the listing view.
///
/// Previous/Next are disabled at their boundaries; everything is disabled
/// once the session expires. An empty collection renders no controls at all.
pub fn build_list_components(
    current_page: usize,
    total_pages: usize,
    expired: bool,
) -> Vec<Component> {
    if total_pages == 0 {
        return Vec::new();
    }

    let last_page = total_pages.saturating_sub(1);
    action_row(vec![
        button(
            PREVIOUS_ID.to_owned(),
            "◀ Prev",
            ButtonStyle::Secondary,
            expired || current_page == 0,
        ),
        button(
            NEXT_ID.to_owned(),
            "Next ▶",
            ButtonStyle::Secondary,
            expired || current_page >= last_page,
        ),
        button(
            STATS_ID.to_owned(),
            "Statistics",
            ButtonStyle::Primary,
            expired,
        ),
        button(
            REFRESH_ID.to_owned(),
            "Refresh",
            ButtonStyle::Secondary,
            expired,
        ),
    ])
}

/// Action controls for the detail view.
pub fn build_detail_components(guild_id: u64, expired: bool) -> Vec<Component> {
    action_row(vec![
        button(
            format!("{LEAVE_PREFIX}{guild_id}"),
            "Leave Guild",
            ButtonStyle::Danger,
            expired,
        ),
        button(
            format!("{INVITE_PREFIX}{guild_id}"),
            "Create Invite",
            ButtonStyle::Secondary,
            expired,
        ),
    ])
}

/// Confirm/cancel pair for the leave-confirmation sub-flow.
pub fn build_confirmation_components() -> Vec<Component> {
    action_row(vec![
        button(
            CONFIRM_LEAVE_ID.to_owned(),
            "Confirm",
            ButtonStyle::Danger,
            false,
        ),
        button(
            CANCEL_LEAVE_ID.to_owned(),
            "Cancel",
            ButtonStyle::Secondary,
            false,
        ),
    ])
}

/// Render the current page of the listing session.
pub fn build_list_embed(session: &ListSession) -> anyhow::Result<Embed> {
    if session.guilds.is_empty() {
        return build_basic_embed("Guilds", "I am not in any guilds.");
    }

    let offset = session.current_page * PAGE_SIZE;
    let mut description = String::new();
    for (index, guild) in session.page_items().iter().enumerate() {
        description.push_str(&format!(
            "**{}.** {} — {} members (`{}`)\n",
            offset + index + 1,
            sanitize_name(&guild.name),
            guild.member_count,
            guild.id
        ));
    }

    let note = format!("{} guilds", session.guilds.len());
    build_page_embed(
        "Guilds",
        description,
        session.current_page,
        session.total_pages(),
        Some(&note),
    )
}

/// Render a single guild's detail view.
pub fn build_detail_embed(guild: &GuildRecord) -> anyhow::Result<Embed> {
    let mut description = format!(
        "Members: **{}**\nOwner: <@{}>\nCreated: <t:{}:D>\n",
        guild.member_count, guild.owner_id, guild.created_at
    );
    if let Some(joined_at) = guild.joined_at {
        description.push_str(&format!("Joined: <t:{joined_at}:R>\n"));
    }
    description.push_str(&format!("ID: `{}`", guild.id));

    build_basic_embed(&sanitize_name(&guild.name), description)
}

/// Render the leave-confirmation prompt for a guild.
pub fn build_confirmation_embed(guild: &GuildRecord) -> anyhow::Result<Embed> {
    let description = format!(
        "Leave **{}** ({} members)?\nThis cannot be undone without a new invite.",
        sanitize_name(&guild.name),
        guild.member_count
    );

    build_basic_embed("Confirm Leave", description)
}

/// Render a statistics snapshot.
pub fn build_stats_embed(snapshot: &StatsSnapshot) -> anyhow::Result<Embed> {
    let distribution = snapshot.size_distribution;
    let description = format!(
        "Guilds: **{}**\nTotal members: **{}**\nAverage members: **{}**\n\
         Largest: {} ({} members)\nSmallest: {} ({} members)\n\n\
         Tiny (<50): {}\nSmall (50-249): {}\nMedium (250-999): {}\nLarge (1000+): {}",
        snapshot.total_guilds,
        snapshot.total_members,
        snapshot.average_members,
        sanitize_name(&snapshot.largest.name),
        snapshot.largest.member_count,
        sanitize_name(&snapshot.smallest.name),
        snapshot.smallest.member_count,
        distribution.tiny,
        distribution.small,
        distribution.medium,
        distribution.large,
    );

    build_basic_embed("Guild Statistics", description)
}

fn sanitize_name(name: &str) -> String {
    name.replace('@', "@\u{200B}")
}
