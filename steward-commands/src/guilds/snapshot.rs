//! Guild collection snapshots fetched from the chat client.

use tracing::error;
use twilight_http::Client;
use twilight_model::id::{Id, marker::GuildMarker};
use twilight_util::snowflake::Snowflake;

/// Immutable snapshot of one guild the bot is a member of.
///
/// Fetched from the external client and only ever read after that; a refresh
/// replaces the whole collection instead of mutating records.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GuildRecord {
    pub id: u64,
    pub name: String,
    pub member_count: u64,
    pub owner_id: u64,
    /// Guild creation time (unix seconds), derived from the guild snowflake.
    pub created_at: u64,
    /// When the bot joined the guild (unix seconds), when the client knows.
    pub joined_at: Option<i64>,
}

/// Fetch the current guild collection, sorted by member count descending.
///
/// Guilds that fail to hydrate are logged and skipped rather than failing
/// the whole snapshot.
pub async fn fetch_guild_collection(http: &Client) -> anyhow::Result<Vec<GuildRecord>> {
    let listed = http.current_user_guilds().await?.models().await?;

    let mut records = Vec::with_capacity(listed.len());
    for listed_guild in listed {
        match fetch_guild_record(http, listed_guild.id).await {
            Ok(record) => records.push(record),
            Err(source) => {
                error!(
                    ?source,
                    guild_id = listed_guild.id.get(),
                    "guild hydration failed, skipping"
                );
            }
        }
    }

    sort_by_member_count(&mut records);
    Ok(records)
}

/// Fetch a single guild snapshot with member counts.
pub async fn fetch_guild_record(
    http: &Client,
    guild_id: Id<GuildMarker>,
) -> anyhow::Result<GuildRecord> {
    let guild = http.guild(guild_id).with_counts(true).await?.model().await?;

    let member_count = guild
        .member_count
        .or(guild.approximate_member_count)
        .unwrap_or(0);

    Ok(GuildRecord {
        id: guild_id.get(),
        name: guild.name,
        member_count,
        owner_id: guild.owner_id.get(),
        created_at: (guild_id.timestamp().max(0) as u64) / 1000,
        joined_at: guild.joined_at.map(|timestamp| timestamp.as_secs()),
    })
}

/// Sort records by member count descending.
///
/// The sort is stable, so guilds sharing a member count keep their fetch
/// order; the statistics tie-breaks depend on that.
pub fn sort_by_member_count(records: &mut [GuildRecord]) {
    records.sort_by(|a, b| b.member_count.cmp(&a.member_count));
}

#[cfg(test)]
pub(crate) fn test_record(id: u64, name: &str, member_count: u64) -> GuildRecord {
    GuildRecord {
        id,
        name: name.to_owned(),
        member_count,
        owner_id: 1,
        created_at: 1_600_000_000,
        joined_at: Some(1_650_000_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_by_member_count_descending() {
        let mut records = vec![
            test_record(1, "small", 10),
            test_record(2, "large", 5000),
            test_record(3, "medium", 300),
        ];

        sort_by_member_count(&mut records);

        let ids: Vec<u64> = records.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn sort_keeps_fetch_order_for_equal_member_counts() {
        let mut records = vec![
            test_record(1, "tiny", 3),
            test_record(2, "first-big", 1000),
            test_record(3, "second-big", 1000),
        ];

        sort_by_member_count(&mut records);

        let ids: Vec<u64> = records.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
