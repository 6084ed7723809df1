//! Statistics aggregation over the guild collection.

use twilight_model::gateway::payload::incoming::MessageCreate;

use steward_core::Context;

use super::snapshot::{GuildRecord, fetch_guild_collection};
use super::view;

/// Guild counts per member-count bucket.
///
/// Buckets are half-open and exhaustive: tiny `[0, 50)`, small `[50, 250)`,
/// medium `[250, 1000)`, large `[1000, ∞)`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SizeDistribution {
    pub tiny: usize,
    pub small: usize,
    pub medium: usize,
    pub large: usize,
}

/// Derived statistics over a guild collection.
///
/// Always recomputed from the current collection, never cached across
/// sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsSnapshot {
    pub total_guilds: usize,
    pub total_members: u64,
    pub average_members: u64,
    pub largest: GuildRecord,
    pub smallest: GuildRecord,
    pub size_distribution: SizeDistribution,
}

/// Aggregate a statistics snapshot, or `None` for an empty collection.
///
/// Tie-breaks are deterministic: the largest keeps the first guild seen at
/// the extreme count, the smallest keeps the last. With the collection
/// sorted by member count descending both extremes are therefore stable
/// across repeated calls on identical input.
pub fn aggregate(guilds: &[GuildRecord]) -> Option<StatsSnapshot> {
    let first = guilds.first()?;

    let mut total_members = 0_u64;
    let mut largest = first;
    let mut smallest = first;
    let mut size_distribution = SizeDistribution::default();

    for guild in guilds {
        total_members = total_members.saturating_add(guild.member_count);

        if guild.member_count > largest.member_count {
            largest = guild;
        }
        if guild.member_count <= smallest.member_count {
            smallest = guild;
        }

        match guild.member_count {
            0..=49 => size_distribution.tiny += 1,
            50..=249 => size_distribution.small += 1,
            250..=999 => size_distribution.medium += 1,
            _ => size_distribution.large += 1,
        }
    }

    let average_members = ((total_members as f64) / (guilds.len() as f64)).round() as u64;

    Some(StatsSnapshot {
        total_guilds: guilds.len(),
        total_members,
        average_members,
        largest: largest.clone(),
        smallest: smallest.clone(),
        size_distribution,
    })
}

/// Run the `guilds stats` subcommand.
pub async fn run_stats(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let guilds = fetch_guild_collection(http).await?;

    let Some(snapshot) = aggregate(&guilds) else {
        http.create_message(msg.channel_id)
            .content("I am not in any guilds.")
            .await?;
        return Ok(());
    };

    let embed = view::build_stats_embed(&snapshot)?;
    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guilds::snapshot::test_record;

    fn fixture() -> Vec<GuildRecord> {
        vec![
            test_record(1, "alpha", 1000),
            test_record(2, "beta", 1000),
            test_record(3, "gamma", 10),
        ]
    }

    #[test]
    fn empty_collection_yields_no_snapshot() {
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn aggregation_is_deterministic() {
        let guilds = fixture();
        assert_eq!(aggregate(&guilds), aggregate(&guilds));
    }

    #[test]
    fn largest_tie_break_keeps_first_smallest_keeps_last() {
        let guilds = fixture();
        let snapshot = aggregate(&guilds).expect("non-empty collection");

        assert_eq!(snapshot.largest.id, 1);
        assert_eq!(snapshot.smallest.id, 3);

        let all_tied = vec![
            test_record(7, "one", 500),
            test_record(8, "two", 500),
            test_record(9, "three", 500),
        ];
        let snapshot = aggregate(&all_tied).expect("non-empty collection");
        assert_eq!(snapshot.largest.id, 7);
        assert_eq!(snapshot.smallest.id, 9);
    }

    #[test]
    fn totals_average_and_distribution() {
        let snapshot = aggregate(&fixture()).expect("non-empty collection");

        assert_eq!(snapshot.total_guilds, 3);
        assert_eq!(snapshot.total_members, 2010);
        assert_eq!(snapshot.average_members, 670);
        assert_eq!(
            snapshot.size_distribution,
            SizeDistribution {
                tiny: 1,
                small: 0,
                medium: 0,
                large: 2,
            }
        );
    }

    #[test]
    fn average_rounds_to_nearest() {
        let guilds = vec![test_record(1, "a", 1), test_record(2, "b", 2)];
        // 1.5 rounds away from zero.
        assert_eq!(aggregate(&guilds).expect("non-empty").average_members, 2);

        let guilds = vec![
            test_record(1, "a", 1),
            test_record(2, "b", 1),
            test_record(3, "c", 2),
        ];
        // 4/3 rounds down.
        assert_eq!(aggregate(&guilds).expect("non-empty").average_members, 1);
    }

    #[test]
    fn buckets_are_half_open_and_exhaustive() {
        let guilds = vec![
            test_record(1, "a", 0),
            test_record(2, "b", 49),
            test_record(3, "c", 50),
            test_record(4, "d", 249),
            test_record(5, "e", 250),
            test_record(6, "f", 999),
            test_record(7, "g", 1000),
            test_record(8, "h", 250_000),
        ];

        let snapshot = aggregate(&guilds).expect("non-empty collection");
        let distribution = snapshot.size_distribution;

        assert_eq!(distribution.tiny, 2);
        assert_eq!(distribution.small, 2);
        assert_eq!(distribution.medium, 2);
        assert_eq!(distribution.large, 2);
        assert_eq!(
            distribution.tiny + distribution.small + distribution.medium + distribution.large,
            guilds.len()
        );
    }
}
