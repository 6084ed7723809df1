//! Pure parser helpers.

/// Parse a raw guild ID argument.
pub fn parse_guild_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id != 0)
}

/// Extract the numeric suffix of a component custom ID such as
/// `leave_guild_<id>`.
pub fn parse_custom_id_suffix(custom_id: &str, prefix: &str) -> Option<u64> {
    custom_id
        .strip_prefix(prefix)?
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_raw_guild_ids() {
        assert_eq!(parse_guild_id("81384788765712384"), Some(81384788765712384));
        assert_eq!(parse_guild_id("  42 "), Some(42));
        assert_eq!(parse_guild_id("0"), None);
        assert_eq!(parse_guild_id("abc"), None);
        assert_eq!(parse_guild_id(""), None);
    }

    #[test]
    fn parses_custom_id_suffixes() {
        assert_eq!(
            parse_custom_id_suffix("leave_guild_123", "leave_guild_"),
            Some(123)
        );
        assert_eq!(
            parse_custom_id_suffix("guild_invite_987", "guild_invite_"),
            Some(987)
        );
        assert_eq!(parse_custom_id_suffix("leave_guild_", "leave_guild_"), None);
        assert_eq!(parse_custom_id_suffix("leave_guild_x", "leave_guild_"), None);
        assert_eq!(parse_custom_id_suffix("guild_next", "leave_guild_"), None);
    }
}
