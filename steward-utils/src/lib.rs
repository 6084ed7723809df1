/// Generic embed builders shared across commands.
pub mod embed;
/// Ownership gate for interactive sessions.
pub mod gate;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Pure pagination math.
pub mod pagination;
/// Pure parser helpers.
pub mod parse;
/// Operator permission helpers.
pub mod permissions;
/// Shared interaction response helpers.
pub mod respond;
/// Session table and expiry timer management.
pub mod sessions;
/// Shared time helpers.
pub mod time;
