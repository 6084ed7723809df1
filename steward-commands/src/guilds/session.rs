//! Session state machines for the guild-management views.
//!
//! Each rendered message owns exactly one [`GuildSession`], tracked in a
//! process-wide registry keyed by message ID. Transitions are plain
//! `(state, event) -> effect` functions so they are testable without a live
//! event stream; the interaction handlers interpret the returned effects.

use std::sync::{Arc, OnceLock};

use steward_utils::pagination::{clamp_page, page_slice, total_pages};
use steward_utils::sessions::SessionRegistry;
use steward_utils::time::now_unix_secs;

use super::snapshot::GuildRecord;

/// Guilds shown per listing page.
pub const PAGE_SIZE: usize = 10;
/// Inactivity window for a listing session.
pub const LIST_TIMEOUT_SECS: u64 = 600;
/// Inactivity window for a detail session.
pub const DETAIL_TIMEOUT_SECS: u64 = 300;
/// Window for a leave-confirmation sub-session.
pub const CONFIRM_TIMEOUT_SECS: u64 = 30;

/// Mutable state of one paginated listing session.
#[derive(Debug)]
pub struct ListSession {
    pub invoker_id: u64,
    pub channel_id: u64,
    /// Collection snapshot, member-count descending. Fixed for the session
    /// lifetime except through [`ListSession::reset_with`].
    pub guilds: Vec<GuildRecord>,
    pub current_page: usize,
    pub created_at: u64,
    pub expires_at: u64,
}

impl ListSession {
    pub fn new(invoker_id: u64, channel_id: u64, guilds: Vec<GuildRecord>) -> Self {
        let created_at = now_unix_secs();
        Self {
            invoker_id,
            channel_id,
            guilds,
            current_page: 0,
            created_at,
            expires_at: created_at + LIST_TIMEOUT_SECS,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.guilds.len(), PAGE_SIZE)
    }

    /// Records on the current page.
    pub fn page_items(&self) -> &[GuildRecord] {
        page_slice(&self.guilds, self.current_page, PAGE_SIZE)
    }

    /// Replace the collection after a refresh; pagination restarts at page 0.
    pub fn reset_with(&mut self, guilds: Vec<GuildRecord>) {
        self.guilds = guilds;
        self.current_page = 0;
    }

    fn touch(&mut self) {
        self.expires_at = now_unix_secs() + LIST_TIMEOUT_SECS;
    }
}

/// Interaction events a listing session accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListEvent {
    Previous,
    Next,
    Refresh,
    Stats,
}

/// Effect a listing transition asks its caller to perform.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListEffect {
    /// Re-render the current page in place.
    Rerender,
    /// Re-fetch the collection, then re-render page 0.
    Refetch,
    /// Render an ephemeral statistics view; the page view stays untouched.
    ShowStats,
}

/// Apply one authorized interaction event to a listing session.
///
/// Boundary presses leave the page index unchanged: the button is disabled
/// at the boundary, but a late or raced event must never move the state out
/// of range.
pub fn apply_list_event(session: &mut ListSession, event: ListEvent) -> ListEffect {
    match event {
        ListEvent::Next => {
            session.current_page = clamp_page(session.current_page + 1, session.total_pages());
            session.touch();
            ListEffect::Rerender
        }
        ListEvent::Previous => {
            session.current_page = session.current_page.saturating_sub(1);
            session.touch();
            ListEffect::Rerender
        }
        ListEvent::Refresh => {
            session.touch();
            ListEffect::Refetch
        }
        ListEvent::Stats => {
            session.touch();
            ListEffect::ShowStats
        }
    }
}

/// Mutable state of one guild detail session.
#[derive(Debug)]
pub struct DetailSession {
    pub invoker_id: u64,
    pub channel_id: u64,
    pub guild: GuildRecord,
    pub created_at: u64,
    pub expires_at: u64,
}

impl DetailSession {
    pub fn new(invoker_id: u64, channel_id: u64, guild: GuildRecord) -> Self {
        let created_at = now_unix_secs();
        Self {
            invoker_id,
            channel_id,
            guild,
            created_at,
            expires_at: created_at + DETAIL_TIMEOUT_SECS,
        }
    }
}

/// Two-state confirmation sub-session guarding the irreversible leave.
#[derive(Debug)]
pub struct ConfirmationSession {
    pub invoker_id: u64,
    pub channel_id: u64,
    pub guild: GuildRecord,
    pub created_at: u64,
    pub expires_at: u64,
    pub resolved: bool,
}

impl ConfirmationSession {
    pub fn new(invoker_id: u64, channel_id: u64, guild: GuildRecord) -> Self {
        let created_at = now_unix_secs();
        Self {
            invoker_id,
            channel_id,
            guild,
            created_at,
            expires_at: created_at + CONFIRM_TIMEOUT_SECS,
            resolved: false,
        }
    }
}

/// Interaction events a confirmation sub-session accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfirmEvent {
    Confirm,
    Cancel,
}

/// Effect of applying a confirmation event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfirmEffect {
    /// Execute the leave action. Emitted at most once per session.
    ExecuteLeave,
    /// Resolve with a cancelled notice; no external action.
    Cancelled,
    /// The event arrived after resolution; drop it.
    Stale,
}

/// Apply one authorized event to a confirmation sub-session.
///
/// Resolution is one-way: the first event wins and every later one is
/// reported stale, which is what bounds the irreversible action to a single
/// execution even when a duplicate press was already in flight.
pub fn apply_confirm_event(session: &mut ConfirmationSession, event: ConfirmEvent) -> ConfirmEffect {
    if session.resolved {
        return ConfirmEffect::Stale;
    }
    session.resolved = true;

    match event {
        ConfirmEvent::Confirm => ConfirmEffect::ExecuteLeave,
        ConfirmEvent::Cancel => ConfirmEffect::Cancelled,
    }
}

/// One live guild-management session, keyed by its rendered message.
#[derive(Debug)]
pub enum GuildSession {
    List(ListSession),
    Detail(DetailSession),
    Confirming(ConfirmationSession),
}

impl GuildSession {
    pub fn invoker_id(&self) -> u64 {
        match self {
            Self::List(session) => session.invoker_id,
            Self::Detail(session) => session.invoker_id,
            Self::Confirming(session) => session.invoker_id,
        }
    }

    pub fn channel_id(&self) -> u64 {
        match self {
            Self::List(session) => session.channel_id,
            Self::Detail(session) => session.channel_id,
            Self::Confirming(session) => session.channel_id,
        }
    }
}

/// Process-wide registry of live guild-management sessions.
pub fn sessions() -> &'static Arc<SessionRegistry<GuildSession>> {
    static SESSIONS: OnceLock<Arc<SessionRegistry<GuildSession>>> = OnceLock::new();
    SESSIONS.get_or_init(|| Arc::new(SessionRegistry::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guilds::snapshot::test_record;

    fn list_session(guild_count: usize) -> ListSession {
        let guilds = (0..guild_count)
            .map(|index| test_record(index as u64 + 1, "guild", 100))
            .collect();
        ListSession::new(10, 20, guilds)
    }

    #[test]
    fn next_stops_at_the_last_page() {
        let mut session = list_session(25);
        assert_eq!(session.total_pages(), 3);

        for _ in 0..10 {
            assert_eq!(apply_list_event(&mut session, ListEvent::Next), ListEffect::Rerender);
        }
        assert_eq!(session.current_page, 2);
    }

    #[test]
    fn previous_stops_at_page_zero() {
        let mut session = list_session(25);
        session.current_page = 2;

        for _ in 0..10 {
            assert_eq!(
                apply_list_event(&mut session, ListEvent::Previous),
                ListEffect::Rerender
            );
        }
        assert_eq!(session.current_page, 0);
    }

    #[test]
    fn single_page_collection_never_moves() {
        let mut session = list_session(5);
        assert_eq!(session.total_pages(), 1);

        apply_list_event(&mut session, ListEvent::Next);
        apply_list_event(&mut session, ListEvent::Previous);
        assert_eq!(session.current_page, 0);
    }

    #[test]
    fn refresh_resets_to_page_zero_from_any_page() {
        let mut session = list_session(25);
        session.current_page = 2;

        assert_eq!(
            apply_list_event(&mut session, ListEvent::Refresh),
            ListEffect::Refetch
        );
        session.reset_with(vec![test_record(99, "fresh", 7)]);

        assert_eq!(session.current_page, 0);
        assert_eq!(session.guilds.len(), 1);
        assert_eq!(session.total_pages(), 1);
    }

    #[test]
    fn stats_leaves_pagination_state_untouched() {
        let mut session = list_session(25);
        session.current_page = 1;

        assert_eq!(
            apply_list_event(&mut session, ListEvent::Stats),
            ListEffect::ShowStats
        );
        assert_eq!(session.current_page, 1);
        assert_eq!(session.guilds.len(), 25);
    }

    #[test]
    fn page_items_tracks_the_current_page() {
        let mut session = list_session(25);
        assert_eq!(session.page_items().len(), 10);

        session.current_page = 2;
        assert_eq!(session.page_items().len(), 5);
    }

    #[test]
    fn confirm_executes_the_leave_exactly_once() {
        let mut session = ConfirmationSession::new(10, 20, test_record(1, "guild", 100));

        assert_eq!(
            apply_confirm_event(&mut session, ConfirmEvent::Confirm),
            ConfirmEffect::ExecuteLeave
        );
        assert!(session.resolved);

        // A duplicate press that was already in flight resolves stale.
        assert_eq!(
            apply_confirm_event(&mut session, ConfirmEvent::Confirm),
            ConfirmEffect::Stale
        );
        assert_eq!(
            apply_confirm_event(&mut session, ConfirmEvent::Cancel),
            ConfirmEffect::Stale
        );
    }

    #[test]
    fn cancel_resolves_without_executing() {
        let mut session = ConfirmationSession::new(10, 20, test_record(1, "guild", 100));

        assert_eq!(
            apply_confirm_event(&mut session, ConfirmEvent::Cancel),
            ConfirmEffect::Cancelled
        );
        assert!(session.resolved);
        assert_eq!(
            apply_confirm_event(&mut session, ConfirmEvent::Confirm),
            ConfirmEffect::Stale
        );
    }
}
