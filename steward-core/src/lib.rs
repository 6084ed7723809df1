use std::sync::Arc;
use std::time::Instant;

use twilight_http::Client;

use steward_database::Database;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub db: Database,
    /// Process start time, used by the uptime command.
    pub started_at: Instant,
}

impl Context {
    /// Create a new application context.
    pub fn new(http: Arc<Client>, db: Database) -> Self {
        Self {
            http,
            db,
            started_at: Instant::now(),
        }
    }
}
