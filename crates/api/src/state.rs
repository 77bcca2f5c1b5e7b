use std::sync::Arc;

use vendorhub_activity::{ActivityRecorder, FeedComposer, Reporter};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and services are handles over shared data.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vendorhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Appends audit log entries for tracked mutations.
    pub recorder: ActivityRecorder,
    /// Builds the dashboard activity feed.
    pub feed: FeedComposer,
    /// Dashboard rollups.
    pub reporter: Reporter,
}

impl AppState {
    /// Wire the activity services to `pool` using the timeouts in `config`.
    pub fn new(pool: vendorhub_db::DbPool, config: ServerConfig) -> Self {
        let store_timeout = config.store_timeout();
        let feed = FeedComposer::for_pool(pool.clone(), config.feed_settings());
        Self {
            recorder: ActivityRecorder::new(pool.clone(), store_timeout),
            reporter: Reporter::new(pool.clone(), store_timeout),
            feed,
            pool,
            config: Arc::new(config),
        }
    }
}
