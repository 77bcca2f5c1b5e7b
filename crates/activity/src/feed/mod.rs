//! Activity feed composition.
//!
//! A [`FeedComposer`] fans out to every [`FeedSource`] concurrently, each
//! call bounded by the store timeout. Failed sources are logged and skipped;
//! the surviving batches are merged newest first, names are resolved through
//! one batched [`NameResolver`] call per entity kind, and the result is
//! formatted with relative-time labels.

pub mod resolver;
pub mod sources;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use vendorhub_core::activity::EntityKind;
use vendorhub_core::feed::{
    finish, merge_newest_first, sample_feed, suppress_covered_inferred, FeedCandidate, FeedItem,
    NameLookup, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT,
};
use vendorhub_core::pagination::validate_limit;
use vendorhub_core::types::{DbId, Timestamp};
use vendorhub_db::DbPool;

use crate::bounded::bounded;
use crate::error::{FeedError, FetchError};

pub use resolver::PgNameResolver;
pub use sources::{
    AuditLogSource, ContractCreatedSource, ContractExpirySource, DocumentUploadedSource,
    VendorCreatedSource,
};

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// One independent contributor to the feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Up to `limit` candidates, newest first, none older than `since`.
    async fn fetch(
        &self,
        limit: i64,
        since: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<Vec<FeedCandidate>, FetchError>;
}

/// Batched id → display name lookup for one entity kind.
///
/// Ids without a row are left out of the result.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(
        &self,
        kind: EntityKind,
        ids: &[DbId],
    ) -> Result<Vec<(DbId, String)>, FetchError>;
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Tunables for [`FeedComposer`].
#[derive(Debug, Clone, Copy)]
pub struct FeedSettings {
    /// Upper bound on every source fetch and name lookup.
    pub store_timeout: Duration,
    /// Serve a labelled sample feed when every source fails.
    pub sample_fallback: bool,
}

/// Builds the dashboard activity feed. Holds no per-request state.
#[derive(Clone)]
pub struct FeedComposer {
    sources: Vec<Arc<dyn FeedSource>>,
    resolver: Arc<dyn NameResolver>,
    settings: FeedSettings,
}

impl FeedComposer {
    pub fn new(
        sources: Vec<Arc<dyn FeedSource>>,
        resolver: Arc<dyn NameResolver>,
        settings: FeedSettings,
    ) -> Self {
        Self {
            sources,
            resolver,
            settings,
        }
    }

    /// The production source set: audit log, inferred creations and uploads,
    /// and synthesized expiry warnings.
    pub fn for_pool(pool: DbPool, settings: FeedSettings) -> Self {
        let sources: Vec<Arc<dyn FeedSource>> = vec![
            Arc::new(AuditLogSource::new(pool.clone())),
            Arc::new(VendorCreatedSource::new(pool.clone())),
            Arc::new(ContractCreatedSource::new(pool.clone())),
            Arc::new(DocumentUploadedSource::new(pool.clone())),
            Arc::new(ContractExpirySource::new(pool.clone())),
        ];
        Self::new(sources, Arc::new(PgNameResolver::new(pool)), settings)
    }

    /// Compose the feed as of now.
    pub async fn compose(
        &self,
        limit: Option<i64>,
        since: Option<Timestamp>,
    ) -> Result<Vec<FeedItem>, FeedError> {
        self.compose_at(limit, since, Utc::now()).await
    }

    /// Compose the feed as of `now`.
    pub async fn compose_at(
        &self,
        limit: Option<i64>,
        since: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<Vec<FeedItem>, FeedError> {
        let limit = validate_limit(limit, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT)?;

        let fetches = self.sources.iter().map(|source| async move {
            let result = bounded(
                self.settings.store_timeout,
                source.fetch(limit as i64, since, now),
                FetchError::Timeout,
            )
            .await;
            (source.name(), result)
        });

        let mut batches = Vec::with_capacity(self.sources.len());
        let mut failed = 0usize;
        for (name, result) in join_all(fetches).await {
            match result {
                Ok(batch) => batches.push(batch),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(source = name, error = %e, "Feed source failed, skipping");
                }
            }
        }

        if batches.is_empty() && failed > 0 {
            if self.settings.sample_fallback {
                tracing::warn!(failed, "Every feed source failed, serving sample feed");
                return Ok(sample_feed(now));
            }
            return Err(FeedError::AllSourcesFailed { failed });
        }

        suppress_covered_inferred(&mut batches);
        let merged = merge_newest_first(batches, since, limit);
        let lookup = self.resolve_names(&merged).await;
        Ok(finish(merged, &lookup, now))
    }

    /// One batched lookup per entity kind with unresolved references.
    ///
    /// A failed lookup leaves that kind's names to the placeholder.
    async fn resolve_names(&self, candidates: &[FeedCandidate]) -> NameLookup {
        let mut lookup = NameLookup::from_candidates(candidates);
        let missing = lookup.missing(candidates);

        let lookups = missing.into_iter().map(|(kind, ids)| async move {
            let result = bounded(
                self.settings.store_timeout,
                self.resolver.resolve(kind, &ids),
                FetchError::Timeout,
            )
            .await;
            (kind, result)
        });

        for (kind, result) in join_all(lookups).await {
            match result {
                Ok(names) => lookup.extend(kind, names),
                Err(e) => tracing::warn!(
                    kind = kind.as_str(),
                    error = %e,
                    "Name lookup failed, using placeholders"
                ),
            }
        }
        lookup
    }
}
