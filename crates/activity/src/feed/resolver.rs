//! Batched subject-name lookups against Postgres.

use async_trait::async_trait;
use vendorhub_core::activity::EntityKind;
use vendorhub_core::types::DbId;
use vendorhub_db::repositories::{ContractRepo, DocumentRepo, VendorRepo};
use vendorhub_db::DbPool;

use super::NameResolver;
use crate::error::FetchError;

/// Resolves vendor names, contract titles, and document file names.
pub struct PgNameResolver {
    pool: DbPool,
}

impl PgNameResolver {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NameResolver for PgNameResolver {
    async fn resolve(
        &self,
        kind: EntityKind,
        ids: &[DbId],
    ) -> Result<Vec<(DbId, String)>, FetchError> {
        let rows = match kind {
            EntityKind::Vendor => VendorRepo::find_names(&self.pool, ids).await?,
            EntityKind::Contract => ContractRepo::find_names(&self.pool, ids).await?,
            EntityKind::Document => DocumentRepo::find_names(&self.pool, ids).await?,
        };
        Ok(rows.into_iter().map(|row| (row.id, row.name)).collect())
    }
}
