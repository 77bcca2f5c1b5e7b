//! Postgres-backed feed sources.
//!
//! Each source turns rows of one table into [`FeedCandidate`]s. The row
//! mapping is kept in plain functions so it can be tested without a store.

use async_trait::async_trait;
use chrono::Duration;
use vendorhub_core::activity::{ActivityDetails, EntityKind, SubjectRef};
use vendorhub_core::expiry::{days_to_expiry, end_of_contract, EXPIRY_LOOKAHEAD_DAYS};
use vendorhub_core::feed::{CandidateSubject, FeedCandidate, FeedOrigin};
use vendorhub_core::types::Timestamp;
use vendorhub_db::models::activity::{ActivityLogEntry, ActivityLogRow};
use vendorhub_db::models::contract::Contract;
use vendorhub_db::models::document::Document;
use vendorhub_db::models::vendor::Vendor;
use vendorhub_db::repositories::{ActivityLogRepo, ContractRepo, DocumentRepo, VendorRepo};
use vendorhub_db::DbPool;

use super::FeedSource;
use crate::error::FetchError;

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

/// Explicit `activity_logs` rows.
pub struct AuditLogSource {
    pool: DbPool,
}

impl AuditLogSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedSource for AuditLogSource {
    fn name(&self) -> &'static str {
        "audit_log"
    }

    async fn fetch(
        &self,
        limit: i64,
        since: Option<Timestamp>,
        _now: Timestamp,
    ) -> Result<Vec<FeedCandidate>, FetchError> {
        let rows = ActivityLogRepo::list_recent(&self.pool, limit, since).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match logged_candidate(row) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable activity log row");
                    None
                }
            })
            .collect())
    }
}

/// Map one log row. Fails when the stored tag or metadata no longer decodes.
pub fn logged_candidate(row: ActivityLogRow) -> Result<FeedCandidate, FetchError> {
    let id = row.id;
    let entry = ActivityLogEntry::try_from(row)
        .map_err(|e| FetchError::Decode(format!("activity log row {id}: {e}")))?;
    Ok(FeedCandidate {
        key: format!("log:{}", entry.id),
        subjects: entry
            .subjects
            .iter()
            .copied()
            .map(CandidateSubject::unresolved)
            .collect(),
        details: entry.details,
        description: entry.description,
        actor_id: entry.actor_id,
        occurred_at: entry.created_at,
        origin: FeedOrigin::Logged,
    })
}

// ---------------------------------------------------------------------------
// Inferred from entity timestamps
// ---------------------------------------------------------------------------

/// Vendor creations inferred from `vendors.created_at`.
pub struct VendorCreatedSource {
    pool: DbPool,
}

impl VendorCreatedSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedSource for VendorCreatedSource {
    fn name(&self) -> &'static str {
        "vendors"
    }

    async fn fetch(
        &self,
        limit: i64,
        since: Option<Timestamp>,
        _now: Timestamp,
    ) -> Result<Vec<FeedCandidate>, FetchError> {
        let vendors = VendorRepo::list_recent(&self.pool, limit, since).await?;
        Ok(vendors.into_iter().map(vendor_candidate).collect())
    }
}

pub fn vendor_candidate(vendor: Vendor) -> FeedCandidate {
    let details = ActivityDetails::EntityCreated {
        entity: EntityKind::Vendor,
        name: vendor.name.clone(),
    };
    FeedCandidate {
        key: format!("vendor:{}", vendor.id),
        description: details.describe(),
        details,
        actor_id: None,
        occurred_at: vendor.created_at,
        subjects: vec![CandidateSubject::named(SubjectRef::vendor(vendor.id), vendor.name)],
        origin: FeedOrigin::Inferred,
    }
}

/// Contract creations inferred from `contracts.created_at`.
pub struct ContractCreatedSource {
    pool: DbPool,
}

impl ContractCreatedSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedSource for ContractCreatedSource {
    fn name(&self) -> &'static str {
        "contracts"
    }

    async fn fetch(
        &self,
        limit: i64,
        since: Option<Timestamp>,
        _now: Timestamp,
    ) -> Result<Vec<FeedCandidate>, FetchError> {
        let contracts = ContractRepo::list_recent(&self.pool, limit, since).await?;
        Ok(contracts.into_iter().map(contract_candidate).collect())
    }
}

pub fn contract_candidate(contract: Contract) -> FeedCandidate {
    let details = ActivityDetails::EntityCreated {
        entity: EntityKind::Contract,
        name: contract.title.clone(),
    };
    FeedCandidate {
        key: format!("contract:{}", contract.id),
        description: details.describe(),
        details,
        actor_id: None,
        occurred_at: contract.created_at,
        subjects: contract_subjects(&contract),
        origin: FeedOrigin::Inferred,
    }
}

/// Document uploads inferred from `documents.created_at`.
pub struct DocumentUploadedSource {
    pool: DbPool,
}

impl DocumentUploadedSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedSource for DocumentUploadedSource {
    fn name(&self) -> &'static str {
        "documents"
    }

    async fn fetch(
        &self,
        limit: i64,
        since: Option<Timestamp>,
        _now: Timestamp,
    ) -> Result<Vec<FeedCandidate>, FetchError> {
        let documents = DocumentRepo::list_recent(&self.pool, limit, since).await?;
        Ok(documents.into_iter().map(document_candidate).collect())
    }
}

pub fn document_candidate(document: Document) -> FeedCandidate {
    let mut subjects = vec![CandidateSubject::named(
        SubjectRef::document(document.id),
        document.file_name.clone(),
    )];
    subjects.extend(
        document
            .vendor_id
            .map(|id| CandidateSubject::unresolved(SubjectRef::vendor(id))),
    );
    subjects.extend(
        document
            .contract_id
            .map(|id| CandidateSubject::unresolved(SubjectRef::contract(id))),
    );

    let details = ActivityDetails::DocumentUploaded {
        file_name: document.file_name,
        file_size: document.file_size,
        content_type: document.content_type,
    };
    FeedCandidate {
        key: format!("document:{}", document.id),
        description: details.describe(),
        details,
        actor_id: document.uploaded_by,
        occurred_at: document.created_at,
        subjects,
        origin: FeedOrigin::Inferred,
    }
}

// ---------------------------------------------------------------------------
// Synthesized expiry warnings
// ---------------------------------------------------------------------------

/// Live `contract_expiring` items, recomputed on every call.
pub struct ContractExpirySource {
    pool: DbPool,
}

impl ContractExpirySource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedSource for ContractExpirySource {
    fn name(&self) -> &'static str {
        "contract_expiry"
    }

    async fn fetch(
        &self,
        limit: i64,
        _since: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<Vec<FeedCandidate>, FetchError> {
        let after = now.date_naive();
        let until = (now + Duration::days(EXPIRY_LOOKAHEAD_DAYS)).date_naive();
        let contracts = ContractRepo::list_ending_between(&self.pool, after, until, limit).await?;
        Ok(expiry_candidates(contracts, now))
    }
}

/// One candidate per contract still inside the lookahead window, soonest
/// expiry first.
///
/// A warning describes the store as of `now`, so it is stamped `now`. No
/// stored row postdates the read, so warnings lead the merged feed.
pub fn expiry_candidates(mut contracts: Vec<Contract>, now: Timestamp) -> Vec<FeedCandidate> {
    contracts.sort_by_key(|c| c.end_date);
    contracts
        .into_iter()
        .filter_map(|contract| {
            let end_at = end_of_contract(contract.end_date?);
            let days = days_to_expiry(end_at, now)?;
            let details = ActivityDetails::ContractExpiring {
                title: contract.title.clone(),
                days_to_expiry: days,
            };
            Some(FeedCandidate {
                key: format!("expiry:{}", contract.id),
                description: details.describe(),
                details,
                actor_id: None,
                occurred_at: now,
                subjects: contract_subjects(&contract),
                origin: FeedOrigin::Synthesized,
            })
        })
        .collect()
}

fn contract_subjects(contract: &Contract) -> Vec<CandidateSubject> {
    let mut subjects = vec![CandidateSubject::named(
        SubjectRef::contract(contract.id),
        contract.title.clone(),
    )];
    subjects.extend(
        contract
            .vendor_id
            .map(|id| CandidateSubject::unresolved(SubjectRef::vendor(id))),
    );
    subjects
}
