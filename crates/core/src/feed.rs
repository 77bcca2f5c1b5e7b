//! Feed item types and the storage-free half of feed composition.
//!
//! Sources produce [`FeedCandidate`]s. The composer merges them with
//! [`merge_newest_first`], resolves subject names through a request-scoped
//! [`NameLookup`], and finishes them into [`FeedItem`]s with a relative-time
//! label.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::Duration;
use serde::Serialize;

use crate::activity::{ActivityDetails, ActivityType, EntityKind, SubjectRef};
use crate::relative_time::format_relative;
use crate::types::{DbId, Timestamp};

/// Default number of feed items per request.
pub const DEFAULT_FEED_LIMIT: i64 = 10;

/// Maximum number of feed items per request.
pub const MAX_FEED_LIMIT: i64 = 200;

/// Where a feed item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedOrigin {
    /// An explicit `activity_logs` row.
    Logged,
    /// Inferred from an entity's own timestamps.
    Inferred,
    /// Computed live, e.g. a contract nearing expiry.
    Synthesized,
    /// Fabricated placeholder shown when every source failed.
    Sample,
}

/// A subject reference plus the display name a source already knows, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSubject {
    pub reference: SubjectRef,
    pub name: Option<String>,
}

impl CandidateSubject {
    pub fn named(reference: SubjectRef, name: impl Into<String>) -> Self {
        Self { reference, name: Some(name.into()) }
    }

    pub fn unresolved(reference: SubjectRef) -> Self {
        Self { reference, name: None }
    }
}

/// One unformatted item produced by a feed source.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedCandidate {
    /// Stable identity across re-reads, e.g. `log:12` or `expiry:7`.
    pub key: String,
    pub details: ActivityDetails,
    pub description: String,
    pub actor_id: Option<DbId>,
    pub occurred_at: Timestamp,
    pub subjects: Vec<CandidateSubject>,
    pub origin: FeedOrigin,
}

/// A subject with its resolved (or placeholder) display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSubject {
    pub kind: EntityKind,
    pub id: DbId,
    pub name: String,
}

/// A finished feed item, ready for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub key: String,
    pub activity_type: ActivityType,
    pub description: String,
    pub actor_id: Option<DbId>,
    pub occurred_at: Timestamp,
    pub relative_time: String,
    pub subjects: Vec<ResolvedSubject>,
    pub details: ActivityDetails,
    pub origin: FeedOrigin,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge per-source batches into one newest-first sequence.
///
/// Batches are concatenated in the order given and stably sorted, so equal
/// timestamps keep source order and then per-source order. Items older than
/// `since` are dropped before truncating to `limit`, except synthesized
/// items, which describe the present and always pass the cutoff.
pub fn merge_newest_first(
    batches: Vec<Vec<FeedCandidate>>,
    since: Option<Timestamp>,
    limit: usize,
) -> Vec<FeedCandidate> {
    let mut merged: Vec<FeedCandidate> = batches
        .into_iter()
        .flatten()
        .filter(|c| {
            c.origin == FeedOrigin::Synthesized
                || since.is_none_or(|cutoff| c.occurred_at >= cutoff)
        })
        .collect();
    merged.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    merged.truncate(limit);
    merged
}

/// Drop inferred items already covered by an explicit log entry.
///
/// An inferred item is covered when a logged item has the same activity type
/// and the same primary (first) subject. Synthesized items are never dropped.
pub fn suppress_covered_inferred(batches: &mut [Vec<FeedCandidate>]) {
    let logged: HashSet<(ActivityType, SubjectRef)> = batches
        .iter()
        .flatten()
        .filter(|c| c.origin == FeedOrigin::Logged)
        .filter_map(|c| c.subjects.first().map(|s| (c.details.activity_type(), s.reference)))
        .collect();
    if logged.is_empty() {
        return;
    }
    for batch in batches.iter_mut() {
        batch.retain(|c| {
            c.origin != FeedOrigin::Inferred
                || !c
                    .subjects
                    .first()
                    .is_some_and(|s| logged.contains(&(c.details.activity_type(), s.reference)))
        });
    }
}

// ---------------------------------------------------------------------------
// Name lookup
// ---------------------------------------------------------------------------

/// Request-scoped id → display name map.
///
/// Built once per composition, never shared between requests.
#[derive(Debug, Default)]
pub struct NameLookup {
    names: HashMap<SubjectRef, String>,
}

impl NameLookup {
    /// Seed a lookup with every name the candidates already carry.
    pub fn from_candidates(candidates: &[FeedCandidate]) -> Self {
        let names = candidates
            .iter()
            .flat_map(|c| c.subjects.iter())
            .filter_map(|s| s.name.clone().map(|n| (s.reference, n)))
            .collect();
        Self { names }
    }

    /// Record the results of one batched lookup for `kind`.
    pub fn extend(&mut self, kind: EntityKind, resolved: impl IntoIterator<Item = (DbId, String)>) {
        for (id, name) in resolved {
            self.names.insert(SubjectRef { kind, id }, name);
        }
    }

    /// Distinct references still lacking a name, grouped by kind.
    pub fn missing(&self, candidates: &[FeedCandidate]) -> BTreeMap<EntityKind, Vec<DbId>> {
        let mut missing: BTreeMap<EntityKind, BTreeSet<DbId>> = BTreeMap::new();
        for subject in candidates.iter().flat_map(|c| c.subjects.iter()) {
            if !self.names.contains_key(&subject.reference) {
                missing
                    .entry(subject.reference.kind)
                    .or_default()
                    .insert(subject.reference.id);
            }
        }
        missing
            .into_iter()
            .map(|(kind, ids)| (kind, ids.into_iter().collect()))
            .collect()
    }

    /// Resolved name, or the kind's placeholder for a dangling reference.
    pub fn name_for(&self, reference: &SubjectRef) -> String {
        self.names
            .get(reference)
            .cloned()
            .unwrap_or_else(|| reference.kind.placeholder_name().to_string())
    }
}

/// Turn merged candidates into feed items.
pub fn finish(candidates: Vec<FeedCandidate>, lookup: &NameLookup, now: Timestamp) -> Vec<FeedItem> {
    candidates
        .into_iter()
        .map(|c| FeedItem {
            activity_type: c.details.activity_type(),
            relative_time: format_relative(c.occurred_at, now),
            subjects: c
                .subjects
                .iter()
                .map(|s| ResolvedSubject {
                    kind: s.reference.kind,
                    id: s.reference.id,
                    name: lookup.name_for(&s.reference),
                })
                .collect(),
            key: c.key,
            description: c.description,
            actor_id: c.actor_id,
            occurred_at: c.occurred_at,
            details: c.details,
            origin: c.origin,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sample fallback
// ---------------------------------------------------------------------------

/// Fixed, clearly-fabricated feed shown when every source failed.
///
/// Items carry [`FeedOrigin::Sample`] and a `sample:` key so clients can tell
/// them apart from real activity.
pub fn sample_feed(now: Timestamp) -> Vec<FeedItem> {
    let samples = [
        (
            Duration::hours(2),
            ActivityDetails::EntityCreated {
                entity: EntityKind::Vendor,
                name: "Sample Supplies Co.".into(),
            },
        ),
        (
            Duration::days(1),
            ActivityDetails::DocumentUploaded {
                file_name: "sample-agreement.pdf".into(),
                file_size: 248_000,
                content_type: "application/pdf".into(),
            },
        ),
        (
            Duration::days(3),
            ActivityDetails::EntityRated {
                name: "Sample Logistics Ltd".into(),
                rating: 4.5,
                previous_rating: None,
            },
        ),
    ];

    samples
        .into_iter()
        .enumerate()
        .map(|(i, (age, details))| {
            let occurred_at = now - age;
            FeedItem {
                key: format!("sample:{}", i + 1),
                activity_type: details.activity_type(),
                description: format!("[Sample] {}", details.describe()),
                actor_id: None,
                occurred_at,
                relative_time: format_relative(occurred_at, now),
                subjects: Vec::new(),
                details,
                origin: FeedOrigin::Sample,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn candidate(key: &str, mins_ago: i64, subjects: Vec<CandidateSubject>) -> FeedCandidate {
        let details = ActivityDetails::EntityCreated {
            entity: EntityKind::Vendor,
            name: key.to_string(),
        };
        FeedCandidate {
            key: key.to_string(),
            description: details.describe(),
            details,
            actor_id: None,
            occurred_at: now() - Duration::minutes(mins_ago),
            subjects,
            origin: FeedOrigin::Logged,
        }
    }

    fn keys(items: &[FeedCandidate]) -> Vec<&str> {
        items.iter().map(|c| c.key.as_str()).collect()
    }

    #[test]
    fn merge_sorts_newest_first_across_batches() {
        let merged = merge_newest_first(
            vec![
                vec![candidate("a", 10, vec![]), candidate("b", 50, vec![])],
                vec![candidate("c", 5, vec![]), candidate("d", 30, vec![])],
            ],
            None,
            10,
        );
        assert_eq!(keys(&merged), vec!["c", "a", "d", "b"]);
        for pair in merged.windows(2) {
            assert!(pair[0].occurred_at >= pair[1].occurred_at);
        }
    }

    #[test]
    fn merge_keeps_source_order_on_ties() {
        let merged = merge_newest_first(
            vec![vec![candidate("first", 5, vec![])], vec![candidate("second", 5, vec![])]],
            None,
            10,
        );
        assert_eq!(keys(&merged), vec!["first", "second"]);
    }

    #[test]
    fn merge_truncates_to_limit() {
        let merged = merge_newest_first(
            vec![(0..8).map(|i| candidate(&format!("k{i}"), i, vec![])).collect()],
            None,
            3,
        );
        assert_eq!(keys(&merged), vec!["k0", "k1", "k2"]);
    }

    #[test]
    fn merge_drops_items_before_cutoff() {
        let merged = merge_newest_first(
            vec![vec![candidate("new", 5, vec![]), candidate("old", 120, vec![])]],
            Some(now() - Duration::hours(1)),
            10,
        );
        assert_eq!(keys(&merged), vec!["new"]);
    }

    #[test]
    fn synthesized_items_ignore_cutoff() {
        let mut warning = candidate("expiry:1", 0, vec![]);
        warning.origin = FeedOrigin::Synthesized;
        let merged = merge_newest_first(
            vec![vec![candidate("old", 120, vec![])], vec![warning]],
            Some(now() + Duration::hours(1)),
            10,
        );
        assert_eq!(keys(&merged), vec!["expiry:1"]);
    }

    #[test]
    fn inferred_item_covered_by_log_is_dropped() {
        let logged = candidate("log:1", 5, vec![CandidateSubject::unresolved(SubjectRef::vendor(3))]);
        let mut inferred =
            candidate("vendor:3", 6, vec![CandidateSubject::named(SubjectRef::vendor(3), "Acme")]);
        inferred.origin = FeedOrigin::Inferred;
        let mut other =
            candidate("vendor:4", 7, vec![CandidateSubject::named(SubjectRef::vendor(4), "Beta")]);
        other.origin = FeedOrigin::Inferred;

        let mut batches = vec![vec![logged], vec![inferred, other]];
        suppress_covered_inferred(&mut batches);
        assert_eq!(keys(&batches[1]), vec!["vendor:4"]);
        assert_eq!(batches[0].len(), 1);
    }

    #[test]
    fn lookup_reports_distinct_missing_ids_per_kind() {
        let candidates = vec![
            candidate(
                "x",
                1,
                vec![
                    CandidateSubject::unresolved(SubjectRef::vendor(7)),
                    CandidateSubject::named(SubjectRef::document(3), "a.pdf"),
                ],
            ),
            candidate("y", 2, vec![CandidateSubject::unresolved(SubjectRef::vendor(7))]),
            candidate("z", 3, vec![CandidateSubject::unresolved(SubjectRef::contract(9))]),
        ];
        let lookup = NameLookup::from_candidates(&candidates);
        let missing = lookup.missing(&candidates);
        assert_eq!(missing.get(&EntityKind::Vendor), Some(&vec![7]));
        assert_eq!(missing.get(&EntityKind::Contract), Some(&vec![9]));
        assert!(!missing.contains_key(&EntityKind::Document));
    }

    #[test]
    fn dangling_reference_gets_placeholder() {
        let mut lookup = NameLookup::default();
        lookup.extend(EntityKind::Vendor, vec![(1, "Acme".to_string())]);
        assert_eq!(lookup.name_for(&SubjectRef::vendor(1)), "Acme");
        assert_eq!(lookup.name_for(&SubjectRef::vendor(2)), "Unknown Vendor");
        assert_eq!(lookup.name_for(&SubjectRef::contract(2)), "Unknown Contract");
    }

    #[test]
    fn finish_formats_relative_time_and_names() {
        let candidates = vec![candidate(
            "a",
            90,
            vec![CandidateSubject::unresolved(SubjectRef::vendor(4))],
        )];
        let items = finish(candidates, &NameLookup::default(), now());
        assert_eq!(items[0].relative_time, "1 hour ago");
        assert_eq!(items[0].subjects[0].name, "Unknown Vendor");
        assert_eq!(items[0].activity_type, ActivityType::EntityCreated);
    }

    #[test]
    fn sample_feed_is_flagged_and_ordered() {
        let items = sample_feed(now());
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.origin == FeedOrigin::Sample));
        assert!(items.iter().all(|i| i.description.starts_with("[Sample]")));
        for pair in items.windows(2) {
            assert!(pair[0].occurred_at >= pair[1].occurred_at);
        }
    }
}
