//! Activity vocabulary, typed metadata, and description templates.
//!
//! The activity-type tags are a persisted vocabulary: renaming a variant's
//! serialized form breaks every stored `activity_logs` row. Each tag carries
//! its own fixed metadata shape through [`ActivityDetails`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::expiry::EXPIRY_LOOKAHEAD_DAYS;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Entity kinds and subject references
// ---------------------------------------------------------------------------

/// Kinds of tracked business objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Vendor,
    Contract,
    Document,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Vendor, EntityKind::Contract, EntityKind::Document];

    /// The stable lowercase tag (`"vendor"`, `"contract"`, `"document"`).
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Vendor => "vendor",
            EntityKind::Contract => "contract",
            EntityKind::Document => "document",
        }
    }

    /// Capitalized noun used at the start of descriptions.
    pub fn title(self) -> &'static str {
        match self {
            EntityKind::Vendor => "Vendor",
            EntityKind::Contract => "Contract",
            EntityKind::Document => "Document",
        }
    }

    /// Display name used when a subject reference no longer resolves.
    pub fn placeholder_name(self) -> &'static str {
        match self {
            EntityKind::Vendor => "Unknown Vendor",
            EntityKind::Contract => "Unknown Contract",
            EntityKind::Document => "Unknown Document",
        }
    }

    /// Parse a user-supplied entity tag.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim() {
            "vendor" => Ok(EntityKind::Vendor),
            "contract" => Ok(EntityKind::Contract),
            "document" => Ok(EntityKind::Document),
            other => Err(CoreError::validation(format!("Unknown entity kind '{other}'"))),
        }
    }
}

/// A weak, lookup-only reference to an entity.
///
/// The target may have been deleted since the reference was written; readers
/// resolve it through a fallible lookup and fall back to
/// [`EntityKind::placeholder_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectRef {
    pub kind: EntityKind,
    pub id: DbId,
}

impl SubjectRef {
    pub fn vendor(id: DbId) -> Self {
        Self { kind: EntityKind::Vendor, id }
    }

    pub fn contract(id: DbId) -> Self {
        Self { kind: EntityKind::Contract, id }
    }

    pub fn document(id: DbId) -> Self {
        Self { kind: EntityKind::Document, id }
    }
}

// ---------------------------------------------------------------------------
// Activity types
// ---------------------------------------------------------------------------

/// Stable tag set persisted in `activity_logs.activity_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    EntityCreated,
    EntityUpdated,
    EntityDeleted,
    EntityRated,
    DocumentUploaded,
    DocumentDeleted,
    ContractExpiring,
    UserSignedIn,
}

impl ActivityType {
    pub const ALL: [ActivityType; 8] = [
        ActivityType::EntityCreated,
        ActivityType::EntityUpdated,
        ActivityType::EntityDeleted,
        ActivityType::EntityRated,
        ActivityType::DocumentUploaded,
        ActivityType::DocumentDeleted,
        ActivityType::ContractExpiring,
        ActivityType::UserSignedIn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::EntityCreated => "entity_created",
            ActivityType::EntityUpdated => "entity_updated",
            ActivityType::EntityDeleted => "entity_deleted",
            ActivityType::EntityRated => "entity_rated",
            ActivityType::DocumentUploaded => "document_uploaded",
            ActivityType::DocumentDeleted => "document_deleted",
            ActivityType::ContractExpiring => "contract_expiring",
            ActivityType::UserSignedIn => "user_signed_in",
        }
    }

    /// Parse a stored or user-supplied tag. Unknown tags are a validation error.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| CoreError::validation(format!("Unknown activity type '{value}'")))
    }

    /// Pure user activities are the only ones allowed without a subject.
    pub fn is_user_activity(self) -> bool {
        matches!(self, ActivityType::UserSignedIn)
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Typed metadata
// ---------------------------------------------------------------------------

/// One changed field captured from an update's before/after state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl FieldChange {
    /// Build a change record if `before` and `after` differ.
    pub fn between<T>(field: &str, before: Option<&T>, after: Option<&T>) -> Option<Self>
    where
        T: ToString + PartialEq + ?Sized,
    {
        if before == after {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            from: before.map(ToString::to_string),
            to: after.map(ToString::to_string),
        })
    }
}

/// Activity payload: the tag plus its tag-specific metadata.
///
/// Serialized adjacently tagged, so the JSON form is
/// `{"activity_type": "...", "metadata": {...}}`, which maps one-to-one onto
/// the two storage columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "activity_type", content = "metadata", rename_all = "snake_case")]
pub enum ActivityDetails {
    EntityCreated {
        entity: EntityKind,
        name: String,
    },
    EntityUpdated {
        entity: EntityKind,
        name: String,
        changes: Vec<FieldChange>,
    },
    EntityDeleted {
        entity: EntityKind,
        name: String,
    },
    EntityRated {
        name: String,
        rating: f64,
        previous_rating: Option<f64>,
    },
    DocumentUploaded {
        file_name: String,
        file_size: i64,
        content_type: String,
    },
    DocumentDeleted {
        file_name: String,
    },
    ContractExpiring {
        title: String,
        days_to_expiry: i64,
    },
    UserSignedIn {},
}

impl ActivityDetails {
    pub fn activity_type(&self) -> ActivityType {
        match self {
            ActivityDetails::EntityCreated { .. } => ActivityType::EntityCreated,
            ActivityDetails::EntityUpdated { .. } => ActivityType::EntityUpdated,
            ActivityDetails::EntityDeleted { .. } => ActivityType::EntityDeleted,
            ActivityDetails::EntityRated { .. } => ActivityType::EntityRated,
            ActivityDetails::DocumentUploaded { .. } => ActivityType::DocumentUploaded,
            ActivityDetails::DocumentDeleted { .. } => ActivityType::DocumentDeleted,
            ActivityDetails::ContractExpiring { .. } => ActivityType::ContractExpiring,
            ActivityDetails::UserSignedIn {} => ActivityType::UserSignedIn,
        }
    }

    /// Split into the `(activity_type, metadata)` column pair.
    pub fn to_columns(&self) -> Result<(ActivityType, serde_json::Value), CoreError> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| CoreError::Internal(format!("Failed to encode activity metadata: {e}")))?;
        let metadata = value
            .get_mut("metadata")
            .map(serde_json::Value::take)
            .unwrap_or_else(|| serde_json::json!({}));
        Ok((self.activity_type(), metadata))
    }

    /// Rebuild from the `(activity_type, metadata)` column pair.
    pub fn from_columns(activity_type: &str, metadata: serde_json::Value) -> Result<Self, CoreError> {
        // Reject unknown tags with a clear message before serde sees them.
        ActivityType::parse(activity_type)?;
        serde_json::from_value(serde_json::json!({
            "activity_type": activity_type,
            "metadata": metadata,
        }))
        .map_err(|e| {
            CoreError::validation(format!("Malformed metadata for '{activity_type}': {e}"))
        })
    }

    /// Human-readable summary, computed once at write time.
    pub fn describe(&self) -> String {
        match self {
            ActivityDetails::EntityCreated { entity, name } => {
                format!("New {} added: {name}", entity.as_str())
            }
            ActivityDetails::EntityUpdated { entity, name, changes } => {
                if changes.is_empty() {
                    format!("{} {name} updated", entity.title())
                } else {
                    let summary: Vec<String> = changes.iter().map(describe_change).collect();
                    format!("{} {name} updated: {}", entity.title(), summary.join(", "))
                }
            }
            ActivityDetails::EntityDeleted { entity, name } => {
                format!("{} {name} deleted", entity.title())
            }
            ActivityDetails::EntityRated { name, rating, previous_rating } => match previous_rating {
                Some(prev) => format!("{name} rated {rating:.1}/5 (previously {prev:.1})"),
                None => format!("{name} rated {rating:.1}/5"),
            },
            ActivityDetails::DocumentUploaded { file_name, file_size, .. } => {
                format!("Document uploaded: {file_name} ({})", format_file_size(*file_size))
            }
            ActivityDetails::DocumentDeleted { file_name } => {
                format!("Document deleted: {file_name}")
            }
            ActivityDetails::ContractExpiring { title, days_to_expiry } => {
                let unit = if *days_to_expiry == 1 { "day" } else { "days" };
                format!("Contract {title} expires in {days_to_expiry} {unit}")
            }
            ActivityDetails::UserSignedIn {} => "User signed in".to_string(),
        }
    }
}

fn describe_change(change: &FieldChange) -> String {
    let from = change.from.as_deref().unwrap_or("(none)");
    let to = change.to.as_deref().unwrap_or("(none)");
    format!("{} {from} → {to}", change.field)
}

/// Format a byte count with binary units, one decimal place above bytes.
pub fn format_file_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a recording request before it reaches the store.
pub fn validate_new_activity(
    details: &ActivityDetails,
    subjects: &[SubjectRef],
) -> Result<(), CoreError> {
    let activity_type = details.activity_type();

    if subjects.is_empty() && !activity_type.is_user_activity() {
        return Err(CoreError::validation(format!(
            "Activity '{activity_type}' requires at least one subject reference"
        )));
    }

    if let Some(bad) = subjects.iter().find(|s| s.id <= 0) {
        return Err(CoreError::validation(format!(
            "Invalid {} id {}",
            bad.kind.as_str(),
            bad.id
        )));
    }

    match details {
        ActivityDetails::EntityRated { rating, .. } if !(0.0..=5.0).contains(rating) => Err(
            CoreError::validation(format!("Rating must be between 0 and 5, got {rating}")),
        ),
        ActivityDetails::DocumentUploaded { file_size, .. } if *file_size < 0 => {
            Err(CoreError::validation("File size must not be negative"))
        }
        ActivityDetails::ContractExpiring { days_to_expiry, .. }
            if !(1..=EXPIRY_LOOKAHEAD_DAYS).contains(days_to_expiry) =>
        {
            Err(CoreError::validation(format!(
                "days_to_expiry must be within 1..={EXPIRY_LOOKAHEAD_DAYS}, got {days_to_expiry}"
            )))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
