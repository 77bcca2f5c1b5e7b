//! Handlers for the `/vendors` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use vendorhub_activity::NewActivity;
use vendorhub_core::activity::{ActivityDetails, EntityKind, FieldChange, SubjectRef};
use vendorhub_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use vendorhub_core::types::DbId;
use vendorhub_db::models::vendor::{CreateVendor, RateVendor, UpdateVendor, Vendor};
use vendorhub_db::repositories::VendorRepo;

use super::not_found;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/vendors
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateVendor>,
) -> AppResult<(StatusCode, Json<DataResponse<Vendor>>)> {
    input.validate()?;
    let vendor = VendorRepo::create(&state.pool, &input).await?;
    tracing::info!(vendor_id = vendor.id, user_id = user.user_id, "Vendor created");

    state
        .recorder
        .record_best_effort(NewActivity::new(
            ActivityDetails::EntityCreated {
                entity: EntityKind::Vendor,
                name: vendor.name.clone(),
            },
            vec![SubjectRef::vendor(vendor.id)],
            Some(user.user_id),
        ))
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: vendor })))
}

/// GET /api/v1/vendors
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Vendor>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let vendors = VendorRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: vendors }))
}

/// GET /api/v1/vendors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vendor>>> {
    let vendor = VendorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Vendor", id))?;
    Ok(Json(DataResponse { data: vendor }))
}

/// PUT /api/v1/vendors/{id}
///
/// Records `entity_updated` with one [`FieldChange`] per field that changed.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVendor>,
) -> AppResult<Json<DataResponse<Vendor>>> {
    input.validate()?;
    let before = VendorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Vendor", id))?;
    let after = VendorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Vendor", id))?;

    let changes = vendor_changes(&before, &after);
    tracing::info!(vendor_id = id, changed = changes.len(), "Vendor updated");

    state
        .recorder
        .record_best_effort(NewActivity::new(
            ActivityDetails::EntityUpdated {
                entity: EntityKind::Vendor,
                name: after.name.clone(),
                changes,
            },
            vec![SubjectRef::vendor(id)],
            Some(user.user_id),
        ))
        .await;

    Ok(Json(DataResponse { data: after }))
}

/// POST /api/v1/vendors/{id}/rating
pub async fn rate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RateVendor>,
) -> AppResult<Json<DataResponse<Vendor>>> {
    input.validate()?;
    let previous_rating = VendorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Vendor", id))?
        .rating;
    let vendor = VendorRepo::set_rating(&state.pool, id, input.rating)
        .await?
        .ok_or_else(|| not_found("Vendor", id))?;
    tracing::info!(vendor_id = id, rating = input.rating, "Vendor rated");

    state
        .recorder
        .record_best_effort(NewActivity::new(
            ActivityDetails::EntityRated {
                name: vendor.name.clone(),
                rating: input.rating,
                previous_rating,
            },
            vec![SubjectRef::vendor(id)],
            Some(user.user_id),
        ))
        .await;

    Ok(Json(DataResponse { data: vendor }))
}

/// DELETE /api/v1/vendors/{id}
///
/// Contracts and documents of the vendor survive with `vendor_id` cleared;
/// older log entries that reference the vendor render with a placeholder.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let vendor = VendorRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Vendor", id))?;
    tracing::info!(vendor_id = id, "Vendor deleted");

    state
        .recorder
        .record_best_effort(NewActivity::new(
            ActivityDetails::EntityDeleted {
                entity: EntityKind::Vendor,
                name: vendor.name,
            },
            vec![SubjectRef::vendor(id)],
            Some(user.user_id),
        ))
        .await;

    Ok(StatusCode::NO_CONTENT)
}

fn vendor_changes(before: &Vendor, after: &Vendor) -> Vec<FieldChange> {
    [
        FieldChange::between("name", Some(before.name.as_str()), Some(after.name.as_str())),
        FieldChange::between("category", before.category.as_deref(), after.category.as_deref()),
        FieldChange::between("status", before.status.as_deref(), after.status.as_deref()),
        FieldChange::between(
            "performance_score",
            before.performance_score.as_ref(),
            after.performance_score.as_ref(),
        ),
        FieldChange::between(
            "contact_email",
            before.contact_email.as_deref(),
            after.contact_email.as_deref(),
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
