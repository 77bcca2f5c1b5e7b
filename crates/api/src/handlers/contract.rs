//! Handlers for the `/contracts` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use vendorhub_activity::NewActivity;
use vendorhub_core::activity::{ActivityDetails, EntityKind, FieldChange, SubjectRef};
use vendorhub_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use vendorhub_core::types::DbId;
use vendorhub_db::models::contract::{Contract, CreateContract, UpdateContract};
use vendorhub_db::repositories::ContractRepo;

use super::not_found;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::VendorScopedParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Contract first, then its vendor when it has one.
fn subjects_of(contract: &Contract) -> Vec<SubjectRef> {
    let mut subjects = vec![SubjectRef::contract(contract.id)];
    subjects.extend(contract.vendor_id.map(SubjectRef::vendor));
    subjects
}

/// POST /api/v1/contracts
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateContract>,
) -> AppResult<(StatusCode, Json<DataResponse<Contract>>)> {
    input.validate()?;
    let contract = ContractRepo::create(&state.pool, &input).await?;
    tracing::info!(
        contract_id = contract.id,
        vendor_id = ?contract.vendor_id,
        "Contract created"
    );

    state
        .recorder
        .record_best_effort(NewActivity::new(
            ActivityDetails::EntityCreated {
                entity: EntityKind::Contract,
                name: contract.title.clone(),
            },
            subjects_of(&contract),
            Some(user.user_id),
        ))
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: contract })))
}

/// GET /api/v1/contracts
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<VendorScopedParams>,
) -> AppResult<Json<DataResponse<Vec<Contract>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let contracts = ContractRepo::list(&state.pool, params.vendor_id, limit, offset).await?;
    Ok(Json(DataResponse { data: contracts }))
}

/// GET /api/v1/contracts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Contract>>> {
    let contract = ContractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Contract", id))?;
    Ok(Json(DataResponse { data: contract }))
}

/// PUT /api/v1/contracts/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContract>,
) -> AppResult<Json<DataResponse<Contract>>> {
    input.validate()?;
    let before = ContractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Contract", id))?;
    let after = ContractRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Contract", id))?;

    let changes = contract_changes(&before, &after);
    tracing::info!(contract_id = id, changed = changes.len(), "Contract updated");

    state
        .recorder
        .record_best_effort(NewActivity::new(
            ActivityDetails::EntityUpdated {
                entity: EntityKind::Contract,
                name: after.title.clone(),
                changes,
            },
            subjects_of(&after),
            Some(user.user_id),
        ))
        .await;

    Ok(Json(DataResponse { data: after }))
}

/// DELETE /api/v1/contracts/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let contract = ContractRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Contract", id))?;
    tracing::info!(contract_id = id, "Contract deleted");

    let subjects = subjects_of(&contract);
    state
        .recorder
        .record_best_effort(NewActivity::new(
            ActivityDetails::EntityDeleted {
                entity: EntityKind::Contract,
                name: contract.title,
            },
            subjects,
            Some(user.user_id),
        ))
        .await;

    Ok(StatusCode::NO_CONTENT)
}

fn contract_changes(before: &Contract, after: &Contract) -> Vec<FieldChange> {
    [
        FieldChange::between("title", Some(before.title.as_str()), Some(after.title.as_str())),
        FieldChange::between("status", before.status.as_deref(), after.status.as_deref()),
        FieldChange::between("vendor_id", before.vendor_id.as_ref(), after.vendor_id.as_ref()),
        FieldChange::between(
            "value_minor",
            before.value_minor.as_ref(),
            after.value_minor.as_ref(),
        ),
        FieldChange::between("start_date", before.start_date.as_ref(), after.start_date.as_ref()),
        FieldChange::between("end_date", before.end_date.as_ref(), after.end_date.as_ref()),
    ]
    .into_iter()
    .flatten()
    .collect()
}
