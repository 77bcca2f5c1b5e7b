//! Handlers for the `/documents` resource.
//!
//! File bytes are stored elsewhere; these endpoints register and remove the
//! metadata row and record the corresponding activity.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use vendorhub_activity::NewActivity;
use vendorhub_core::activity::{ActivityDetails, SubjectRef};
use vendorhub_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use vendorhub_core::types::DbId;
use vendorhub_db::models::document::{CreateDocument, Document};
use vendorhub_db::repositories::DocumentRepo;

use super::not_found;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::VendorScopedParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn subjects_of(document: &Document) -> Vec<SubjectRef> {
    let mut subjects = vec![SubjectRef::document(document.id)];
    subjects.extend(document.vendor_id.map(SubjectRef::vendor));
    subjects.extend(document.contract_id.map(SubjectRef::contract));
    subjects
}

/// POST /api/v1/documents
pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<DataResponse<Document>>)> {
    input.validate()?;
    let document = DocumentRepo::create(&state.pool, &input, Some(user.user_id)).await?;
    tracing::info!(
        document_id = document.id,
        file_size = document.file_size,
        "Document registered"
    );

    state
        .recorder
        .record_best_effort(NewActivity::new(
            ActivityDetails::DocumentUploaded {
                file_name: document.file_name.clone(),
                file_size: document.file_size,
                content_type: document.content_type.clone(),
            },
            subjects_of(&document),
            Some(user.user_id),
        ))
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/documents
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<VendorScopedParams>,
) -> AppResult<Json<DataResponse<Vec<Document>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let documents = DocumentRepo::list(&state.pool, params.vendor_id, limit, offset).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// GET /api/v1/documents/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Document>>> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Document", id))?;
    Ok(Json(DataResponse { data: document }))
}

/// DELETE /api/v1/documents/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let document = DocumentRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Document", id))?;
    tracing::info!(document_id = id, "Document deleted");

    let subjects = subjects_of(&document);
    state
        .recorder
        .record_best_effort(NewActivity::new(
            ActivityDetails::DocumentDeleted {
                file_name: document.file_name,
            },
            subjects,
            Some(user.user_id),
        ))
        .await;

    Ok(StatusCode::NO_CONTENT)
}
