//! Segment API handlers.
//!
//! Segments are shared reference data: every operation requires a valid
//! bearer token, and any authenticated caller may mutate any row.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::SegmentPersistenceError;
use crate::domain::{Error, Segment, SegmentDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, SegmentSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_catalog_validation_error, missing_field_error};

/// Write payload for creating, replacing, or patching a segment.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SegmentWrite {
    pub segment_name: Option<String>,
}

/// Map segment-store failures onto the domain error envelope.
fn map_persistence_error(error: SegmentPersistenceError) -> Error {
    match error {
        SegmentPersistenceError::Connection { message } => Error::service_unavailable(message),
        SegmentPersistenceError::Query { message } => Error::internal(message),
    }
}

fn draft_from_write(write: SegmentWrite) -> ApiResult<SegmentDraft> {
    let name = write
        .segment_name
        .ok_or_else(|| missing_field_error("segment_name"))?;
    SegmentDraft::new(name).map_err(map_catalog_validation_error)
}

fn segment_not_found() -> Error {
    Error::not_found("segment not found")
}

/// List all segments ordered by identifier.
#[utoipa::path(
    get,
    path = "/api/segments/",
    responses(
        (status = 200, description = "Segments", body = [SegmentSchema]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["segments"],
    operation_id = "listSegments"
)]
#[get("/segments/")]
pub async fn list_segments(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Segment>>> {
    let segments = state.segments.list().await.map_err(map_persistence_error)?;
    Ok(web::Json(segments))
}

/// Create a segment.
#[utoipa::path(
    post,
    path = "/api/segments/",
    request_body = SegmentWrite,
    responses(
        (status = 201, description = "Segment created", body = SegmentSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["segments"],
    operation_id = "createSegment"
)]
#[post("/segments/")]
pub async fn create_segment(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    payload: web::Json<SegmentWrite>,
) -> ApiResult<HttpResponse> {
    let draft = draft_from_write(payload.into_inner())?;
    let segment = state
        .segments
        .insert(&draft)
        .await
        .map_err(map_persistence_error)?;
    Ok(HttpResponse::Created().json(segment))
}

/// Fetch one segment by identifier.
#[utoipa::path(
    get,
    path = "/api/segments/{id}/",
    params(("id" = i32, Path, description = "Segment identifier")),
    responses(
        (status = 200, description = "Segment", body = SegmentSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["segments"],
    operation_id = "getSegment"
)]
#[get("/segments/{id}/")]
pub async fn get_segment(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Segment>> {
    let id = path.into_inner();
    let segment = state
        .segments
        .find(id)
        .await
        .map_err(map_persistence_error)?
        .ok_or_else(segment_not_found)?;
    Ok(web::Json(segment))
}

/// Replace a segment.
#[utoipa::path(
    put,
    path = "/api/segments/{id}/",
    params(("id" = i32, Path, description = "Segment identifier")),
    request_body = SegmentWrite,
    responses(
        (status = 200, description = "Segment replaced", body = SegmentSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["segments"],
    operation_id = "replaceSegment"
)]
#[put("/segments/{id}/")]
pub async fn replace_segment(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<SegmentWrite>,
) -> ApiResult<web::Json<Segment>> {
    let id = path.into_inner();
    let draft = draft_from_write(payload.into_inner())?;
    let segment = state
        .segments
        .update(id, &draft)
        .await
        .map_err(map_persistence_error)?
        .ok_or_else(segment_not_found)?;
    Ok(web::Json(segment))
}

/// Partially update a segment.
///
/// An absent `segment_name` keeps the stored value, so an empty payload is a
/// no-op that returns the current row.
#[utoipa::path(
    patch,
    path = "/api/segments/{id}/",
    params(("id" = i32, Path, description = "Segment identifier")),
    request_body = SegmentWrite,
    responses(
        (status = 200, description = "Segment updated", body = SegmentSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["segments"],
    operation_id = "patchSegment"
)]
#[patch("/segments/{id}/")]
pub async fn patch_segment(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<SegmentWrite>,
) -> ApiResult<web::Json<Segment>> {
    let id = path.into_inner();
    let segment = match payload.into_inner().segment_name {
        Some(name) => {
            let draft = SegmentDraft::new(name).map_err(map_catalog_validation_error)?;
            state
                .segments
                .update(id, &draft)
                .await
                .map_err(map_persistence_error)?
        }
        None => state.segments.find(id).await.map_err(map_persistence_error)?,
    }
    .ok_or_else(segment_not_found)?;
    Ok(web::Json(segment))
}

/// Delete a segment and every vehicle referencing it, atomically.
#[utoipa::path(
    delete,
    path = "/api/segments/{id}/",
    params(("id" = i32, Path, description = "Segment identifier")),
    responses(
        (status = 204, description = "Segment and dependent vehicles removed"),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["segments"],
    operation_id = "deleteSegment"
)]
#[delete("/segments/{id}/")]
pub async fn delete_segment(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let deleted = state
        .segments
        .delete(id)
        .await
        .map_err(map_persistence_error)?;
    if !deleted {
        return Err(segment_not_found());
    }
    Ok(HttpResponse::NoContent().finish())
}
