//! Brand API handlers.
//!
//! Same contract as segments: token-guarded shared reference data with
//! cascade deletion of dependent vehicles.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::BrandPersistenceError;
use crate::domain::{Brand, BrandDraft, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{BrandSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_catalog_validation_error, missing_field_error};

/// Write payload for creating, replacing, or patching a brand.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BrandWrite {
    pub brand_name: Option<String>,
}

/// Map brand-store failures onto the domain error envelope.
fn map_persistence_error(error: BrandPersistenceError) -> Error {
    match error {
        BrandPersistenceError::Connection { message } => Error::service_unavailable(message),
        BrandPersistenceError::Query { message } => Error::internal(message),
    }
}

fn draft_from_write(write: BrandWrite) -> ApiResult<BrandDraft> {
    let name = write
        .brand_name
        .ok_or_else(|| missing_field_error("brand_name"))?;
    BrandDraft::new(name).map_err(map_catalog_validation_error)
}

fn brand_not_found() -> Error {
    Error::not_found("brand not found")
}

/// List all brands ordered by identifier.
#[utoipa::path(
    get,
    path = "/api/brands/",
    responses(
        (status = 200, description = "Brands", body = [BrandSchema]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["brands"],
    operation_id = "listBrands"
)]
#[get("/brands/")]
pub async fn list_brands(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Brand>>> {
    let brands = state.brands.list().await.map_err(map_persistence_error)?;
    Ok(web::Json(brands))
}

/// Create a brand.
#[utoipa::path(
    post,
    path = "/api/brands/",
    request_body = BrandWrite,
    responses(
        (status = 201, description = "Brand created", body = BrandSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["brands"],
    operation_id = "createBrand"
)]
#[post("/brands/")]
pub async fn create_brand(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    payload: web::Json<BrandWrite>,
) -> ApiResult<HttpResponse> {
    let draft = draft_from_write(payload.into_inner())?;
    let brand = state
        .brands
        .insert(&draft)
        .await
        .map_err(map_persistence_error)?;
    Ok(HttpResponse::Created().json(brand))
}

/// Fetch one brand by identifier.
#[utoipa::path(
    get,
    path = "/api/brands/{id}/",
    params(("id" = i32, Path, description = "Brand identifier")),
    responses(
        (status = 200, description = "Brand", body = BrandSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["brands"],
    operation_id = "getBrand"
)]
#[get("/brands/{id}/")]
pub async fn get_brand(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Brand>> {
    let id = path.into_inner();
    let brand = state
        .brands
        .find(id)
        .await
        .map_err(map_persistence_error)?
        .ok_or_else(brand_not_found)?;
    Ok(web::Json(brand))
}

/// Replace a brand.
#[utoipa::path(
    put,
    path = "/api/brands/{id}/",
    params(("id" = i32, Path, description = "Brand identifier")),
    request_body = BrandWrite,
    responses(
        (status = 200, description = "Brand replaced", body = BrandSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["brands"],
    operation_id = "replaceBrand"
)]
#[put("/brands/{id}/")]
pub async fn replace_brand(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<BrandWrite>,
) -> ApiResult<web::Json<Brand>> {
    let id = path.into_inner();
    let draft = draft_from_write(payload.into_inner())?;
    let brand = state
        .brands
        .update(id, &draft)
        .await
        .map_err(map_persistence_error)?
        .ok_or_else(brand_not_found)?;
    Ok(web::Json(brand))
}

/// Partially update a brand; an empty payload returns the current row.
#[utoipa::path(
    patch,
    path = "/api/brands/{id}/",
    params(("id" = i32, Path, description = "Brand identifier")),
    request_body = BrandWrite,
    responses(
        (status = 200, description = "Brand updated", body = BrandSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["brands"],
    operation_id = "patchBrand"
)]
#[patch("/brands/{id}/")]
pub async fn patch_brand(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<BrandWrite>,
) -> ApiResult<web::Json<Brand>> {
    let id = path.into_inner();
    let brand = match payload.into_inner().brand_name {
        Some(name) => {
            let draft = BrandDraft::new(name).map_err(map_catalog_validation_error)?;
            state
                .brands
                .update(id, &draft)
                .await
                .map_err(map_persistence_error)?
        }
        None => state.brands.find(id).await.map_err(map_persistence_error)?,
    }
    .ok_or_else(brand_not_found)?;
    Ok(web::Json(brand))
}

/// Delete a brand and every vehicle referencing it, atomically.
#[utoipa::path(
    delete,
    path = "/api/brands/{id}/",
    params(("id" = i32, Path, description = "Brand identifier")),
    responses(
        (status = 204, description = "Brand and dependent vehicles removed"),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["brands"],
    operation_id = "deleteBrand"
)]
#[delete("/brands/{id}/")]
pub async fn delete_brand(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let deleted = state
        .brands
        .delete(id)
        .await
        .map_err(map_persistence_error)?;
    if !deleted {
        return Err(brand_not_found());
    }
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Handler coverage against the in-memory port implementations.
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{
        create_brand, create_segment, create_vehicle, obtain_token_for, test_app,
    };

    #[actix_web::test]
    async fn create_fetch_round_trip() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;
        let id = create_brand(&app, &token, "Tesla").await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/brands/{id}/"))
            .insert_header(("Authorization", format!("Token {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("brand_name").and_then(Value::as_str), Some("Tesla"));
    }

    #[actix_web::test]
    async fn create_rejects_blank_name() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/brands/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({ "brand_name": "" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn patch_replaces_only_the_provided_name() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;
        let id = create_brand(&app, &token, "Tesla").await;

        let request = actix_test::TestRequest::patch()
            .uri(&format!("/api/brands/{id}/"))
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({ "brand_name": "Toyota" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("brand_name").and_then(Value::as_str), Some("Toyota"));
        assert_eq!(body.get("id").and_then(Value::as_i64), Some(i64::from(id)));
    }

    #[actix_web::test]
    async fn delete_cascades_to_dependent_vehicles() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;
        let segment = create_segment(&app, &token, "Sedan").await;
        let tesla = create_brand(&app, &token, "Tesla").await;
        let toyota = create_brand(&app, &token, "Toyota").await;
        let _ = create_vehicle(&app, &token, "MODEL S", segment, tesla).await;
        let survivor = create_vehicle(&app, &token, "COROLLA", segment, toyota).await;

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/api/brands/{tesla}/"))
            .insert_header(("Authorization", format!("Token {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = actix_test::TestRequest::get()
            .uri("/api/vehicles/")
            .insert_header(("Authorization", format!("Token {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body: Value = actix_test::read_body_json(response).await;
        let rows = body.as_array().expect("vehicle list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id").and_then(Value::as_i64), Some(i64::from(survivor)));
    }
}
