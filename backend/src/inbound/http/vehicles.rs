//! Vehicle API handlers.
//!
//! Reads carry the denormalized `segment_name`/`brand_name` display fields;
//! writes resolve the numeric references and inject the owning user from the
//! authenticated identity, never from the request body.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ports::VehiclePersistenceError;
use crate::domain::{Error, VehicleDraft, VehicleRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, VehicleSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldErrorCode, field_error, map_catalog_validation_error, missing_field_error, parse_price,
    parse_reference,
};

/// Write payload for creating, replacing, or patching a vehicle.
///
/// `price`, `segment`, and `brand` are raw JSON values so that form-style
/// string encodings and empty strings produce field-level errors instead of
/// opaque deserialization failures. The owning user is not accepted here.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct VehicleWrite {
    pub vehicle_name: Option<String>,
    pub release_year: Option<i32>,
    #[schema(value_type = Option<String>, example = "500.12")]
    pub price: Option<Value>,
    #[schema(value_type = Option<i32>)]
    pub segment: Option<Value>,
    #[schema(value_type = Option<i32>)]
    pub brand: Option<Value>,
}

/// Map vehicle-store failures onto the domain error envelope.
fn map_persistence_error(error: VehiclePersistenceError) -> Error {
    match error {
        VehiclePersistenceError::Connection { message } => Error::service_unavailable(message),
        VehiclePersistenceError::Query { message } => Error::internal(message),
        VehiclePersistenceError::SegmentNotFound => field_error(
            "segment",
            FieldErrorCode::Invalid,
            "referenced segment does not exist",
        ),
        VehiclePersistenceError::BrandNotFound => field_error(
            "brand",
            FieldErrorCode::Invalid,
            "referenced brand does not exist",
        ),
    }
}

fn draft_from_write(write: &VehicleWrite) -> ApiResult<VehicleDraft> {
    let name = write
        .vehicle_name
        .as_deref()
        .ok_or_else(|| missing_field_error("vehicle_name"))?;
    let release_year = write
        .release_year
        .ok_or_else(|| missing_field_error("release_year"))?;
    let price = parse_price(write.price.as_ref())?;
    let segment = parse_reference(write.segment.as_ref(), "segment")?;
    let brand = parse_reference(write.brand.as_ref(), "brand")?;
    VehicleDraft::new(name, release_year, price, segment, brand)
        .map_err(map_catalog_validation_error)
}

/// Merge a partial payload over an existing record, validating the result.
fn merged_draft(existing: &VehicleRecord, write: &VehicleWrite) -> ApiResult<VehicleDraft> {
    let name = write
        .vehicle_name
        .clone()
        .unwrap_or_else(|| existing.vehicle_name.clone());
    let release_year = write.release_year.unwrap_or(existing.release_year);
    let price = match write.price.as_ref() {
        Some(value) => parse_price(Some(value))?,
        None => existing.price.as_decimal().clone(),
    };
    let segment = match write.segment.as_ref() {
        Some(value) => parse_reference(Some(value), "segment")?,
        None => existing.segment,
    };
    let brand = match write.brand.as_ref() {
        Some(value) => parse_reference(Some(value), "brand")?,
        None => existing.brand,
    };
    VehicleDraft::new(&name, release_year, price, segment, brand)
        .map_err(map_catalog_validation_error)
}

fn vehicle_not_found() -> Error {
    Error::not_found("vehicle not found")
}

/// List all vehicles ordered by identifier.
#[utoipa::path(
    get,
    path = "/api/vehicles/",
    responses(
        (status = 200, description = "Vehicles", body = [VehicleSchema]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["vehicles"],
    operation_id = "listVehicles"
)]
#[get("/vehicles/")]
pub async fn list_vehicles(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<VehicleRecord>>> {
    let vehicles = state.vehicles.list().await.map_err(map_persistence_error)?;
    Ok(web::Json(vehicles))
}

/// Create a vehicle owned by the caller.
#[utoipa::path(
    post,
    path = "/api/vehicles/",
    request_body = VehicleWrite,
    responses(
        (status = 201, description = "Vehicle created", body = VehicleSchema),
        (status = 400, description = "Invalid payload or unresolvable reference", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["vehicles"],
    operation_id = "createVehicle"
)]
#[post("/vehicles/")]
pub async fn create_vehicle(
    state: web::Data<HttpState>,
    identity: AuthenticatedUser,
    payload: web::Json<VehicleWrite>,
) -> ApiResult<HttpResponse> {
    let draft = draft_from_write(&payload.into_inner())?;
    let record = state
        .vehicles
        .insert(identity.user_id(), &draft)
        .await
        .map_err(map_persistence_error)?;
    Ok(HttpResponse::Created().json(record))
}

/// Fetch one vehicle by identifier.
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/",
    params(("id" = i32, Path, description = "Vehicle identifier")),
    responses(
        (status = 200, description = "Vehicle", body = VehicleSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["vehicles"],
    operation_id = "getVehicle"
)]
#[get("/vehicles/{id}/")]
pub async fn get_vehicle(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<VehicleRecord>> {
    let id = path.into_inner();
    let record = state
        .vehicles
        .find(id)
        .await
        .map_err(map_persistence_error)?
        .ok_or_else(vehicle_not_found)?;
    Ok(web::Json(record))
}

/// Replace a vehicle.
///
/// Ownership is not re-checked against the caller: vehicles follow the same
/// shared-mutation semantics as segments and brands.
#[utoipa::path(
    put,
    path = "/api/vehicles/{id}/",
    params(("id" = i32, Path, description = "Vehicle identifier")),
    request_body = VehicleWrite,
    responses(
        (status = 200, description = "Vehicle replaced", body = VehicleSchema),
        (status = 400, description = "Invalid payload or unresolvable reference", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["vehicles"],
    operation_id = "replaceVehicle"
)]
#[put("/vehicles/{id}/")]
pub async fn replace_vehicle(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<VehicleWrite>,
) -> ApiResult<web::Json<VehicleRecord>> {
    let id = path.into_inner();
    let draft = draft_from_write(&payload.into_inner())?;
    let record = state
        .vehicles
        .update(id, &draft)
        .await
        .map_err(map_persistence_error)?
        .ok_or_else(vehicle_not_found)?;
    Ok(web::Json(record))
}

/// Partially update a vehicle; absent fields keep their stored values.
#[utoipa::path(
    patch,
    path = "/api/vehicles/{id}/",
    params(("id" = i32, Path, description = "Vehicle identifier")),
    request_body = VehicleWrite,
    responses(
        (status = 200, description = "Vehicle updated", body = VehicleSchema),
        (status = 400, description = "Invalid payload or unresolvable reference", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["vehicles"],
    operation_id = "patchVehicle"
)]
#[patch("/vehicles/{id}/")]
pub async fn patch_vehicle(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<VehicleWrite>,
) -> ApiResult<web::Json<VehicleRecord>> {
    let id = path.into_inner();
    let existing = state
        .vehicles
        .find(id)
        .await
        .map_err(map_persistence_error)?
        .ok_or_else(vehicle_not_found)?;
    let draft = merged_draft(&existing, &payload.into_inner())?;
    let record = state
        .vehicles
        .update(id, &draft)
        .await
        .map_err(map_persistence_error)?
        .ok_or_else(vehicle_not_found)?;
    Ok(web::Json(record))
}

/// Delete a vehicle.
#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}/",
    params(("id" = i32, Path, description = "Vehicle identifier")),
    responses(
        (status = 204, description = "Vehicle removed"),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unknown identifier", body = ErrorSchema)
    ),
    tags = ["vehicles"],
    operation_id = "deleteVehicle"
)]
#[delete("/vehicles/{id}/")]
pub async fn delete_vehicle(
    state: web::Data<HttpState>,
    _identity: AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let deleted = state
        .vehicles
        .delete(id)
        .await
        .map_err(map_persistence_error)?;
    if !deleted {
        return Err(vehicle_not_found());
    }
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Handler coverage against the in-memory port implementations.
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{
        create_brand, create_segment, obtain_token_for, test_app,
    };

    #[actix_web::test]
    async fn create_stores_price_and_denormalized_names() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;
        let segment = create_segment(&app, &token, "Sedan").await;
        let brand = create_brand(&app, &token, "Tesla").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/vehicles/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({
                "vehicle_name": "MODEL S",
                "release_year": 2019,
                "price": 500.12,
                "segment": segment,
                "brand": brand,
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("vehicle_name").and_then(Value::as_str), Some("MODEL S"));
        assert_eq!(body.get("release_year").and_then(Value::as_i64), Some(2019));
        assert_eq!(body.get("price").and_then(Value::as_str), Some("500.12"));
        assert!(body.get("user").is_none());

        let id = body.get("id").and_then(Value::as_i64).expect("vehicle id");
        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/vehicles/{id}/"))
            .insert_header(("Authorization", format!("Token {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("segment_name").and_then(Value::as_str), Some("Sedan"));
        assert_eq!(body.get("brand_name").and_then(Value::as_str), Some("Tesla"));
    }

    #[rstest]
    #[case(json!(""), json!(""))]
    #[case(json!(null), json!(null))]
    #[actix_web::test]
    async fn create_rejects_empty_references(#[case] segment: Value, #[case] brand: Value) {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/vehicles/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({
                "vehicle_name": "MODEL S",
                "release_year": 2019,
                "price": 500.12,
                "segment": segment,
                "brand": brand,
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn create_rejects_unresolvable_references() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/vehicles/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({
                "vehicle_name": "MODEL S",
                "release_year": 2019,
                "price": 500.12,
                "segment": 999,
                "brand": 999,
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("details")
                .and_then(|details| details.get("field"))
                .and_then(Value::as_str),
            Some("segment")
        );
    }

    #[actix_web::test]
    async fn create_rejects_out_of_range_price() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;
        let segment = create_segment(&app, &token, "Sedan").await;
        let brand = create_brand(&app, &token, "Tesla").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/vehicles/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({
                "vehicle_name": "MODEL S",
                "release_year": 2019,
                "price": "10000.00",
                "segment": segment,
                "brand": brand,
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("details")
                .and_then(|details| details.get("field"))
                .and_then(Value::as_str),
            Some("price")
        );
    }

    #[actix_web::test]
    async fn owner_field_in_the_body_is_ignored() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;
        let segment = create_segment(&app, &token, "Sedan").await;
        let brand = create_brand(&app, &token, "Tesla").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/vehicles/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({
                "vehicle_name": "MODEL S",
                "release_year": 2019,
                "price": 500.12,
                "segment": segment,
                "brand": brand,
                "user": 999,
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(response).await;
        assert!(body.get("user").is_none());
    }

    #[actix_web::test]
    async fn patch_updates_only_the_provided_fields() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;
        let segment = create_segment(&app, &token, "Sedan").await;
        let brand = create_brand(&app, &token, "Tesla").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/vehicles/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({
                "vehicle_name": "MODEL S",
                "release_year": 2019,
                "price": 500.12,
                "segment": segment,
                "brand": brand,
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body: Value = actix_test::read_body_json(response).await;
        let id = body.get("id").and_then(Value::as_i64).expect("vehicle id");

        let request = actix_test::TestRequest::patch()
            .uri(&format!("/api/vehicles/{id}/"))
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({ "vehicle_name": "MODEL X" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("vehicle_name").and_then(Value::as_str), Some("MODEL X"));
        assert_eq!(body.get("release_year").and_then(Value::as_i64), Some(2019));
        assert_eq!(body.get("price").and_then(Value::as_str), Some("500.12"));
    }

    #[actix_web::test]
    async fn replace_requires_the_full_payload() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;
        let segment = create_segment(&app, &token, "Sedan").await;
        let brand = create_brand(&app, &token, "Tesla").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/vehicles/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({
                "vehicle_name": "MODEL S",
                "release_year": 2019,
                "price": 500.12,
                "segment": segment,
                "brand": brand,
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body: Value = actix_test::read_body_json(response).await;
        let id = body.get("id").and_then(Value::as_i64).expect("vehicle id");

        let request = actix_test::TestRequest::put()
            .uri(&format!("/api/vehicles/{id}/"))
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({ "vehicle_name": "MODEL X" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn delete_removes_the_vehicle() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;
        let segment = create_segment(&app, &token, "Sedan").await;
        let brand = create_brand(&app, &token, "Tesla").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/vehicles/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({
                "vehicle_name": "MODEL S",
                "release_year": 2019,
                "price": 500.12,
                "segment": segment,
                "brand": brand,
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body: Value = actix_test::read_body_json(response).await;
        let id = body.get("id").and_then(Value::as_i64).expect("vehicle id");

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/api/vehicles/{id}/"))
            .insert_header(("Authorization", format!("Token {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/vehicles/{id}/"))
            .insert_header(("Authorization", format!("Token {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
