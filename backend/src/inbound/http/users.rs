//! Account API handlers: registration, token login, and profile access.
//!
//! ```text
//! POST /api/create/  {"username":"dummy","password":"dummy_pw"}
//! POST /api/auth/    {"username":"dummy","password":"dummy_pw"}
//! GET  /api/profile/
//! ```

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::UserPersistenceError;
use crate::domain::{Error, LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthenticatedUser, map_token_error};
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldErrorCode, field_error, map_login_validation_error, map_registration_validation_error,
    missing_field_error,
};

/// Credentials payload shared by registration and token login.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Token login response body.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Map user-store failures onto the domain error envelope.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateUsername => field_error(
            "username",
            FieldErrorCode::Unique,
            "username is already taken",
        ),
    }
}

fn required_credentials(payload: CredentialsRequest) -> ApiResult<(String, String)> {
    let CredentialsRequest { username, password } = payload;
    let username = username.ok_or_else(|| missing_field_error("username"))?;
    let password = password.ok_or_else(|| missing_field_error("password"))?;
    Ok((username, password))
}

/// Register a new account.
///
/// The response never carries the password, not even immediately after
/// creation.
#[utoipa::path(
    post,
    path = "/api/create/",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = UserSchema),
        (status = 400, description = "Invalid payload or duplicate username", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/create/")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let (username, password) = required_credentials(payload.into_inner())?;
    let registration = Registration::try_from_parts(&username, &password)
        .map_err(map_registration_validation_error)?;
    let user = state
        .users
        .create(&registration)
        .await
        .map_err(map_user_persistence_error)?;
    Ok(HttpResponse::Created().json(user))
}

/// Exchange credentials for the caller's bearer token.
///
/// Every failure mode answers `400` without a token field, so responses
/// cannot be used to probe which usernames exist.
#[utoipa::path(
    post,
    path = "/api/auth/",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid payload or credentials", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "obtainToken",
    security([])
)]
#[post("/auth/")]
pub async fn obtain_token(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let (username, password) = required_credentials(payload.into_inner())?;
    let credentials = LoginCredentials::try_from_parts(&username, &password)
        .map_err(map_login_validation_error)?;
    let token = state
        .tokens
        .issue(&credentials)
        .await
        .map_err(map_token_error)?;
    Ok(web::Json(TokenResponse {
        token: token.key().to_owned(),
    }))
}

/// Return the authenticated caller's own account.
///
/// The identity comes from the bearer token, never from a path parameter, so
/// one user can never read another's profile here.
#[utoipa::path(
    get,
    path = "/api/profile/",
    responses(
        (status = 200, description = "Caller's account", body = UserSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "profile"
)]
#[get("/profile/")]
pub async fn profile(
    state: web::Data<HttpState>,
    identity: AuthenticatedUser,
) -> ApiResult<web::Json<User>> {
    let user = state
        .users
        .find_by_id(identity.user_id())
        .await
        .map_err(map_user_persistence_error)?
        .ok_or_else(|| Error::unauthorized("invalid token"))?;
    Ok(web::Json(user))
}

/// Reject profile replacement.
///
/// The storage layer could support this; the API surface deliberately does
/// not, matching the original contract.
#[utoipa::path(
    put,
    path = "/api/profile/",
    responses(
        (status = 405, description = "Profile replacement is disabled", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "replaceProfile"
)]
#[put("/profile/")]
pub async fn replace_profile(_identity: AuthenticatedUser) -> ApiResult<HttpResponse> {
    Err(Error::method_not_allowed("PUT method is not allowed"))
}

/// Reject partial profile updates, mirroring [`replace_profile`].
#[utoipa::path(
    patch,
    path = "/api/profile/",
    responses(
        (status = 405, description = "Profile updates are disabled", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[patch("/profile/")]
pub async fn update_profile(_identity: AuthenticatedUser) -> ApiResult<HttpResponse> {
    Err(Error::method_not_allowed("PATCH method is not allowed"))
}

#[cfg(test)]
mod tests {
    //! Handler coverage against the in-memory port implementations.
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{obtain_token_for, test_app};

    #[actix_web::test]
    async fn register_returns_public_fields_without_password() {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/create/")
            .set_json(json!({ "username": "dummy", "password": "dummy_pw" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("username").and_then(Value::as_str), Some("dummy"));
        assert!(body.get("id").and_then(Value::as_i64).is_some());
        assert!(body.get("password").is_none());
    }

    #[actix_web::test]
    async fn registered_credentials_can_log_in() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;
        assert_eq!(token.len(), 40);
    }

    #[actix_web::test]
    async fn duplicate_username_is_rejected() {
        let app = actix_test::init_service(test_app()).await;
        let _ = obtain_token_for(&app, "dummy", "dummy_pw").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/create/")
            .set_json(json!({ "username": "dummy", "password": "other_pw" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        let details = body.get("details").expect("field details");
        assert_eq!(details.get("field").and_then(Value::as_str), Some("username"));
        assert_eq!(details.get("code").and_then(Value::as_str), Some("unique"));
    }

    #[rstest]
    #[case(json!({ "username": "dummy", "password": "1234" }), "password", "min_length")]
    #[case(json!({ "username": "", "password": "dummy_pw" }), "username", "blank")]
    #[case(json!({ "password": "dummy_pw" }), "username", "required")]
    #[case(json!({ "username": "dummy" }), "password", "required")]
    #[actix_web::test]
    async fn register_rejects_invalid_payloads(
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/create/")
            .set_json(payload)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        let details = body.get("details").expect("field details");
        assert_eq!(details.get("field").and_then(Value::as_str), Some(field));
        assert_eq!(details.get("code").and_then(Value::as_str), Some(code));
    }

    #[rstest]
    #[case(json!({ "username": "dummy", "password": "wrong_pw" }))]
    #[case(json!({ "username": "nobody", "password": "dummy_pw" }))]
    #[case(json!({ "username": "", "password": "dummy_pw" }))]
    #[case(json!({ "username": "dummy", "password": "" }))]
    #[actix_web::test]
    async fn login_failures_answer_400_without_a_token(#[case] payload: Value) {
        let app = actix_test::init_service(test_app()).await;
        let _ = obtain_token_for(&app, "dummy", "dummy_pw").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/auth/")
            .set_json(payload)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        assert!(body.get("token").is_none());
    }

    #[actix_web::test]
    async fn repeated_logins_reuse_the_token() {
        let app = actix_test::init_service(test_app()).await;
        let first = obtain_token_for(&app, "dummy", "dummy_pw").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/auth/")
            .set_json(json!({ "username": "dummy", "password": "dummy_pw" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("token").and_then(Value::as_str), Some(first.as_str()));
    }

    #[actix_web::test]
    async fn profile_returns_the_callers_account() {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;

        let request = actix_test::TestRequest::get()
            .uri("/api/profile/")
            .insert_header(("Authorization", format!("Token {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("username").and_then(Value::as_str), Some("dummy"));
        assert!(body.get("password").is_none());
    }

    #[actix_web::test]
    async fn profile_requires_a_token() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/profile/")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case(actix_web::http::Method::PUT, "PUT method is not allowed")]
    #[case(actix_web::http::Method::PATCH, "PATCH method is not allowed")]
    #[actix_web::test]
    async fn profile_writes_are_always_rejected(
        #[case] method: actix_web::http::Method,
        #[case] expected_message: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;
        let token = obtain_token_for(&app, "dummy", "dummy_pw").await;

        let request = actix_test::TestRequest::default()
            .method(method)
            .uri("/api/profile/")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({ "username": "dummy", "password": "dummy_pw" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some(expected_message)
        );
    }
}
