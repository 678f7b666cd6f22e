//! Bearer-token authentication for HTTP handlers.
//!
//! Keep the resource modules focused on request/response mapping by
//! concentrating header parsing and token resolution here. Handlers opt into
//! authentication by taking [`AuthenticatedUser`] as a parameter; extraction
//! fails with `401 Unauthorized` before the handler body runs.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::TokenAuthenticationError;
use crate::domain::Error;
use crate::inbound::http::state::HttpState;

/// Authorization scheme keyword, matched case-insensitively.
const TOKEN_SCHEME: &str = "token";

/// Identity of the caller proven by a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: i32,
}

impl AuthenticatedUser {
    /// Identifier of the authenticated account.
    pub fn user_id(self) -> i32 {
        self.user_id
    }
}

/// Extract the token key from an `Authorization: Token <key>` header value.
///
/// Mirrors the original contract: exactly two whitespace-separated parts, the
/// first being the scheme keyword in any letter case.
fn parse_token_key(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let key = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case(TOKEN_SCHEME) {
        return None;
    }
    Some(key)
}

/// Map token-store failures onto the domain error envelope.
pub(crate) fn map_token_error(error: TokenAuthenticationError) -> Error {
    match error {
        TokenAuthenticationError::Connection { message } => Error::service_unavailable(message),
        TokenAuthenticationError::Query { message } => Error::internal(message),
        TokenAuthenticationError::InvalidCredentials => {
            Error::invalid_request("unable to log in with provided credentials")
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("http state is not configured"))?;
            let raw = header.ok_or_else(|| {
                Error::unauthorized("authentication credentials were not provided")
            })?;
            let key = parse_token_key(&raw)
                .ok_or_else(|| Error::unauthorized("invalid authorization header"))?;
            let user_id = state
                .tokens
                .resolve(key)
                .await
                .map_err(map_token_error)?
                .ok_or_else(|| Error::unauthorized("invalid token"))?;
            Ok(Self { user_id })
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("Token abc123", Some("abc123"))]
    #[case("token abc123", Some("abc123"))]
    #[case("TOKEN abc123", Some("abc123"))]
    #[case("Bearer abc123", None)]
    #[case("Token", None)]
    #[case("Token abc 123", None)]
    #[case("", None)]
    fn parses_authorization_header(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_token_key(raw), expected);
    }

    #[rstest]
    #[case(
        TokenAuthenticationError::connection("database unavailable"),
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        TokenAuthenticationError::query("database query failed"),
        ErrorCode::InternalError
    )]
    #[case(
        TokenAuthenticationError::InvalidCredentials,
        ErrorCode::InvalidRequest
    )]
    fn maps_token_store_failures(
        #[case] error: TokenAuthenticationError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_token_error(error).code(), expected);
    }
}
