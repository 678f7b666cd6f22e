//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod ports;
pub mod user;

pub use self::auth::{
    AuthToken, LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration,
    RegistrationValidationError,
};
pub use self::catalog::{
    Brand, BrandDraft, CatalogValidationError, NAME_MAX, PRICE_DECIMAL_PLACES, PRICE_MAX_DIGITS,
    Price, Segment, SegmentDraft, VehicleDraft, VehicleRecord,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::user::{USERNAME_MAX, User, UserValidationError, Username};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
