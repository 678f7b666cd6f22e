//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "method_not_allowed")]
    MethodNotAllowed,
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "segment_name must not be empty")]
    message: String,
    /// Per-field failure context, when applicable.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserSchema {
    /// Stable account identifier.
    #[schema(example = 1)]
    id: i32,
    /// Unique account name; the stored password hash is never serialized.
    #[schema(example = "dummy")]
    username: String,
}

/// OpenAPI schema for [`crate::domain::Segment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Segment)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct SegmentSchema {
    #[schema(example = 1)]
    id: i32,
    #[schema(example = "Sedan")]
    segment_name: String,
}

/// OpenAPI schema for [`crate::domain::Brand`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Brand)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct BrandSchema {
    #[schema(example = 1)]
    id: i32,
    #[schema(example = "Tesla")]
    brand_name: String,
}

/// OpenAPI schema for [`crate::domain::VehicleRecord`].
#[derive(ToSchema)]
#[schema(as = crate::domain::VehicleRecord)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct VehicleSchema {
    #[schema(example = 1)]
    id: i32,
    #[schema(example = "MODEL S")]
    vehicle_name: String,
    #[schema(example = 2019)]
    release_year: i32,
    /// Decimal string with two fraction digits.
    #[schema(value_type = String, example = "500.12")]
    price: String,
    /// Referenced segment identifier.
    segment: i32,
    /// Referenced brand identifier.
    brand: i32,
    /// Read-only display name of the referenced segment.
    #[schema(example = "Sedan")]
    segment_name: String,
    /// Read-only display name of the referenced brand.
    #[schema(example = "Tesla")]
    brand_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    #[test]
    fn schemas_render_to_json() {
        let schema = VehicleSchema::schema();
        let rendered = serde_json::to_value(&schema).expect("schema serializes");
        assert!(rendered.is_object());
    }
}
