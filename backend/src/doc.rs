//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: all HTTP endpoints from the inbound layer, the schema
//! wrappers for domain types, and the bearer-token security scheme. The
//! generated specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{
    BrandSchema, ErrorCodeSchema, ErrorSchema, SegmentSchema, UserSchema, VehicleSchema,
};

/// Enrich the generated document with the token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "TokenAuth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Opaque token issued by POST /api/auth/, sent as `Token <key>`.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Vehicle catalog API",
        description = "Token-authenticated CRUD over segments, brands, and vehicles."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenAuth" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::obtain_token,
        crate::inbound::http::users::profile,
        crate::inbound::http::users::replace_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::segments::list_segments,
        crate::inbound::http::segments::create_segment,
        crate::inbound::http::segments::get_segment,
        crate::inbound::http::segments::replace_segment,
        crate::inbound::http::segments::patch_segment,
        crate::inbound::http::segments::delete_segment,
        crate::inbound::http::brands::list_brands,
        crate::inbound::http::brands::create_brand,
        crate::inbound::http::brands::get_brand,
        crate::inbound::http::brands::replace_brand,
        crate::inbound::http::brands::patch_brand,
        crate::inbound::http::brands::delete_brand,
        crate::inbound::http::vehicles::list_vehicles,
        crate::inbound::http::vehicles::create_vehicle,
        crate::inbound::http::vehicles::get_vehicle,
        crate::inbound::http::vehicles::replace_vehicle,
        crate::inbound::http::vehicles::patch_vehicle,
        crate::inbound::http::vehicles::delete_vehicle,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorCodeSchema,
        ErrorSchema,
        UserSchema,
        SegmentSchema,
        BrandSchema,
        VehicleSchema,
    )),
    tags(
        (name = "users", description = "Registration, token login, and profile"),
        (name = "segments", description = "Vehicle segment reference data"),
        (name = "brands", description = "Vehicle brand reference data"),
        (name = "vehicles", description = "User-owned catalog vehicles"),
        (name = "health", description = "Orchestration probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn document_lists_every_resource_path() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for expected in [
            "/api/create/",
            "/api/auth/",
            "/api/profile/",
            "/api/segments/",
            "/api/segments/{id}/",
            "/api/brands/",
            "/api/brands/{id}/",
            "/api/vehicles/",
            "/api/vehicles/{id}/",
        ] {
            assert!(paths.contains_key(expected), "missing path: {expected}");
        }
    }
}
