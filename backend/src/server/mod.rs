//! Server construction and routing table.
//!
//! The routing is an explicit list of free-function handlers per resource;
//! there is no inheritance or generic view machinery.

mod config;

pub use config::{ConfigError, ServerConfig};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{brands, segments, users, vehicles};

/// Assemble the application with every route and its shared state.
pub fn app(
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .service(users::register)
        .service(users::obtain_token)
        .service(users::profile)
        .service(users::replace_profile)
        .service(users::update_profile)
        .service(segments::list_segments)
        .service(segments::create_segment)
        .service(segments::get_segment)
        .service(segments::replace_segment)
        .service(segments::patch_segment)
        .service(segments::delete_segment)
        .service(brands::list_brands)
        .service(brands::create_brand)
        .service(brands::get_brand)
        .service(brands::replace_brand)
        .service(brands::patch_brand)
        .service(brands::delete_brand)
        .service(vehicles::list_vehicles)
        .service(vehicles::create_vehicle)
        .service(vehicles::get_vehicle)
        .service(vehicles::replace_vehicle)
        .service(vehicles::patch_vehicle)
        .service(vehicles::delete_vehicle);

    let app = App::new()
        .app_data(state)
        .app_data(health_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind and run the HTTP server until shutdown.
pub async fn run(config: ServerConfig, state: HttpState) -> std::io::Result<()> {
    let state = web::Data::new(state);
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays accessible.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || app(state.clone(), server_health_state.clone()))
        .bind(config.bind_addr())?;

    health_state.mark_ready();
    server.run().await
}

#[cfg(test)]
mod tests {
    //! Routing smoke coverage.
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;

    use crate::inbound::http::test_utils::test_app;

    #[actix_web::test]
    async fn readiness_probe_answers_ok() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/health/ready")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unknown_routes_answer_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/nope/").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
