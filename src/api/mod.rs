//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod products;
pub mod relationships;
pub mod results;

use actix_web::web;

use crate::error::AppError;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use products::configure_routes as configure_product_routes;
pub use relationships::configure_routes as configure_relationship_routes;
pub use results::configure_routes as configure_result_routes;

/// Mount every `/api/v1` route.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_product_routes)
        .configure(configure_relationship_routes)
        .configure(configure_result_routes);
}

/// JSON extractor config: malformed bodies become `INVALID_INPUT` responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid request body: {}", err)).into()
    })
}

/// Path extractor config: malformed ids become `INVALID_INPUT` responses.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid path parameter: {}", err)).into()
    })
}

/// Query extractor config: malformed query strings become `INVALID_INPUT` responses.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid query string: {}", err)).into()
    })
}
