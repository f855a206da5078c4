//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hypha Results Server",
        version = "0.2.0",
        description = "API server for ingesting JUnit/xUnit test reports and selecting results across related products by rule"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Product endpoints
        api::products::create_product,
        api::products::list_products,
        api::products::get_product,
        api::products::get_product_integrations,
        // Relationship and rule endpoints
        api::relationships::create_relationship,
        api::relationships::get_relationship,
        api::relationships::list_relationship_rules,
        api::relationships::create_rule,
        api::relationships::get_rule,
        // Result endpoints
        api::results::upload_results,
        api::results::get_results_by_relationship,
        api::results::get_results_by_product,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Products
            models::CreateProductRequest,
            models::Product,
            // Relationships
            models::CreateRelationshipRequest,
            models::Relationship,
            models::Integration,
            // Rules
            models::RuleScope,
            models::CreateRuleRequest,
            models::RuleResponse,
            // Results
            models::CaseStatus,
            models::IngestResponse,
            models::ResultView,
            models::TestSuiteView,
            models::TestCaseView,
            models::PropertyView,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Products", description = "Product registration and lookup"),
        (name = "Relationships", description = "Relationships between products"),
        (name = "Rules", description = "Result selection rules"),
        (name = "Results", description = "Report ingest and result retrieval")
    )
)]
pub struct ApiDoc;
