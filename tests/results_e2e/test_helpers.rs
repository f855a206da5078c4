//! Shared test helpers for results E2E tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use hypha_lib::{api, middleware};
use hypha_lib::db::DbPool;
use hypha_lib::entity::product;
use hypha_lib::models::{CreateProductRequest, ProductPair, ScopeSet};
use serde_json::Value;
use uuid::Uuid;

/// Upload limit used by the test app.
pub const TEST_MAX_UPLOAD_SIZE: usize = 64 * 1024;

const BOUNDARY: &str = "----hypha-test-boundary";

/// Two suites: an integration suite with two cases and a unit suite.
pub const INTEGRATION_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="IntegrationLogin" tests="2" failures="1" time="1.5">
    <properties>
      <property name="browser" value="firefox"/>
    </properties>
    <testcase classname="login" name="testA" time="0.5"/>
    <testcase classname="login" name="testB" time="1.0">
      <failure message="expected 200" type="AssertionError">stack</failure>
    </testcase>
  </testsuite>
  <testsuite name="UnitMath" tests="1" time="0.1">
    <testcase classname="math" name="adds" time="0.1"/>
  </testsuite>
</testsuites>"#;

/// Create a fresh migrated database.
pub async fn create_test_pool() -> DbPool {
    DbPool::in_memory()
        .await
        .expect("Failed to create in-memory database")
}

/// Create a test app with every API route mounted.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .wrap(middleware::RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(TEST_MAX_UPLOAD_SIZE))
            .app_data(api::json_config())
            .app_data(api::path_config())
            .app_data(api::query_config())
            .service(web::scope("/api/v1").configure(api::configure_api)),
    )
    .await
}

/// Insert a product directly through the pool.
pub async fn seed_product(pool: &DbPool, short_name: &str) -> product::Model {
    pool.insert_product(&CreateProductRequest {
        full_name: format!("{} Server", short_name),
        short_name: short_name.to_string(),
        contact_email: String::new(),
    })
    .await
    .expect("Failed to insert product")
}

/// Insert an integration between two products.
pub async fn seed_integration(pool: &DbPool, a: Uuid, b: Uuid) -> Uuid {
    let pair = ProductPair::new(a, b).expect("distinct products");
    pool.insert_relationship(pair, "integration")
        .await
        .expect("Failed to insert relationship")
        .id
}

/// Insert a rule for a relationship.
pub async fn seed_rule(pool: &DbPool, relationship_id: Uuid, expression: &str, scopes: &[&str]) {
    let scopes = ScopeSet::from_tags(scopes).expect("valid scopes");
    pool.insert_rule(relationship_id, expression, &scopes)
        .await
        .expect("Failed to insert rule");
}

/// Build a multipart body from `(name, filename, content)` parts.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/xml\r\n\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST a multipart body to /api/v1/results.
pub async fn upload_multipart<S>(app: &S, body: Vec<u8>) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/results")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
        .to_request();

    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Upload a report for a product.
pub async fn upload_report<S>(app: &S, product_id: &str, report: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let body = multipart_body(&[
        ("productId", None, product_id.as_bytes()),
        ("file", Some("report.xml"), report.as_bytes()),
    ]);
    upload_multipart(app, body).await
}

/// POST a JSON body.
pub async fn post_json<S>(app: &S, uri: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();

    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// GET a JSON resource.
pub async fn get_json<S>(app: &S, uri: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get().uri(uri).to_request();

    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Names of the suites in a retrieval response, with their case names.
pub fn suite_names(results: &Value) -> Vec<(String, Vec<String>)> {
    results
        .as_array()
        .expect("results array")
        .iter()
        .flat_map(|result| result["testSuites"].as_array().cloned().unwrap_or_default())
        .map(|suite| {
            let cases = suite["testCases"]
                .as_array()
                .map(|cases| {
                    cases
                        .iter()
                        .map(|c| c["name"].as_str().unwrap_or_default().to_string())
                        .collect()
                })
                .unwrap_or_default();
            (suite["name"].as_str().unwrap_or_default().to_string(), cases)
        })
        .collect()
}
