//! HTTP tests: products, relationships, rules and results endpoints.

use serde_json::json;
use uuid::Uuid;

use super::test_helpers::*;

/// Create a product over HTTP and return its id.
async fn create_product<S>(app: &S, short_name: &str) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = post_json(
        app,
        "/api/v1/products",
        json!({
            "fullName": format!("{} Server", short_name),
            "shortName": short_name,
            "contactEmail": format!("{}@example.com", short_name),
        }),
    )
    .await;
    assert_eq!(status, 201, "create product: {:?}", body);
    body["id"].as_str().unwrap().to_string()
}

#[actix_rt::test]
async fn test_health() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(&app, "/api/v1/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get_json(&app, "/api/v1/ready").await;
    assert_eq!(status, 200);
    assert_eq!(body["database"], "connected");
}

#[actix_rt::test]
async fn test_product_crud_and_name_filter() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let chat = create_product(&app, "chat").await;
    create_product(&app, "calls").await;

    let (status, body) = get_json(&app, &format!("/api/v1/products/{}", chat)).await;
    assert_eq!(status, 200);
    assert_eq!(body["shortName"], "chat");
    assert_eq!(body["contactEmail"], "chat@example.com");

    let (status, body) = get_json(&app, "/api/v1/products").await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = get_json(&app, "/api/v1/products?name=CHAT").await;
    assert_eq!(status, 200);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["shortName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["chat"]);
}

#[actix_rt::test]
async fn test_product_validation_and_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = post_json(
        &app,
        "/api/v1/products",
        json!({ "fullName": "  ", "shortName": "x" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");

    let (status, body) = post_json(&app, "/api/v1/products", json!({ "fullName": 5 })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");

    let (status, body) = get_json(&app, &format!("/api/v1/products/{}", Uuid::now_v7())).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = get_json(&app, "/api/v1/products/not-a-uuid").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_relationship_lifecycle() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let chat = create_product(&app, "chat").await;
    let calls = create_product(&app, "calls").await;

    let (status, body) = post_json(
        &app,
        "/api/v1/relationships",
        json!({ "productID1": chat, "productID2": calls }),
    )
    .await;
    assert_eq!(status, 201, "{:?}", body);
    assert_eq!(body["relationshipType"], "integration");
    let relationship_id = body["id"].as_str().unwrap().to_string();

    // Same pair in the other order is a duplicate
    let (status, body) = post_json(
        &app,
        "/api/v1/relationships",
        json!({ "productID1": calls, "productID2": chat }),
    )
    .await;
    assert_eq!(status, 400);
    assert!(
        body["message"].as_str().unwrap().contains("already exists"),
        "{:?}",
        body
    );

    let (status, body) =
        get_json(&app, &format!("/api/v1/relationships/{}", relationship_id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], relationship_id.as_str());

    let (status, body) = get_json(&app, &format!("/api/v1/products/{}/integrations", chat)).await;
    assert_eq!(status, 200);
    let integrations = body.as_array().unwrap();
    assert_eq!(integrations.len(), 1);
    assert_eq!(integrations[0]["id"], relationship_id.as_str());
    assert_eq!(integrations[0]["products"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_relationship_validation() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let chat = create_product(&app, "chat").await;

    let (status, _) = post_json(
        &app,
        "/api/v1/relationships",
        json!({ "productID1": chat, "productID2": chat }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = post_json(
        &app,
        "/api/v1/relationships",
        json!({ "productID1": chat, "productID2": "" }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = post_json(
        &app,
        "/api/v1/relationships",
        json!({ "productID1": chat, "productID2": Uuid::now_v7().to_string() }),
    )
    .await;
    assert_eq!(status, 404, "{:?}", body);
}

#[actix_rt::test]
async fn test_rule_lifecycle_and_validation() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let chat = create_product(&app, "chat").await;
    let calls = create_product(&app, "calls").await;
    let (_, body) = post_json(
        &app,
        "/api/v1/relationships",
        json!({ "productID1": chat, "productID2": calls }),
    )
    .await;
    let relationship_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &app,
        "/api/v1/rules",
        json!({
            "expression": "Integration*",
            "appliesTo": ["suite", "case"],
            "relationshipID": relationship_id,
        }),
    )
    .await;
    assert_eq!(status, 201, "{:?}", body);
    assert_eq!(body["appliesTo"], json!(["suite", "case"]));
    let rule_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = get_json(&app, &format!("/api/v1/rules/{}", rule_id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["expression"], "Integration*");

    let (status, body) = get_json(
        &app,
        &format!("/api/v1/relationships/{}/rules", relationship_id),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Unknown scope
    let (status, _) = post_json(
        &app,
        "/api/v1/rules",
        json!({ "expression": "x", "appliesTo": ["module"], "relationshipID": relationship_id }),
    )
    .await;
    assert_eq!(status, 400);

    // No scope at all
    let (status, _) = post_json(
        &app,
        "/api/v1/rules",
        json!({ "expression": "x", "appliesTo": [], "relationshipID": relationship_id }),
    )
    .await;
    assert_eq!(status, 400);

    // Unknown relationship
    let (status, _) = post_json(
        &app,
        "/api/v1/rules",
        json!({ "expression": "x", "appliesTo": ["suite"], "relationshipID": Uuid::now_v7() }),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_upload_and_retrieve_by_product() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let chat = create_product(&app, "chat").await;

    let (status, body) = upload_report(&app, &chat, INTEGRATION_REPORT).await;
    assert_eq!(status, 201, "{:?}", body);
    assert_eq!(body["resultIDs"].as_array().unwrap().len(), 2);

    let (status, body) = get_json(&app, &format!("/api/v1/results/product/{}", chat)).await;
    assert_eq!(status, 200);
    assert_eq!(
        suite_names(&body),
        vec![
            (
                "IntegrationLogin".to_string(),
                vec!["testA".to_string(), "testB".to_string()]
            ),
            ("UnitMath".to_string(), vec!["adds".to_string()]),
        ]
    );
    let failed = &body[0]["testSuites"][0]["testCases"][1];
    assert_eq!(failed["status"], "fail");
    assert_eq!(failed["type"], "AssertionError");
    assert_eq!(body[0]["productID"], chat.as_str());
}

#[actix_rt::test]
async fn test_upload_rejections() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let chat = create_product(&app, "chat").await;

    // Missing file
    let body = multipart_body(&[("productId", None, chat.as_bytes())]);
    let (status, _) = upload_multipart(&app, body).await;
    assert_eq!(status, 400);

    // Missing product id
    let body = multipart_body(&[("file", Some("r.xml"), INTEGRATION_REPORT.as_bytes())]);
    let (status, _) = upload_multipart(&app, body).await;
    assert_eq!(status, 400);

    // Unknown product
    let (status, body) = upload_report(&app, &Uuid::now_v7().to_string(), INTEGRATION_REPORT).await;
    assert_eq!(status, 404, "{:?}", body);

    // Not a test report
    let (status, body) = upload_report(&app, &chat, "<html></html>").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_FORMAT");

    // Over the upload limit
    let oversized = format!(
        "<testsuites><!-- {} --></testsuites>",
        "x".repeat(TEST_MAX_UPLOAD_SIZE)
    );
    let (status, body) = upload_report(&app, &chat, &oversized).await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("limit"), "{:?}", body);
}

#[actix_rt::test]
async fn test_retrieve_by_relationship_over_http() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let chat = create_product(&app, "chat").await;
    let calls = create_product(&app, "calls").await;

    upload_report(&app, &chat, INTEGRATION_REPORT).await;
    upload_report(
        &app,
        &calls,
        r#"<testsuite name="IntegrationCalls"><testcase name="rings"/></testsuite>"#,
    )
    .await;

    let (_, body) = post_json(
        &app,
        "/api/v1/relationships",
        json!({ "productID1": chat, "productID2": calls }),
    )
    .await;
    let relationship_id = body["id"].as_str().unwrap().to_string();

    // No rules yet
    let uri = format!("/api/v1/results/relationship/{}", relationship_id);
    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));

    post_json(
        &app,
        "/api/v1/rules",
        json!({
            "expression": "Integration*",
            "appliesTo": ["suite"],
            "relationshipID": relationship_id,
        }),
    )
    .await;

    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, 200);
    assert_eq!(
        suite_names(&body),
        vec![
            (
                "IntegrationLogin".to_string(),
                vec!["testA".to_string(), "testB".to_string()]
            ),
            ("IntegrationCalls".to_string(), vec!["rings".to_string()]),
        ]
    );

    let (status, _) = get_json(
        &app,
        &format!("/api/v1/results/relationship/{}", Uuid::now_v7()),
    )
    .await;
    assert_eq!(status, 404);
}
