//! Relationship and rule API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::db::{DbPool, ResultsGateway};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateRelationshipRequest, CreateRuleRequest, Relationship, RuleResponse, ScopeSet,
};

/// Create a relationship between two products.
#[utoipa::path(
    post,
    path = "/api/v1/relationships",
    tag = "Relationships",
    request_body = CreateRelationshipRequest,
    responses(
        (status = 201, description = "Relationship created", body = Relationship),
        (status = 400, description = "Invalid or duplicate relationship", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_relationship(
    pool: web::Data<DbPool>,
    body: web::Json<CreateRelationshipRequest>,
) -> AppResult<HttpResponse> {
    let (pair, relationship_type) = body.into_inner().validate()?;

    for product_id in [pair.first, pair.second] {
        pool.get_product_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {}", product_id)))?;
    }

    let relationship = pool.insert_relationship(pair, &relationship_type).await?;
    info!(
        relationship_id = %relationship.id,
        relationship_type = %relationship.relationship_type,
        "Relationship created"
    );

    Ok(HttpResponse::Created().json(Relationship::from(relationship)))
}

/// Get a relationship by ID.
#[utoipa::path(
    get,
    path = "/api/v1/relationships/{relationship_id}",
    tag = "Relationships",
    params(
        ("relationship_id" = Uuid, Path, description = "Relationship UUID")
    ),
    responses(
        (status = 200, description = "Relationship", body = Relationship),
        (status = 404, description = "Relationship not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_relationship(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let relationship_id = path.into_inner();
    let relationship = pool
        .get_relationship_by_id(relationship_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Relationship {}", relationship_id)))?;

    Ok(HttpResponse::Ok().json(Relationship::from(relationship)))
}

/// List the rules of a relationship.
#[utoipa::path(
    get,
    path = "/api/v1/relationships/{relationship_id}/rules",
    tag = "Rules",
    params(
        ("relationship_id" = Uuid, Path, description = "Relationship UUID")
    ),
    responses(
        (status = 200, description = "Rules, oldest first", body = Vec<RuleResponse>),
        (status = 404, description = "Relationship not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_relationship_rules(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let relationship_id = path.into_inner();
    let conn = pool.connection();
    conn.find_relationship(relationship_id).await?;

    let rules: Vec<RuleResponse> = conn
        .find_rules_by_relationship(relationship_id)
        .await?
        .into_iter()
        .map(RuleResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(rules))
}

/// Create a rule for a relationship.
#[utoipa::path(
    post,
    path = "/api/v1/rules",
    tag = "Rules",
    request_body = CreateRuleRequest,
    responses(
        (status = 201, description = "Rule created", body = RuleResponse),
        (status = 400, description = "Invalid rule", body = crate::error::ErrorResponse),
        (status = 404, description = "Relationship not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_rule(
    pool: web::Data<DbPool>,
    body: web::Json<CreateRuleRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();

    let scopes = ScopeSet::from_tags(&request.applies_to)?;
    if scopes.is_empty() {
        return Err(AppError::Validation(
            "appliesTo must name at least one of: suite, case".to_string(),
        ));
    }

    pool.get_relationship_by_id(request.relationship_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Relationship {}", request.relationship_id)))?;

    let rule = pool
        .insert_rule(request.relationship_id, &request.expression, &scopes)
        .await?;
    info!(
        rule_id = %rule.id,
        relationship_id = %rule.relationship_id,
        expression = %rule.expression,
        applies_to = %rule.applies_to,
        "Rule created"
    );

    Ok(HttpResponse::Created().json(RuleResponse::from(rule)))
}

/// Get a rule by ID.
#[utoipa::path(
    get,
    path = "/api/v1/rules/{rule_id}",
    tag = "Rules",
    params(
        ("rule_id" = Uuid, Path, description = "Rule UUID")
    ),
    responses(
        (status = 200, description = "Rule", body = RuleResponse),
        (status = 404, description = "Rule not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_rule(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let rule_id = path.into_inner();
    let rule = pool
        .get_rule_by_id(rule_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rule {}", rule_id)))?;

    Ok(HttpResponse::Ok().json(RuleResponse::from(rule)))
}

/// Configure relationship and rule routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/relationships").route(web::post().to(create_relationship)))
        .service(
            web::resource("/relationships/{relationship_id}")
                .route(web::get().to(get_relationship)),
        )
        .service(
            web::resource("/relationships/{relationship_id}/rules")
                .route(web::get().to(list_relationship_rules)),
        )
        .service(web::resource("/rules").route(web::post().to(create_rule)))
        .service(web::resource("/rules/{rule_id}").route(web::get().to(get_rule)));
}
