//! Product API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::relationship::INTEGRATION;
use crate::models::{CreateProductRequest, Integration, Product, ProductQuery};

/// Create a product.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_product(
    pool: web::Data<DbPool>,
    body: web::Json<CreateProductRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    let product = pool.insert_product(&request).await?;
    info!(product_id = %product.id, short_name = %product.short_name, "Product created");

    Ok(HttpResponse::Created().json(Product::from(product)))
}

/// List products, optionally filtered by name.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Products", body = Vec<Product>),
    )
)]
pub async fn list_products(
    pool: web::Data<DbPool>,
    query: web::Query<ProductQuery>,
) -> AppResult<HttpResponse> {
    let name = query
        .into_inner()
        .name
        .filter(|name| !name.trim().is_empty());

    let products: Vec<Product> = pool
        .list_products()
        .await?
        .into_iter()
        .map(Product::from)
        .filter(|product| name.as_deref().is_none_or(|n| product.name_matches(n.trim())))
        .collect();

    Ok(HttpResponse::Ok().json(products))
}

/// Get a product by ID.
#[utoipa::path(
    get,
    path = "/api/v1/products/{product_id}",
    tag = "Products",
    params(
        ("product_id" = Uuid, Path, description = "Product UUID")
    ),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let product_id = path.into_inner();
    let product = pool
        .get_product_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", product_id)))?;

    Ok(HttpResponse::Ok().json(Product::from(product)))
}

/// List the integrations a product takes part in, with both member products.
#[utoipa::path(
    get,
    path = "/api/v1/products/{product_id}/integrations",
    tag = "Products",
    params(
        ("product_id" = Uuid, Path, description = "Product UUID")
    ),
    responses(
        (status = 200, description = "Integrations", body = Vec<Integration>),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_product_integrations(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let product_id = path.into_inner();
    pool.get_product_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", product_id)))?;

    let relationships = pool
        .get_relationships_for_product(product_id, INTEGRATION)
        .await?;

    let mut integrations = Vec::with_capacity(relationships.len());
    for relationship in relationships {
        let products = pool
            .get_products_by_ids(&relationship.members())
            .await?
            .into_iter()
            .map(Product::from)
            .collect();
        integrations.push(Integration {
            relationship: relationship.into(),
            products,
        });
    }

    Ok(HttpResponse::Ok().json(integrations))
}

/// Configure product routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/products")
            .route(web::get().to(list_products))
            .route(web::post().to(create_product)),
    )
    .service(web::resource("/products/{product_id}").route(web::get().to(get_product)))
    .service(
        web::resource("/products/{product_id}/integrations")
            .route(web::get().to(get_product_integrations)),
    );
}
