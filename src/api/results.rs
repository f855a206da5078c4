//! Result ingest and retrieval handlers.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{IngestResponse, ResultView};
use crate::services::{ingest_report, retrieve_by_product, retrieve_by_relationship};

/// Upper bound for plain text form fields.
const MAX_FIELD_SIZE: usize = 1024;

/// Multipart field names accepted for the owning product.
const PRODUCT_FIELDS: [&str; 3] = ["productId", "productID", "product_id"];

/// Upload a JUnit or xUnit report for a product.
///
/// Form fields:
/// - `productId`: UUID of an existing product
/// - `file`: the XML report
///
/// Every suite in the report is stored as its own result.
#[utoipa::path(
    post,
    path = "/api/v1/results",
    tag = "Results",
    request_body(content_type = "multipart/form-data", description = "productId and file fields"),
    responses(
        (status = 201, description = "Report ingested", body = IngestResponse),
        (status = 400, description = "Invalid upload or unparseable report", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_results(
    pool: web::Data<DbPool>,
    max_upload_size: web::Data<usize>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let max_upload_size = *max_upload_size.get_ref();
    let mut product_id: Option<String> = None;
    let mut report: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?;

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if PRODUCT_FIELDS.contains(&name.as_str()) {
            let data = read_field(&mut field, MAX_FIELD_SIZE).await?;
            let value = String::from_utf8(data)
                .map_err(|_| AppError::Validation(format!("{} must be UTF-8 text", name)))?;
            product_id = Some(value.trim().to_string());
        } else if name == "file" {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or("report.xml")
                .to_string();
            let data = read_field(&mut field, max_upload_size).await?;
            report = Some((filename, data));
        } else {
            // Drain unknown parts so the stream can advance
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?;
            }
        }
    }

    let product_id = product_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("productId is required".to_string()))?;
    let product_id = Uuid::parse_str(&product_id)?;

    let (filename, data) =
        report.ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    info!(
        product_id = %product_id,
        filename = %filename,
        size = data.len(),
        "Received test report"
    );

    let result_ids = ingest_report(pool.connection(), product_id, &data).await?;

    info!(
        product_id = %product_id,
        results = result_ids.len(),
        "Report ingested"
    );

    Ok(HttpResponse::Created().json(IngestResponse { result_ids }))
}

/// Read a multipart field into memory, rejecting it once it exceeds `limit` bytes.
async fn read_field(field: &mut Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::Validation(format!("Read error: {}", e)))?;
        if data.len() + chunk.len() > limit {
            return Err(AppError::Validation(format!(
                "Field '{}' exceeds the {} byte limit",
                field.name().unwrap_or_default(),
                limit
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Results selected by a relationship's rules.
#[utoipa::path(
    get,
    path = "/api/v1/results/relationship/{relationship_id}",
    tag = "Results",
    params(
        ("relationship_id" = Uuid, Path, description = "Relationship UUID")
    ),
    responses(
        (status = 200, description = "Selected results; empty when no rule matches", body = Vec<ResultView>),
        (status = 404, description = "Relationship not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_results_by_relationship(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let results = retrieve_by_relationship(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(results))
}

/// Every result of a product.
#[utoipa::path(
    get,
    path = "/api/v1/results/product/{product_id}",
    tag = "Results",
    params(
        ("product_id" = Uuid, Path, description = "Product UUID")
    ),
    responses(
        (status = 200, description = "Results with suites, cases and properties", body = Vec<ResultView>),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_results_by_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let results = retrieve_by_product(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(results))
}

/// Configure result routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/results").route(web::post().to(upload_results)))
        .service(
            web::resource("/results/relationship/{relationship_id}")
                .route(web::get().to(get_results_by_relationship)),
        )
        .service(
            web::resource("/results/product/{product_id}")
                .route(web::get().to(get_results_by_product)),
        );
}
