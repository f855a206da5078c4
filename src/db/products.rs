//! Database queries for products.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::product::{self, ActiveModel, Entity as Product};
use crate::error::{AppError, AppResult};
use crate::models::CreateProductRequest;

use super::DbPool;

impl DbPool {
    /// Insert a new product.
    pub async fn insert_product(&self, request: &CreateProductRequest) -> AppResult<product::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            full_name: Set(request.full_name.trim().to_string()),
            short_name: Set(request.short_name.trim().to_string()),
            contact_email: Set(request.contact_email.trim().to_string()),
            created_at: Set(Utc::now()),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Storage(format!("Failed to insert product: {}", e)))?;

        Ok(result)
    }

    /// Get a product by ID.
    pub async fn get_product_by_id(&self, id: Uuid) -> AppResult<Option<product::Model>> {
        let result = Product::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get product: {}", e)))?;

        Ok(result)
    }

    /// List all products, oldest first.
    pub async fn list_products(&self) -> AppResult<Vec<product::Model>> {
        let result = Product::find()
            .order_by_asc(product::Column::Id) // UUIDv7 is time-ordered
            .all(self.connection())
            .await
            .map_err(|e| AppError::Storage(format!("Failed to list products: {}", e)))?;

        Ok(result)
    }

    /// Get several products by ID. Missing ids are skipped.
    pub async fn get_products_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<product::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Product::find()
            .filter(product::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(product::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get products: {}", e)))?;

        Ok(result)
    }
}
