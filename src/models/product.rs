//! Product models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::product;
use crate::error::{AppError, AppResult};

/// Request body for creating a product.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub full_name: String,
    pub short_name: String,
    #[serde(default)]
    pub contact_email: String,
}

impl CreateProductRequest {
    /// Reject blank names.
    pub fn validate(&self) -> AppResult<()> {
        if self.full_name.trim().is_empty() {
            return Err(AppError::Validation("fullName cannot be empty".to_string()));
        }
        if self.short_name.trim().is_empty() {
            return Err(AppError::Validation("shortName cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Query parameters for listing products.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Case-insensitive substring of the full or short name
    pub name: Option<String>,
}

/// Product as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub full_name: String,
    pub short_name: String,
    pub contact_email: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether either name contains `needle`, ignoring case.
    pub fn name_matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.full_name.to_lowercase().contains(&needle)
            || self.short_name.to_lowercase().contains(&needle)
    }
}

impl From<product::Model> for Product {
    fn from(model: product::Model) -> Self {
        Product {
            id: model.id,
            full_name: model.full_name,
            short_name: model.short_name,
            contact_email: model.contact_email,
            created_at: model.created_at,
        }
    }
}
