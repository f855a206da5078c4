//! Relationship models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::relationship;
use crate::error::{AppError, AppResult};

use super::Product;

/// Relationship type used for product integrations.
pub const INTEGRATION: &str = "integration";

/// Request body for creating a relationship.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationshipRequest {
    #[serde(default, alias = "productID1", alias = "objectID1")]
    pub product_id1: String,
    #[serde(default, alias = "productID2", alias = "objectID2")]
    pub product_id2: String,
    #[serde(default = "default_relationship_type")]
    pub relationship_type: String,
}

fn default_relationship_type() -> String {
    INTEGRATION.to_string()
}

/// Validated relationship members, smaller id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductPair {
    pub first: Uuid,
    pub second: Uuid,
}

impl ProductPair {
    /// Order two distinct ids so the same unordered pair always yields the same value.
    pub fn new(a: Uuid, b: Uuid) -> AppResult<Self> {
        if a == b {
            return Err(AppError::Validation(
                "Cannot create relationship for the same product".to_string(),
            ));
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(ProductPair { first, second })
    }
}

impl CreateRelationshipRequest {
    /// Parse and validate the member ids and the type tag.
    pub fn validate(&self) -> AppResult<(ProductPair, String)> {
        let raw1 = self.product_id1.trim();
        let raw2 = self.product_id2.trim();
        if raw1.is_empty() || raw2.is_empty() {
            return Err(AppError::Validation(
                "Product IDs cannot be empty".to_string(),
            ));
        }

        let relationship_type = self.relationship_type.trim();
        if relationship_type.is_empty() {
            return Err(AppError::Validation(
                "relationshipType cannot be empty".to_string(),
            ));
        }

        let pair = ProductPair::new(Uuid::parse_str(raw1)?, Uuid::parse_str(raw2)?)?;
        Ok((pair, relationship_type.to_string()))
    }
}

/// Relationship as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: Uuid,
    #[serde(rename = "productID1")]
    pub product_id1: Uuid,
    #[serde(rename = "productID2")]
    pub product_id2: Uuid,
    pub relationship_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<relationship::Model> for Relationship {
    fn from(model: relationship::Model) -> Self {
        Relationship {
            id: model.id,
            product_id1: model.product_a_id,
            product_id2: model.product_b_id,
            relationship_type: model.relationship_type,
            created_at: model.created_at,
        }
    }
}

/// An integration together with its member products.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    #[serde(flatten)]
    pub relationship: Relationship,
    pub products: Vec<Product>,
}
