//! Database queries for relationships.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::entity::relationship::{self, ActiveModel, Entity as Relationship};
use crate::error::{AppError, AppResult};
use crate::models::ProductPair;

use super::DbPool;

impl DbPool {
    /// Insert a relationship, rejecting a second one of the same type for the same pair.
    pub async fn insert_relationship(
        &self,
        pair: ProductPair,
        relationship_type: &str,
    ) -> AppResult<relationship::Model> {
        if self
            .find_relationship_by_pair(pair, relationship_type)
            .await?
            .is_some()
        {
            return Err(duplicate_relationship(relationship_type));
        }

        self.insert_relationship_row(pair, relationship_type).await
    }

    /// Insert without the pre-check; the unique index still rejects duplicates.
    async fn insert_relationship_row(
        &self,
        pair: ProductPair,
        relationship_type: &str,
    ) -> AppResult<relationship::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            product_a_id: Set(pair.first),
            product_b_id: Set(pair.second),
            relationship_type: Set(relationship_type.to_string()),
            created_at: Set(Utc::now()),
        };

        let result = model.insert(self.connection()).await.map_err(|e| {
            // A concurrent create won the race past the pre-check
            if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                duplicate_relationship(relationship_type)
            } else {
                AppError::Storage(format!("Failed to insert relationship: {}", e))
            }
        })?;

        Ok(result)
    }

    /// Find the relationship of `relationship_type` between the pair, if any.
    pub async fn find_relationship_by_pair(
        &self,
        pair: ProductPair,
        relationship_type: &str,
    ) -> AppResult<Option<relationship::Model>> {
        let result = Relationship::find()
            .filter(relationship::Column::ProductAId.eq(pair.first))
            .filter(relationship::Column::ProductBId.eq(pair.second))
            .filter(relationship::Column::RelationshipType.eq(relationship_type))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get relationship: {}", e)))?;

        Ok(result)
    }

    /// Get a relationship by ID.
    pub async fn get_relationship_by_id(
        &self,
        id: Uuid,
    ) -> AppResult<Option<relationship::Model>> {
        let result = Relationship::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get relationship: {}", e)))?;

        Ok(result)
    }

    /// Relationships of `relationship_type` that include `product_id`.
    pub async fn get_relationships_for_product(
        &self,
        product_id: Uuid,
        relationship_type: &str,
    ) -> AppResult<Vec<relationship::Model>> {
        let result = Relationship::find()
            .filter(relationship::Column::RelationshipType.eq(relationship_type))
            .filter(
                Condition::any()
                    .add(relationship::Column::ProductAId.eq(product_id))
                    .add(relationship::Column::ProductBId.eq(product_id)),
            )
            .order_by_asc(relationship::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get relationships: {}", e)))?;

        Ok(result)
    }
}

fn duplicate_relationship(relationship_type: &str) -> AppError {
    AppError::Validation(format!(
        "A {} relationship already exists for the given products",
        relationship_type
    ))
}
