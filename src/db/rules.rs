//! Database queries for results rules.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use crate::entity::results_rule::{self, ActiveModel, Entity as ResultsRule};
use crate::error::{AppError, AppResult};
use crate::models::ScopeSet;

use super::DbPool;

impl DbPool {
    /// Insert a new rule for an existing relationship.
    pub async fn insert_rule(
        &self,
        relationship_id: Uuid,
        expression: &str,
        scopes: &ScopeSet,
    ) -> AppResult<results_rule::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            relationship_id: Set(relationship_id),
            expression: Set(expression.to_string()),
            applies_to: Set(scopes.to_stored()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Storage(format!("Failed to insert rule: {}", e)))?;

        Ok(result)
    }

    /// Get a rule by ID.
    pub async fn get_rule_by_id(&self, id: Uuid) -> AppResult<Option<results_rule::Model>> {
        let result = ResultsRule::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get rule: {}", e)))?;

        Ok(result)
    }
}
