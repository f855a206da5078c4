//! Relationship entity for SeaORM.
//!
//! A relationship joins two distinct products. The pair is stored with the
//! smaller product id in `product_a_id`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "relationships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_a_id: Uuid,
    pub product_b_id: Uuid,
    pub relationship_type: String,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Both member product ids.
    pub fn members(&self) -> [Uuid; 2] {
        [self.product_a_id, self.product_b_id]
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductAId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    ProductA,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductBId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    ProductB,
    #[sea_orm(has_many = "super::results_rule::Entity")]
    Rules,
}

impl Related<super::results_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
