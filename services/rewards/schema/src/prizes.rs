use sea_orm::entity::prelude::*;

/// A prize held in a pool. `remaining_quantity` is only ever changed by the
/// conditional decrement (`remaining_quantity > 0` guard in the WHERE clause).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "prizes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pool_id: Uuid,
    pub type_id: Option<Uuid>,
    pub name: String,
    /// Descriptive face value in minor units; never moved as money.
    pub monetary_value_cents: Option<i64>,
    pub total_quantity: i32,
    pub remaining_quantity: i32,
    pub expiry_date: Option<chrono::DateTime<chrono::Utc>>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::prize_awards::Entity")]
    PrizeAwards,
}

impl Related<super::prize_awards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrizeAwards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
