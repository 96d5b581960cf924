use sea_orm::entity::prelude::*;

/// Redemption of an award. At most one row per award (`prize_award_id` is unique);
/// immutable once written.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "prize_redemptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub prize_award_id: Uuid,
    #[sea_orm(unique)]
    pub redemption_code: String,
    pub redeemed_at: chrono::DateTime<chrono::Utc>,
    pub channel: String,
    pub from_ip: Option<String>,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prize_awards::Entity",
        from = "Column::PrizeAwardId",
        to = "super::prize_awards::Column::Id"
    )]
    PrizeAward,
}

impl Related<super::prize_awards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrizeAward.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
