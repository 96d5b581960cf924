use sea_orm::entity::prelude::*;

/// One unit of a prize allocated to a winning phone number.
/// Status moves one way: `awarded` -> `redeemed` | `cancelled` | `expired`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "prize_awards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub prize_id: Uuid,
    pub external_user_id: Option<Uuid>,
    pub phone: String,
    pub competition_id: Option<Uuid>,
    pub awarded_at: chrono::DateTime<chrono::Utc>,
    pub awarded_by: Option<Uuid>,
    pub method: String,
    pub notification_channel: Option<String>,
    pub notification_status: String,
    pub status: String,
    pub expiry_date: Option<chrono::DateTime<chrono::Utc>>,
    pub external_reference: Option<String>,
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub cancelled_by: Option<Uuid>,
    pub cancellation_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prizes::Entity",
        from = "Column::PrizeId",
        to = "super::prizes::Column::Id"
    )]
    Prize,
    #[sea_orm(has_one = "super::prize_redemptions::Entity")]
    PrizeRedemption,
}

impl Related<super::prizes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prize.def()
    }
}

impl Related<super::prize_redemptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrizeRedemption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
