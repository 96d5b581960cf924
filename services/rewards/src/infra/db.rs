use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, TransactionTrait, UpdateMany,
};
use uuid::Uuid;

use prizeflow_domain::award::{AwardMethod, AwardStatus};
use prizeflow_domain::notification::{NotificationChannel, NotificationStatus};
use prizeflow_domain::otp::OtpPurpose;
use prizeflow_rewards_schema::{
    one_time_passwords, prize_awards, prize_redemptions, prizes, sms_messages,
};

use crate::domain::repository::{
    AwardRepository, OtpRepository, PrizeRepository, SmsMessageRepository,
};
use crate::domain::types::{
    OneTimePassword, Prize, PrizeAward, PrizeRedemption, RedemptionStatus, SmsMessage,
};
use crate::error::RewardsServiceError;

fn stored<T>(value: &str, parse: fn(&str) -> Option<T>, what: &str) -> Result<T, RewardsServiceError> {
    parse(value).ok_or_else(|| anyhow::anyhow!("unknown {what} in storage: {value}").into())
}

// ── Prize repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPrizeRepository {
    pub db: DatabaseConnection,
}

/// `UPDATE prizes SET remaining_quantity = remaining_quantity - 1
///  WHERE id = $1 AND remaining_quantity > 0`
pub(crate) fn decrement_statement(prize_id: Uuid) -> UpdateMany<prizes::Entity> {
    prizes::Entity::update_many()
        .col_expr(
            prizes::Column::RemainingQuantity,
            Expr::col(prizes::Column::RemainingQuantity).sub(1),
        )
        .filter(prizes::Column::Id.eq(prize_id))
        .filter(prizes::Column::RemainingQuantity.gt(0))
}

impl PrizeRepository for DbPrizeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Prize>, RewardsServiceError> {
        let model = prizes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find prize by id")?;
        Ok(model.map(prize_from_model))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Prize>, RewardsServiceError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = prizes::Entity::find()
            .filter(prizes::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find prizes by ids")?;
        Ok(models.into_iter().map(prize_from_model).collect())
    }

    async fn pick_next(
        &self,
        pool_id: Uuid,
        type_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Option<Prize>, RewardsServiceError> {
        let mut query = prizes::Entity::find()
            .filter(prizes::Column::PoolId.eq(pool_id))
            .filter(prizes::Column::IsActive.eq(true))
            .filter(prizes::Column::RemainingQuantity.gt(0))
            .filter(
                Condition::any()
                    .add(prizes::Column::ExpiryDate.is_null())
                    .add(prizes::Column::ExpiryDate.gt(now)),
            );
        if let Some(type_id) = type_id {
            query = query.filter(prizes::Column::TypeId.eq(type_id));
        }
        let model = query
            .order_by_asc(prizes::Column::Id)
            .one(&self.db)
            .await
            .context("pick next prize")?;
        Ok(model.map(prize_from_model))
    }

    async fn decrement(&self, id: Uuid) -> Result<bool, RewardsServiceError> {
        let result = decrement_statement(id)
            .exec(&self.db)
            .await
            .context("decrement prize stock")?;
        Ok(result.rows_affected == 1)
    }
}

fn prize_from_model(model: prizes::Model) -> Prize {
    Prize {
        id: model.id,
        pool_id: model.pool_id,
        type_id: model.type_id,
        name: model.name,
        monetary_value_cents: model.monetary_value_cents,
        total_quantity: model.total_quantity,
        remaining_quantity: model.remaining_quantity,
        expiry_date: model.expiry_date,
        is_active: model.is_active,
        created_at: model.created_at,
    }
}

// ── Award repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAwardRepository {
    pub db: DatabaseConnection,
}

impl AwardRepository for DbAwardRepository {
    async fn create(&self, award: &PrizeAward) -> Result<(), RewardsServiceError> {
        prize_awards::ActiveModel {
            id: Set(award.id),
            prize_id: Set(award.prize_id),
            external_user_id: Set(award.external_user_id),
            phone: Set(award.phone.clone()),
            competition_id: Set(award.competition_id),
            awarded_at: Set(award.awarded_at),
            awarded_by: Set(award.awarded_by),
            method: Set(award.method.as_str().to_owned()),
            notification_channel: Set(award.notification_channel.map(|c| c.as_str().to_owned())),
            notification_status: Set(award.notification_status.as_str().to_owned()),
            status: Set(award.status.as_str().to_owned()),
            expiry_date: Set(award.expiry_date),
            external_reference: Set(award.external_reference.clone()),
            cancelled_at: Set(award.cancelled_at),
            cancelled_by: Set(award.cancelled_by),
            cancellation_reason: Set(award.cancellation_reason.clone()),
        }
        .insert(&self.db)
        .await
        .context("create prize award")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PrizeAward>, RewardsServiceError> {
        let model = prize_awards::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find prize award by id")?;
        model.map(award_from_model).transpose()
    }

    async fn list_redeemable(
        &self,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<PrizeAward>, RewardsServiceError> {
        let models = prize_awards::Entity::find()
            .filter(prize_awards::Column::Phone.eq(phone))
            .filter(prize_awards::Column::Status.eq(AwardStatus::Awarded.as_str()))
            .filter(
                Condition::any()
                    .add(prize_awards::Column::ExpiryDate.is_null())
                    .add(prize_awards::Column::ExpiryDate.gt(now)),
            )
            .order_by_asc(prize_awards::Column::AwardedAt)
            .all(&self.db)
            .await
            .context("list redeemable awards")?;
        models.into_iter().map(award_from_model).collect()
    }

    async fn update_notification_status(
        &self,
        id: Uuid,
        status: NotificationStatus,
    ) -> Result<(), RewardsServiceError> {
        prize_awards::Entity::update_many()
            .col_expr(
                prize_awards::Column::NotificationStatus,
                Expr::value(status.as_str()),
            )
            .filter(prize_awards::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update award notification status")?;
        Ok(())
    }

    async fn cancel(
        &self,
        id: Uuid,
        actor_id: Option<Uuid>,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, RewardsServiceError> {
        let result = prize_awards::Entity::update_many()
            .col_expr(
                prize_awards::Column::Status,
                Expr::value(AwardStatus::Cancelled.as_str()),
            )
            .col_expr(prize_awards::Column::CancelledAt, Expr::value(at))
            .col_expr(prize_awards::Column::CancelledBy, Expr::value(actor_id))
            .col_expr(
                prize_awards::Column::CancellationReason,
                Expr::value(reason.to_owned()),
            )
            .filter(prize_awards::Column::Id.eq(id))
            .filter(prize_awards::Column::Status.eq(AwardStatus::Awarded.as_str()))
            .exec(&self.db)
            .await
            .context("cancel prize award")?;
        Ok(result.rows_affected == 1)
    }

    async fn redeem(&self, redemption: &PrizeRedemption) -> Result<bool, RewardsServiceError> {
        let redeemed = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let redemption = redemption.clone();
                Box::pin(async move {
                    let flipped = prize_awards::Entity::update_many()
                        .col_expr(
                            prize_awards::Column::Status,
                            Expr::value(AwardStatus::Redeemed.as_str()),
                        )
                        .filter(prize_awards::Column::Id.eq(redemption.prize_award_id))
                        .filter(prize_awards::Column::Status.eq(AwardStatus::Awarded.as_str()))
                        .exec(txn)
                        .await?;
                    if flipped.rows_affected == 0 {
                        return Ok(false);
                    }
                    insert_redemption(txn, &redemption).await?;
                    Ok(true)
                })
            })
            .await
            .context("redeem prize award")?;
        Ok(redeemed)
    }

    async fn find_redemption(
        &self,
        award_id: Uuid,
    ) -> Result<Option<PrizeRedemption>, RewardsServiceError> {
        let model = prize_redemptions::Entity::find()
            .filter(prize_redemptions::Column::PrizeAwardId.eq(award_id))
            .one(&self.db)
            .await
            .context("find redemption by award")?;
        model.map(redemption_from_model).transpose()
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, RewardsServiceError> {
        let result = prize_awards::Entity::update_many()
            .col_expr(
                prize_awards::Column::Status,
                Expr::value(AwardStatus::Expired.as_str()),
            )
            .filter(prize_awards::Column::Status.eq(AwardStatus::Awarded.as_str()))
            .filter(prize_awards::Column::ExpiryDate.is_not_null())
            .filter(prize_awards::Column::ExpiryDate.lte(now))
            .exec(&self.db)
            .await
            .context("expire overdue awards")?;
        Ok(result.rows_affected)
    }
}

async fn insert_redemption(
    txn: &DatabaseTransaction,
    redemption: &PrizeRedemption,
) -> Result<(), sea_orm::DbErr> {
    prize_redemptions::ActiveModel {
        id: Set(redemption.id),
        prize_award_id: Set(redemption.prize_award_id),
        redemption_code: Set(redemption.redemption_code.clone()),
        redeemed_at: Set(redemption.redeemed_at),
        channel: Set(redemption.channel.clone()),
        from_ip: Set(redemption.from_ip.clone()),
        status: Set(redemption.status.as_str().to_owned()),
        notes: Set(redemption.notes.clone()),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn award_from_model(model: prize_awards::Model) -> Result<PrizeAward, RewardsServiceError> {
    Ok(PrizeAward {
        id: model.id,
        prize_id: model.prize_id,
        external_user_id: model.external_user_id,
        competition_id: model.competition_id,
        awarded_at: model.awarded_at,
        awarded_by: model.awarded_by,
        method: stored(&model.method, AwardMethod::parse, "award method")?,
        notification_channel: model
            .notification_channel
            .as_deref()
            .map(|c| stored(c, NotificationChannel::parse, "notification channel"))
            .transpose()?,
        notification_status: stored(
            &model.notification_status,
            NotificationStatus::parse,
            "notification status",
        )?,
        status: stored(&model.status, AwardStatus::parse, "award status")?,
        phone: model.phone,
        expiry_date: model.expiry_date,
        external_reference: model.external_reference,
        cancelled_at: model.cancelled_at,
        cancelled_by: model.cancelled_by,
        cancellation_reason: model.cancellation_reason,
    })
}

fn redemption_from_model(
    model: prize_redemptions::Model,
) -> Result<PrizeRedemption, RewardsServiceError> {
    Ok(PrizeRedemption {
        id: model.id,
        prize_award_id: model.prize_award_id,
        status: stored(&model.status, RedemptionStatus::parse, "redemption status")?,
        redemption_code: model.redemption_code,
        redeemed_at: model.redeemed_at,
        channel: model.channel,
        from_ip: model.from_ip,
        notes: model.notes,
    })
}

// ── OTP repository ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn create(&self, otp: &OneTimePassword) -> Result<(), RewardsServiceError> {
        one_time_passwords::ActiveModel {
            id: Set(otp.id),
            phone: Set(otp.phone.clone()),
            code: Set(otp.code.clone()),
            purpose: Set(otp.purpose.as_str().to_owned()),
            related_entity_id: Set(otp.related_entity_id),
            created_at: Set(otp.created_at),
            expires_at: Set(otp.expires_at),
            used_at: Set(otp.used_at),
            attempt_count: Set(otp.attempt_count),
            max_attempts: Set(otp.max_attempts),
        }
        .insert(&self.db)
        .await
        .context("create one-time password")?;
        Ok(())
    }

    async fn invalidate_active(
        &self,
        phone: &str,
        purpose: OtpPurpose,
    ) -> Result<u64, RewardsServiceError> {
        let result = one_time_passwords::Entity::update_many()
            .col_expr(one_time_passwords::Column::UsedAt, Expr::value(Utc::now()))
            .filter(one_time_passwords::Column::Phone.eq(phone))
            .filter(one_time_passwords::Column::Purpose.eq(purpose.as_str()))
            .filter(one_time_passwords::Column::UsedAt.is_null())
            .exec(&self.db)
            .await
            .context("invalidate active one-time passwords")?;
        Ok(result.rows_affected)
    }

    async fn find_latest_unused(
        &self,
        phone: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OneTimePassword>, RewardsServiceError> {
        let model = one_time_passwords::Entity::find()
            .filter(one_time_passwords::Column::Phone.eq(phone))
            .filter(one_time_passwords::Column::Purpose.eq(purpose.as_str()))
            .filter(one_time_passwords::Column::UsedAt.is_null())
            .order_by_desc(one_time_passwords::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest unused one-time password")?;
        model.map(otp_from_model).transpose()
    }

    async fn reserve_attempt(&self, id: Uuid) -> Result<Option<i32>, RewardsServiceError> {
        let updated = reserve_attempt_statement(id)
            .exec_with_returning(&self.db)
            .await
            .context("reserve one-time password attempt")?;
        Ok(updated.first().map(|m| m.attempt_count))
    }

    async fn mark_used(&self, id: Uuid) -> Result<bool, RewardsServiceError> {
        let result = one_time_passwords::Entity::update_many()
            .col_expr(one_time_passwords::Column::UsedAt, Expr::value(Utc::now()))
            .filter(one_time_passwords::Column::Id.eq(id))
            .filter(one_time_passwords::Column::UsedAt.is_null())
            .exec(&self.db)
            .await
            .context("mark one-time password used")?;
        Ok(result.rows_affected == 1)
    }
}

/// `UPDATE one_time_passwords SET attempt_count = attempt_count + 1
///  WHERE id = $1 AND used_at IS NULL AND attempt_count < max_attempts`
pub(crate) fn reserve_attempt_statement(otp_id: Uuid) -> UpdateMany<one_time_passwords::Entity> {
    one_time_passwords::Entity::update_many()
        .col_expr(
            one_time_passwords::Column::AttemptCount,
            Expr::col(one_time_passwords::Column::AttemptCount).add(1),
        )
        .filter(one_time_passwords::Column::Id.eq(otp_id))
        .filter(one_time_passwords::Column::UsedAt.is_null())
        .filter(
            Expr::col(one_time_passwords::Column::AttemptCount)
                .lt(Expr::col(one_time_passwords::Column::MaxAttempts)),
        )
}

fn otp_from_model(model: one_time_passwords::Model) -> Result<OneTimePassword, RewardsServiceError> {
    Ok(OneTimePassword {
        id: model.id,
        purpose: stored(&model.purpose, OtpPurpose::parse, "otp purpose")?,
        phone: model.phone,
        code: model.code,
        related_entity_id: model.related_entity_id,
        created_at: model.created_at,
        expires_at: model.expires_at,
        used_at: model.used_at,
        attempt_count: model.attempt_count,
        max_attempts: model.max_attempts,
    })
}

// ── SMS message log ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSmsMessageRepository {
    pub db: DatabaseConnection,
}

impl SmsMessageRepository for DbSmsMessageRepository {
    async fn create(&self, message: &SmsMessage) -> Result<(), RewardsServiceError> {
        sms_messages::ActiveModel {
            id: Set(message.id),
            phone: Set(message.phone.clone()),
            body: Set(message.body.clone()),
            kind: Set(message.kind.as_str().to_owned()),
            related_entity_type: Set(message.related_entity_type.clone()),
            related_entity_id: Set(message.related_entity_id),
            status: Set(message.status.as_str().to_owned()),
            created_at: Set(message.created_at),
            sent_at: Set(message.sent_at),
            provider_reference: Set(message.provider_reference.clone()),
            failure_reason: Set(message.failure_reason.clone()),
            retry_count: Set(message.retry_count),
        }
        .insert(&self.db)
        .await
        .context("create sms message")?;
        Ok(())
    }

    async fn update(&self, message: &SmsMessage) -> Result<(), RewardsServiceError> {
        sms_messages::ActiveModel {
            id: Set(message.id),
            status: Set(message.status.as_str().to_owned()),
            sent_at: Set(message.sent_at),
            provider_reference: Set(message.provider_reference.clone()),
            failure_reason: Set(message.failure_reason.clone()),
            retry_count: Set(message.retry_count),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update sms message")?;
        Ok(())
    }
}
