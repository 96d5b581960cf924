use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::repository::PrizeRepository;
use crate::domain::types::Prize;
use crate::error::RewardsServiceError;

/// Picks prizes out of a pool and takes stock from them.
///
/// Picking is deterministic: the allocatable prize with the lowest id wins.
/// Taking stock is the only contention point and is delegated to a single
/// conditional write in storage.
pub struct PrizeAllocator<P>
where
    P: PrizeRepository,
{
    pub prizes: P,
}

impl<P> PrizeAllocator<P>
where
    P: PrizeRepository,
{
    pub async fn pick_next(
        &self,
        pool_id: Uuid,
        type_id: Option<Uuid>,
    ) -> Result<Option<Prize>, RewardsServiceError> {
        self.prizes.pick_next(pool_id, type_id, Utc::now()).await
    }

    /// Returns `false` when the prize had no stock left at the moment of the write.
    pub async fn decrement(&self, prize_id: Uuid) -> Result<bool, RewardsServiceError> {
        let taken = self.prizes.decrement(prize_id).await?;
        if !taken {
            debug!(prize_id = %prize_id, "no stock left to decrement");
        }
        Ok(taken)
    }
}
