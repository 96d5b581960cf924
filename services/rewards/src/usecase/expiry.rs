use chrono::Utc;
use tracing::info;

use crate::domain::repository::AwardRepository;
use crate::error::RewardsServiceError;

/// Moves every overdue `awarded` award to `expired`.
pub struct ExpireAwardsUseCase<A>
where
    A: AwardRepository,
{
    pub awards: A,
}

impl<A> ExpireAwardsUseCase<A>
where
    A: AwardRepository,
{
    pub async fn execute(&self) -> Result<u64, RewardsServiceError> {
        let expired = self.awards.expire_overdue(Utc::now()).await?;
        if expired > 0 {
            info!(expired, "expired overdue awards");
        }
        Ok(expired)
    }
}
