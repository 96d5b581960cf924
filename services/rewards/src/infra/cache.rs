use deadpool_redis::Pool;
use deadpool_redis::redis::{self, RedisError};

use prizeflow_domain::otp::OtpPurpose;

use crate::domain::repository::OtpThrottle;
use crate::error::RewardsServiceError;

#[derive(Clone)]
pub struct RedisOtpThrottle {
    pub pool: Pool,
    /// 0 disables the cooldown.
    pub cooldown_secs: u64,
}

fn cooldown_key(phone: &str, purpose: OtpPurpose) -> String {
    format!("otp_cooldown:{}:{}", purpose.as_str(), phone)
}

impl OtpThrottle for RedisOtpThrottle {
    async fn try_acquire(
        &self,
        phone: &str,
        purpose: OtpPurpose,
    ) -> Result<bool, RewardsServiceError> {
        if self.cooldown_secs == 0 {
            return Ok(true);
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| RewardsServiceError::Internal(e.into()))?;
        // SET NX EX: the first sender in a window gets "OK", everyone else nil.
        let reply: Option<String> = redis::cmd("SET")
            .arg(cooldown_key(phone, purpose))
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(self.cooldown_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e: RedisError| RewardsServiceError::Internal(e.into()))?;
        Ok(reply.is_some())
    }
}

/// Round trip to Redis through the pool.
pub async fn ping(pool: &Pool) -> anyhow::Result<()> {
    let mut conn = pool.get().await?;
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(())
}
