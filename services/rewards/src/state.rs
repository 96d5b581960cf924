use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::domain::types::EngineSettings;
use crate::infra::cache::RedisOtpThrottle;
use crate::infra::db::{
    DbAwardRepository, DbOtpRepository, DbPrizeRepository, DbSmsMessageRepository,
};
use crate::infra::grpc::GrpcDirectoryPort;
use crate::infra::sms::HttpSmsTransport;
use crate::usecase::allocator::PrizeAllocator;
use crate::usecase::notification::NotificationDispatcher;
use crate::usecase::otp::OtpEngine;

pub type AppNotifier = NotificationDispatcher<DbSmsMessageRepository, HttpSmsTransport>;

pub type AppOtpEngine = OtpEngine<DbOtpRepository, RedisOtpThrottle, AppNotifier>;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub directory: GrpcDirectoryPort,
    pub sms: HttpSmsTransport,
    pub settings: EngineSettings,
}

impl AppState {
    pub fn prize_repo(&self) -> DbPrizeRepository {
        DbPrizeRepository {
            db: self.db.clone(),
        }
    }

    pub fn award_repo(&self) -> DbAwardRepository {
        DbAwardRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn sms_message_repo(&self) -> DbSmsMessageRepository {
        DbSmsMessageRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_throttle(&self) -> RedisOtpThrottle {
        RedisOtpThrottle {
            pool: self.redis.clone(),
            cooldown_secs: self.settings.otp_resend_cooldown_secs,
        }
    }

    pub fn allocator(&self) -> PrizeAllocator<DbPrizeRepository> {
        PrizeAllocator {
            prizes: self.prize_repo(),
        }
    }

    pub fn notifier(&self) -> AppNotifier {
        NotificationDispatcher {
            messages: self.sms_message_repo(),
            transport: self.sms.clone(),
            max_retries: self.settings.sms_max_retries,
            retry_backoff: self.settings.sms_retry_backoff,
        }
    }

    pub fn otp_engine(&self) -> AppOtpEngine {
        OtpEngine {
            otps: self.otp_repo(),
            throttle: self.otp_throttle(),
            notifier: self.notifier(),
            settings: self.settings.otp,
        }
    }
}
