use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use prizeflow_domain::award::{AwardMethod, AwardStatus};
use prizeflow_domain::notification::{NotificationChannel, NotificationStatus};
use prizeflow_domain::otp::OtpPurpose;
use prizeflow_domain::phone::Phone;
use prizeflow_rewards::domain::repository::{
    AwardRepository, DirectoryPort, OtpRepository, OtpThrottle, PrizeRepository,
    SmsMessageRepository, SmsTransport,
};
use prizeflow_rewards::domain::types::{
    Competition, DirectoryUser, OneTimePassword, OtpSettings, Prize, PrizeAward, PrizeRedemption,
    SmsMessage,
};
use prizeflow_rewards::error::RewardsServiceError;
use prizeflow_rewards::usecase::allocator::PrizeAllocator;
use prizeflow_rewards::usecase::award::{AwardPrizeUseCase, BulkAwardUseCase};
use prizeflow_rewards::usecase::notification::NotificationDispatcher;
use prizeflow_rewards::usecase::otp::OtpEngine;
use prizeflow_rewards::usecase::redemption::{
    CompleteRedemptionUseCase, InitiateRedemptionUseCase,
};

pub const PHONE: &str = "+15551234567";
pub const OTHER_PHONE: &str = "+15559876543";

pub fn phone() -> Phone {
    Phone::parse(PHONE).unwrap()
}

pub fn other_phone() -> Phone {
    Phone::parse(OTHER_PHONE).unwrap()
}

pub fn pool_id() -> Uuid {
    Uuid::from_u128(0xA000)
}

pub fn test_prize(id: u128, remaining: i32) -> Prize {
    Prize {
        id: Uuid::from_u128(id),
        pool_id: pool_id(),
        type_id: None,
        name: format!("Prize {id}"),
        monetary_value_cents: Some(5_000),
        total_quantity: remaining.max(1),
        remaining_quantity: remaining,
        expiry_date: None,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn test_award(prize_id: Uuid, phone: &str) -> PrizeAward {
    PrizeAward {
        id: Uuid::new_v4(),
        prize_id,
        external_user_id: Some(Uuid::new_v4()),
        phone: phone.to_owned(),
        competition_id: None,
        awarded_at: Utc::now(),
        awarded_by: None,
        method: AwardMethod::Manual,
        notification_channel: None,
        notification_status: NotificationStatus::NotRequired,
        status: AwardStatus::Awarded,
        expiry_date: None,
        external_reference: None,
        cancelled_at: None,
        cancelled_by: None,
        cancellation_reason: None,
    }
}

// ── MockPrizeRepo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockPrizeRepo {
    pub prizes: Arc<Mutex<Vec<Prize>>>,
}

impl MockPrizeRepo {
    pub fn new(prizes: Vec<Prize>) -> Self {
        Self {
            prizes: Arc::new(Mutex::new(prizes)),
        }
    }

    pub fn remaining(&self, id: Uuid) -> i32 {
        self.prizes
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.remaining_quantity)
            .unwrap()
    }
}

impl PrizeRepository for MockPrizeRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Prize>, RewardsServiceError> {
        Ok(self.prizes.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Prize>, RewardsServiceError> {
        Ok(self
            .prizes
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn pick_next(
        &self,
        pool_id: Uuid,
        type_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Option<Prize>, RewardsServiceError> {
        Ok(self
            .prizes
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.pool_id == pool_id)
            .filter(|p| type_id.is_none() || p.type_id == type_id)
            .filter(|p| p.is_allocatable_at(now))
            .min_by_key(|p| p.id)
            .cloned())
    }

    async fn decrement(&self, id: Uuid) -> Result<bool, RewardsServiceError> {
        let mut prizes = self.prizes.lock().unwrap();
        match prizes.iter_mut().find(|p| p.id == id) {
            Some(p) if p.remaining_quantity > 0 => {
                p.remaining_quantity -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ── MockAwardRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAwardRepo {
    pub awards: Arc<Mutex<Vec<PrizeAward>>>,
    pub redemptions: Arc<Mutex<Vec<PrizeRedemption>>>,
}

impl MockAwardRepo {
    pub fn new(awards: Vec<PrizeAward>) -> Self {
        Self {
            awards: Arc::new(Mutex::new(awards)),
            redemptions: Arc::default(),
        }
    }

    pub fn get(&self, id: Uuid) -> PrizeAward {
        self.awards
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .unwrap()
    }
}

impl AwardRepository for MockAwardRepo {
    async fn create(&self, award: &PrizeAward) -> Result<(), RewardsServiceError> {
        self.awards.lock().unwrap().push(award.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PrizeAward>, RewardsServiceError> {
        Ok(self.awards.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn list_redeemable(
        &self,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<PrizeAward>, RewardsServiceError> {
        Ok(self
            .awards
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.phone == phone && a.is_redeemable_at(now))
            .cloned()
            .collect())
    }

    async fn update_notification_status(
        &self,
        id: Uuid,
        status: NotificationStatus,
    ) -> Result<(), RewardsServiceError> {
        if let Some(a) = self.awards.lock().unwrap().iter_mut().find(|a| a.id == id) {
            a.notification_status = status;
        }
        Ok(())
    }

    async fn cancel(
        &self,
        id: Uuid,
        actor_id: Option<Uuid>,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, RewardsServiceError> {
        let mut awards = self.awards.lock().unwrap();
        match awards
            .iter_mut()
            .find(|a| a.id == id && a.status == AwardStatus::Awarded)
        {
            Some(a) => {
                a.status = AwardStatus::Cancelled;
                a.cancelled_at = Some(at);
                a.cancelled_by = actor_id;
                a.cancellation_reason = Some(reason.to_owned());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn redeem(&self, redemption: &PrizeRedemption) -> Result<bool, RewardsServiceError> {
        let mut awards = self.awards.lock().unwrap();
        match awards
            .iter_mut()
            .find(|a| a.id == redemption.prize_award_id && a.status == AwardStatus::Awarded)
        {
            Some(a) => {
                a.status = AwardStatus::Redeemed;
                self.redemptions.lock().unwrap().push(redemption.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_redemption(
        &self,
        award_id: Uuid,
    ) -> Result<Option<PrizeRedemption>, RewardsServiceError> {
        Ok(self
            .redemptions
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.prize_award_id == award_id)
            .cloned())
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, RewardsServiceError> {
        let mut count = 0;
        for a in self.awards.lock().unwrap().iter_mut() {
            if a.status == AwardStatus::Awarded && a.is_expired_at(now) {
                a.status = AwardStatus::Expired;
                count += 1;
            }
        }
        Ok(count)
    }
}

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOtpRepo {
    pub otps: Arc<Mutex<Vec<OneTimePassword>>>,
}

impl MockOtpRepo {
    /// Newest unused code for `(phone, purpose)`.
    pub fn latest_code(&self, phone: &str, purpose: OtpPurpose) -> Option<String> {
        self.otps
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.phone == phone && o.purpose == purpose && o.used_at.is_none())
            .max_by_key(|o| o.created_at)
            .map(|o| o.code.clone())
    }

    pub fn unused_count(&self, phone: &str, purpose: OtpPurpose) -> usize {
        self.otps
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.phone == phone && o.purpose == purpose && o.used_at.is_none())
            .count()
    }
}

impl OtpRepository for MockOtpRepo {
    async fn create(&self, otp: &OneTimePassword) -> Result<(), RewardsServiceError> {
        self.otps.lock().unwrap().push(otp.clone());
        Ok(())
    }

    async fn invalidate_active(
        &self,
        phone: &str,
        purpose: OtpPurpose,
    ) -> Result<u64, RewardsServiceError> {
        let now = Utc::now();
        let mut count = 0;
        for o in self.otps.lock().unwrap().iter_mut() {
            if o.phone == phone && o.purpose == purpose && o.used_at.is_none() {
                o.used_at = Some(now);
                count += 1;
            }
        }
        Ok(count)
    }

    async fn find_latest_unused(
        &self,
        phone: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OneTimePassword>, RewardsServiceError> {
        Ok(self
            .otps
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.phone == phone && o.purpose == purpose && o.used_at.is_none())
            .max_by_key(|o| o.created_at)
            .cloned())
    }

    async fn reserve_attempt(&self, id: Uuid) -> Result<Option<i32>, RewardsServiceError> {
        let mut otps = self.otps.lock().unwrap();
        match otps.iter_mut().find(|o| {
            o.id == id && o.used_at.is_none() && o.attempt_count < o.max_attempts
        }) {
            Some(o) => {
                o.attempt_count += 1;
                Ok(Some(o.attempt_count))
            }
            None => Ok(None),
        }
    }

    async fn mark_used(&self, id: Uuid) -> Result<bool, RewardsServiceError> {
        let mut otps = self.otps.lock().unwrap();
        match otps.iter_mut().find(|o| o.id == id && o.used_at.is_none()) {
            Some(o) => {
                o.used_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockThrottle ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockThrottle {
    pub allow: bool,
}

impl OtpThrottle for MockThrottle {
    async fn try_acquire(
        &self,
        _phone: &str,
        _purpose: OtpPurpose,
    ) -> Result<bool, RewardsServiceError> {
        Ok(self.allow)
    }
}

// ── MockSmsMessageRepo ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSmsMessageRepo {
    pub messages: Arc<Mutex<Vec<SmsMessage>>>,
}

impl SmsMessageRepository for MockSmsMessageRepo {
    async fn create(&self, message: &SmsMessage) -> Result<(), RewardsServiceError> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn update(&self, message: &SmsMessage) -> Result<(), RewardsServiceError> {
        let mut messages = self.messages.lock().unwrap();
        let stored = messages.iter_mut().find(|m| m.id == message.id).unwrap();
        *stored = message.clone();
        Ok(())
    }
}

// ── MockTransport ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub channel: NotificationChannel,
    pub phone: String,
    pub body: String,
}

/// Fails the first `failures` sends, then succeeds.
#[derive(Clone, Default)]
pub struct MockTransport {
    pub failures: Arc<AtomicU32>,
    pub attempts: Arc<AtomicU32>,
    pub sent: Arc<Mutex<Vec<SentMessage>>>,
}

impl MockTransport {
    pub fn failing(failures: u32) -> Self {
        Self {
            failures: Arc::new(AtomicU32::new(failures)),
            ..Self::default()
        }
    }

    pub fn set_failures(&self, failures: u32) {
        self.failures.store(failures, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl SmsTransport for MockTransport {
    async fn send(
        &self,
        channel: NotificationChannel,
        phone: &str,
        body: &str,
    ) -> anyhow::Result<String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            anyhow::bail!("provider unavailable");
        }
        self.sent.lock().unwrap().push(SentMessage {
            channel,
            phone: phone.to_owned(),
            body: body.to_owned(),
        });
        Ok(format!("ref-{}", Uuid::new_v4()))
    }
}

// ── MockDirectory ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockDirectory {
    pub competitions: Vec<Competition>,
    pub users: Arc<Mutex<HashMap<String, DirectoryUser>>>,
}

impl MockDirectory {
    pub fn with_competition(id: Uuid) -> Self {
        Self {
            competitions: vec![Competition {
                id,
                name: "Spring Draw".to_owned(),
                is_active: true,
            }],
            ..Self::default()
        }
    }
}

impl DirectoryPort for MockDirectory {
    async fn get_or_create_user(
        &self,
        phone: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<DirectoryUser, RewardsServiceError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .entry(phone.to_owned())
            .or_insert_with(|| DirectoryUser {
                id: Uuid::new_v4(),
                phone: phone.to_owned(),
                name: name.map(str::to_owned),
                email: email.map(str::to_owned),
            });
        Ok(user.clone())
    }

    async fn get_competition(&self, id: Uuid) -> Result<Option<Competition>, RewardsServiceError> {
        Ok(self.competitions.iter().find(|c| c.id == id).cloned())
    }
}

// ── TestEngine ───────────────────────────────────────────────────────────────

pub type TestNotifier = NotificationDispatcher<MockSmsMessageRepo, MockTransport>;

pub type TestOtpEngine = OtpEngine<MockOtpRepo, MockThrottle, TestNotifier>;

/// All mocks wired together; clones share state.
#[derive(Clone)]
pub struct TestEngine {
    pub prizes: MockPrizeRepo,
    pub awards: MockAwardRepo,
    pub otps: MockOtpRepo,
    pub messages: MockSmsMessageRepo,
    pub transport: MockTransport,
    pub directory: MockDirectory,
    pub throttle: MockThrottle,
    pub otp_settings: OtpSettings,
}

impl TestEngine {
    pub fn new(prizes: Vec<Prize>) -> Self {
        Self {
            prizes: MockPrizeRepo::new(prizes),
            awards: MockAwardRepo::default(),
            otps: MockOtpRepo::default(),
            messages: MockSmsMessageRepo::default(),
            transport: MockTransport::default(),
            directory: MockDirectory::default(),
            throttle: MockThrottle { allow: true },
            otp_settings: OtpSettings::default(),
        }
    }

    pub fn with_awards(mut self, awards: Vec<PrizeAward>) -> Self {
        self.awards = MockAwardRepo::new(awards);
        self
    }

    pub fn notifier(&self) -> TestNotifier {
        NotificationDispatcher {
            messages: self.messages.clone(),
            transport: self.transport.clone(),
            max_retries: 1,
            retry_backoff: Duration::ZERO,
        }
    }

    pub fn otp_engine(&self) -> TestOtpEngine {
        OtpEngine {
            otps: self.otps.clone(),
            throttle: self.throttle.clone(),
            notifier: self.notifier(),
            settings: self.otp_settings,
        }
    }

    pub fn allocator(&self) -> PrizeAllocator<MockPrizeRepo> {
        PrizeAllocator {
            prizes: self.prizes.clone(),
        }
    }

    pub fn award_usecase(
        &self,
    ) -> AwardPrizeUseCase<MockAwardRepo, MockPrizeRepo, MockDirectory, TestNotifier> {
        AwardPrizeUseCase {
            awards: self.awards.clone(),
            allocator: self.allocator(),
            directory: self.directory.clone(),
            notifier: self.notifier(),
        }
    }

    pub fn bulk_usecase(
        &self,
        max_batch: usize,
    ) -> BulkAwardUseCase<MockAwardRepo, MockPrizeRepo, MockDirectory, TestNotifier> {
        BulkAwardUseCase {
            award: self.award_usecase(),
            max_batch,
        }
    }

    pub fn initiate_usecase(
        &self,
    ) -> InitiateRedemptionUseCase<MockAwardRepo, MockPrizeRepo, TestOtpEngine> {
        InitiateRedemptionUseCase {
            awards: self.awards.clone(),
            prizes: self.prizes.clone(),
            otp: self.otp_engine(),
        }
    }

    pub fn complete_usecase(
        &self,
    ) -> CompleteRedemptionUseCase<MockAwardRepo, MockPrizeRepo, TestOtpEngine, TestNotifier> {
        CompleteRedemptionUseCase {
            awards: self.awards.clone(),
            prizes: self.prizes.clone(),
            otp: self.otp_engine(),
            notifier: self.notifier(),
        }
    }

    pub fn latest_code(&self, phone: &Phone, purpose: OtpPurpose) -> String {
        self.otps
            .latest_code(phone.as_str(), purpose)
            .expect("expected an unused code")
    }
}
