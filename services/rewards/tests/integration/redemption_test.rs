use chrono::{Duration, Utc};
use uuid::Uuid;

use prizeflow_domain::award::AwardStatus;
use prizeflow_domain::notification::SmsKind;
use prizeflow_domain::otp::OtpPurpose;
use prizeflow_domain::phone::Phone;
use prizeflow_rewards::domain::repository::OneTimePasswords;
use prizeflow_rewards::domain::types::PrizeAward;
use prizeflow_rewards::error::RewardsServiceError;
use prizeflow_rewards::usecase::award::GetAwardUseCase;
use prizeflow_rewards::usecase::redemption::{CompleteRedemptionInput, InitiateRedemptionInput};

use crate::helpers::{
    MockThrottle, MockTransport, OTHER_PHONE, PHONE, TestEngine, other_phone, phone, test_award,
    test_prize,
};

fn complete_input(phone: Phone, otp: &str, award_id: Uuid) -> CompleteRedemptionInput {
    CompleteRedemptionInput {
        phone,
        otp: otp.to_owned(),
        award_id,
        channel: "web".to_owned(),
        notes: Some("collected at kiosk 4".to_owned()),
        from_ip: Some("203.0.113.9".to_owned()),
    }
}

/// One prize and one live award on [`PHONE`].
fn engine_with_award() -> (TestEngine, PrizeAward) {
    let award = test_award(Uuid::from_u128(1), PHONE);
    let engine = TestEngine::new(vec![test_prize(1, 4)]).with_awards(vec![award.clone()]);
    (engine, award)
}

async fn initiate(engine: &TestEngine, award_id: Option<Uuid>) -> String {
    engine
        .initiate_usecase()
        .execute(InitiateRedemptionInput {
            phone: phone(),
            award_id,
        })
        .await
        .unwrap();
    engine.latest_code(&phone(), OtpPurpose::Redemption)
}

/// Issues a redemption code directly; initiate refuses once nothing is redeemable.
async fn issue_code(engine: &TestEngine) -> String {
    engine
        .otp_engine()
        .send(&phone(), OtpPurpose::Redemption, None)
        .await
        .unwrap();
    engine.latest_code(&phone(), OtpPurpose::Redemption)
}

// ── Initiate ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_not_send_code_when_nothing_is_redeemable() {
    let mut redeemed = test_award(Uuid::from_u128(1), PHONE);
    redeemed.status = AwardStatus::Redeemed;
    let mut lapsed = test_award(Uuid::from_u128(1), PHONE);
    lapsed.expiry_date = Some(Utc::now() - Duration::minutes(1));
    let engine = TestEngine::new(vec![test_prize(1, 0)]).with_awards(vec![redeemed, lapsed]);

    let result = engine
        .initiate_usecase()
        .execute(InitiateRedemptionInput {
            phone: phone(),
            award_id: None,
        })
        .await
        .unwrap();

    assert!(!result.requires_otp);
    assert!(result.redeemable_prizes.is_empty());
    assert_eq!(result.otp_expires_in_seconds, None);
    assert!(engine.transport.sent().is_empty());
    assert_eq!(engine.otps.unused_count(PHONE, OtpPurpose::Redemption), 0);
}

#[tokio::test]
async fn should_list_redeemable_prizes_and_send_code() {
    let (engine, award) = engine_with_award();
    let elsewhere = test_award(Uuid::from_u128(1), OTHER_PHONE);
    engine.awards.awards.lock().unwrap().push(elsewhere);

    let result = engine
        .initiate_usecase()
        .execute(InitiateRedemptionInput {
            phone: phone(),
            award_id: None,
        })
        .await
        .unwrap();

    assert!(result.requires_otp);
    assert_eq!(result.otp_expires_in_seconds, Some(300));
    assert_eq!(result.redeemable_prizes.len(), 1);
    let listed = &result.redeemable_prizes[0];
    assert_eq!(listed.award_id, award.id);
    assert_eq!(listed.prize_name, "Prize 1");
    assert_eq!(listed.monetary_value_cents, Some(5_000));

    let sent = engine.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].phone, PHONE);
    assert_eq!(engine.otps.unused_count(PHONE, OtpPurpose::Redemption), 1);
}

#[tokio::test]
async fn should_reject_unknown_award_when_narrowing() {
    let (engine, _award) = engine_with_award();

    let result = engine
        .initiate_usecase()
        .execute(InitiateRedemptionInput {
            phone: phone(),
            award_id: Some(Uuid::new_v4()),
        })
        .await;

    assert!(
        matches!(result, Err(RewardsServiceError::AwardNotAvailable)),
        "expected AwardNotAvailable, got {result:?}"
    );
    assert!(engine.transport.sent().is_empty());
}

#[tokio::test]
async fn should_not_narrow_to_someone_elses_award() {
    let (engine, award) = engine_with_award();

    let result = engine
        .initiate_usecase()
        .execute(InitiateRedemptionInput {
            phone: other_phone(),
            award_id: Some(award.id),
        })
        .await;

    assert!(matches!(result, Err(RewardsServiceError::AwardNotAvailable)));
}

#[tokio::test]
async fn should_surface_resend_cooldown() {
    let (mut engine, _award) = engine_with_award();
    engine.throttle = MockThrottle { allow: false };

    let result = engine
        .initiate_usecase()
        .execute(InitiateRedemptionInput {
            phone: phone(),
            award_id: None,
        })
        .await;

    assert!(
        matches!(result, Err(RewardsServiceError::OtpThrottled)),
        "expected OtpThrottled, got {result:?}"
    );
    assert!(engine.transport.sent().is_empty());
}

#[tokio::test]
async fn should_surface_code_delivery_failure() {
    let (mut engine, _award) = engine_with_award();
    engine.transport = MockTransport::failing(10);

    let result = engine
        .initiate_usecase()
        .execute(InitiateRedemptionInput {
            phone: phone(),
            award_id: None,
        })
        .await;

    assert!(
        matches!(result, Err(RewardsServiceError::OtpDeliveryFailed)),
        "expected OtpDeliveryFailed, got {result:?}"
    );
}

// ── Complete ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_redeem_with_valid_code() {
    let (engine, award) = engine_with_award();
    let code = initiate(&engine, Some(award.id)).await;

    let completion = engine
        .complete_usecase()
        .execute(complete_input(phone(), &code, award.id))
        .await
        .unwrap();

    assert!(completion.redemption_code.starts_with("RDM-"));
    assert_eq!(completion.redemption_code.len(), 14);
    assert_eq!(completion.message, "Prize redeemed successfully");
    assert_eq!(engine.awards.get(award.id).status, AwardStatus::Redeemed);

    let redemptions = engine.awards.redemptions.lock().unwrap().clone();
    assert_eq!(redemptions.len(), 1);
    assert_eq!(redemptions[0].channel, "web");
    assert_eq!(redemptions[0].from_ip.as_deref(), Some("203.0.113.9"));

    let sent = engine.transport.sent();
    let confirmation = sent.last().unwrap();
    assert!(
        confirmation.body.contains(&completion.redemption_code),
        "got {}",
        confirmation.body
    );
    let messages = engine.messages.messages.lock().unwrap();
    assert_eq!(messages.last().unwrap().kind, SmsKind::RedemptionConfirmation);
}

#[tokio::test]
async fn should_expose_redemption_on_award_details() {
    let (engine, award) = engine_with_award();
    let code = initiate(&engine, None).await;
    let completion = engine
        .complete_usecase()
        .execute(complete_input(phone(), &code, award.id))
        .await
        .unwrap();

    let details = GetAwardUseCase {
        awards: engine.awards.clone(),
    }
    .execute(award.id)
    .await
    .unwrap();

    assert_eq!(details.award.status, AwardStatus::Redeemed);
    let redemption = details.redemption.unwrap();
    assert_eq!(redemption.id, completion.redemption_id);
    assert_eq!(redemption.redemption_code, completion.redemption_code);
}

#[tokio::test]
async fn should_keep_redemption_when_confirmation_fails() {
    let (engine, award) = engine_with_award();
    let code = initiate(&engine, Some(award.id)).await;
    engine.transport.set_failures(10);

    let completion = engine
        .complete_usecase()
        .execute(complete_input(phone(), &code, award.id))
        .await;

    assert!(completion.is_ok(), "got {completion:?}");
    assert_eq!(engine.awards.get(award.id).status, AwardStatus::Redeemed);
}

#[tokio::test]
async fn should_redeem_award_only_once() {
    let (engine, award) = engine_with_award();
    let code = initiate(&engine, Some(award.id)).await;
    engine
        .complete_usecase()
        .execute(complete_input(phone(), &code, award.id))
        .await
        .unwrap();

    // A fresh code must not open a second redemption either.
    let code = issue_code(&engine).await;
    let second = engine
        .complete_usecase()
        .execute(complete_input(phone(), &code, award.id))
        .await;

    assert!(second.is_err(), "second redemption must fail");
    assert_eq!(engine.awards.redemptions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_award_owned_by_another_phone() {
    let (engine, _award) = engine_with_award();
    let foreign = test_award(Uuid::from_u128(1), OTHER_PHONE);
    engine.awards.awards.lock().unwrap().push(foreign.clone());
    let code = issue_code(&engine).await;

    let result = engine
        .complete_usecase()
        .execute(complete_input(phone(), &code, foreign.id))
        .await;

    assert!(
        matches!(result, Err(RewardsServiceError::AwardNotOwned)),
        "expected AwardNotOwned, got {result:?}"
    );
    assert_eq!(engine.awards.get(foreign.id).status, AwardStatus::Awarded);
}

#[tokio::test]
async fn should_reject_expired_award() {
    let mut award = test_award(Uuid::from_u128(1), PHONE);
    award.expiry_date = Some(Utc::now() - Duration::minutes(1));
    let engine = TestEngine::new(vec![test_prize(1, 0)]).with_awards(vec![award.clone()]);
    let code = issue_code(&engine).await;

    let result = engine
        .complete_usecase()
        .execute(complete_input(phone(), &code, award.id))
        .await;

    assert!(
        matches!(result, Err(RewardsServiceError::AwardExpired)),
        "expected AwardExpired, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_cancelled_award() {
    let mut award = test_award(Uuid::from_u128(1), PHONE);
    award.status = AwardStatus::Cancelled;
    let engine = TestEngine::new(vec![test_prize(1, 0)]).with_awards(vec![award.clone()]);
    let code = issue_code(&engine).await;

    let result = engine
        .complete_usecase()
        .execute(complete_input(phone(), &code, award.id))
        .await;

    assert!(
        matches!(
            result,
            Err(RewardsServiceError::AwardNotRedeemable(AwardStatus::Cancelled))
        ),
        "expected AwardNotRedeemable, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_remaining_attempts_on_wrong_code() {
    let (engine, award) = engine_with_award();
    let code = initiate(&engine, Some(award.id)).await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let result = engine
        .complete_usecase()
        .execute(complete_input(phone(), wrong, award.id))
        .await;

    match result {
        Err(RewardsServiceError::InvalidOtp {
            remaining_attempts, ..
        }) => assert_eq!(remaining_attempts, Some(2)),
        other => panic!("expected InvalidOtp, got {other:?}"),
    }
    assert_eq!(engine.awards.get(award.id).status, AwardStatus::Awarded);
}

#[tokio::test]
async fn should_require_code_before_touching_award() {
    let (engine, award) = engine_with_award();

    let result = engine
        .complete_usecase()
        .execute(complete_input(phone(), "   ", award.id))
        .await;

    assert!(
        matches!(result, Err(RewardsServiceError::InvalidInput(_))),
        "expected InvalidInput, got {result:?}"
    );
}
