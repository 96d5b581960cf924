use prizeflow_domain::notification::{NotificationChannel, SmsKind, SmsStatus};
use prizeflow_rewards::domain::repository::Notifier;
use prizeflow_rewards::domain::types::DispatchRequest;

use crate::helpers::{MockTransport, PHONE, TestEngine};

fn award_request() -> DispatchRequest {
    DispatchRequest {
        phone: PHONE.to_owned(),
        body: "Congratulations!".to_owned(),
        kind: SmsKind::AwardNotification,
        channel: NotificationChannel::Whatsapp,
        related_entity_type: Some("prize_award"),
        related_entity_id: None,
    }
}

#[tokio::test]
async fn should_record_sent_message_with_provider_reference() {
    let engine = TestEngine::new(vec![]);

    let outcome = engine.notifier().dispatch(award_request()).await.unwrap();

    assert!(outcome.is_sent());
    let messages = engine.messages.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    let logged = &messages[0];
    assert_eq!(logged.id, outcome.message_id);
    assert_eq!(logged.status, SmsStatus::Sent);
    assert!(logged.sent_at.is_some());
    assert_eq!(logged.provider_reference, outcome.provider_reference);
    assert_eq!(logged.retry_count, 0);
    assert_eq!(engine.transport.sent()[0].channel, NotificationChannel::Whatsapp);
}

#[tokio::test]
async fn should_retry_once_then_succeed() {
    let mut engine = TestEngine::new(vec![]);
    engine.transport = MockTransport::failing(1);

    let outcome = engine.notifier().dispatch(award_request()).await.unwrap();

    assert!(outcome.is_sent());
    assert_eq!(engine.transport.attempts(), 2);
    let messages = engine.messages.messages.lock().unwrap();
    assert_eq!(messages[0].retry_count, 1);
    assert_eq!(messages[0].status, SmsStatus::Sent);
}

#[tokio::test]
async fn should_record_failure_without_erroring() {
    let mut engine = TestEngine::new(vec![]);
    engine.transport = MockTransport::failing(5);

    let outcome = engine.notifier().dispatch(award_request()).await.unwrap();

    assert!(!outcome.is_sent());
    assert_eq!(outcome.status, SmsStatus::Failed);
    let messages = engine.messages.messages.lock().unwrap();
    let logged = &messages[0];
    assert_eq!(logged.status, SmsStatus::Failed);
    assert!(logged.sent_at.is_none());
    assert_eq!(
        logged.failure_reason.as_deref(),
        Some("provider unavailable")
    );
}
