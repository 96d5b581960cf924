use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use prizeflow_domain::notification::SmsStatus;
use prizeflow_domain::phone::mask_phone;

use crate::domain::repository::{Notifier, SmsMessageRepository, SmsTransport};
use crate::domain::types::{DispatchOutcome, DispatchRequest, SmsMessage};
use crate::error::RewardsServiceError;

/// Delivers a message through the transport and keeps the `sms_messages` log in step.
///
/// Every dispatch is logged as `pending` before the first attempt. Transport
/// failures are retried up to `max_retries` extra times and then recorded as
/// `failed`; they never surface as errors. Only log writes can fail the call.
pub struct NotificationDispatcher<S, T>
where
    S: SmsMessageRepository,
    T: SmsTransport,
{
    pub messages: S,
    pub transport: T,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl<S, T> Notifier for NotificationDispatcher<S, T>
where
    S: SmsMessageRepository,
    T: SmsTransport,
{
    async fn dispatch(
        &self,
        request: DispatchRequest,
    ) -> Result<DispatchOutcome, RewardsServiceError> {
        let mut message = SmsMessage {
            id: Uuid::now_v7(),
            phone: request.phone,
            body: request.body,
            kind: request.kind,
            related_entity_type: request.related_entity_type.map(str::to_owned),
            related_entity_id: request.related_entity_id,
            status: SmsStatus::Pending,
            created_at: Utc::now(),
            sent_at: None,
            provider_reference: None,
            failure_reason: None,
            retry_count: 0,
        };
        self.messages.create(&message).await?;

        let mut retries = 0u32;
        loop {
            match self
                .transport
                .send(request.channel, &message.phone, &message.body)
                .await
            {
                Ok(reference) => {
                    message.status = SmsStatus::Sent;
                    message.sent_at = Some(Utc::now());
                    message.provider_reference = Some(reference);
                    message.failure_reason = None;
                    break;
                }
                Err(e) if retries < self.max_retries => {
                    retries += 1;
                    message.retry_count = retries as i32;
                    warn!(
                        message_id = %message.id,
                        kind = message.kind.as_str(),
                        retry = retries,
                        error = %format!("{e:#}"),
                        "message transport failed, retrying"
                    );
                    if !self.retry_backoff.is_zero() {
                        tokio::time::sleep(self.retry_backoff * retries).await;
                    }
                }
                Err(e) => {
                    message.status = SmsStatus::Failed;
                    message.failure_reason = Some(format!("{e:#}"));
                    break;
                }
            }
        }

        self.messages.update(&message).await?;

        match message.status {
            SmsStatus::Failed => warn!(
                message_id = %message.id,
                phone = %mask_phone(&message.phone),
                kind = message.kind.as_str(),
                retries = message.retry_count,
                "message delivery failed"
            ),
            _ => info!(
                message_id = %message.id,
                phone = %mask_phone(&message.phone),
                kind = message.kind.as_str(),
                channel = request.channel.as_str(),
                "message sent"
            ),
        }

        Ok(DispatchOutcome {
            message_id: message.id,
            status: message.status,
            provider_reference: message.provider_reference,
        })
    }
}
