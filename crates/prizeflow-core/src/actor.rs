//! Gateway-injected actor headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use prizeflow_domain::actor::ActorRole;

pub const ACTOR_ID_HEADER: &str = "x-prizeflow-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-prizeflow-actor-role";

/// Back-office actor injected by the gateway via `x-prizeflow-actor-id` and
/// `x-prizeflow-actor-role` headers.
///
/// Returns 401 if either header is absent or unparseable.
/// Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone)]
pub struct ActorHeaders {
    pub actor_id: Uuid,
    pub role: ActorRole,
}

impl<S> FromRequestParts<S> for ActorHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract values synchronously and return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let actor_id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        let role = parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u8>().ok())
            .and_then(ActorRole::from_u8);

        async move {
            let actor_id = actor_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let role = role.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { actor_id, role })
        }
    }
}
