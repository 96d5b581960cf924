//! Mock actor helpers for HTTP tests.
//!
//! Admin routes receive `x-prizeflow-actor-id` + `x-prizeflow-actor-role` headers
//! injected by the gateway. In tests, `MockActor` produces these headers directly
//! so no real gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use prizeflow_core::actor::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};
use prizeflow_domain::actor::ActorRole;

/// Configurable identity injected into test requests.
pub struct MockActor {
    pub actor_id: Uuid,
    pub role: ActorRole,
}

impl MockActor {
    pub fn new(actor_id: Uuid, role: ActorRole) -> Self {
        Self { actor_id, role }
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), ActorRole::Admin)
    }

    pub fn viewer() -> Self {
        Self::new(Uuid::new_v4(), ActorRole::Viewer)
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(ACTOR_ID_HEADER),
            HeaderValue::from_str(&self.actor_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(ACTOR_ROLE_HEADER),
            HeaderValue::from(u16::from(self.role.as_u8())),
        );
        map
    }
}
