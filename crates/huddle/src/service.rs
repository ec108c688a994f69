use async_trait::async_trait;
use huddleproto::{Device, DeviceId, Session, SessionDevice, SessionId, WaitForSessionResponse};

use crate::error::{Result, SubscribeError};
use crate::relay::Subscription;

/// Operations offered by the session service.
///
/// `SessionClient` implements this over gRPC. Code that only needs the
/// operations (the CLI commands, for one) should be generic over this trait
/// so it can run against `MockSessionService`.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Create a session with the given devices admitted.
    async fn create(&self, name: &str, device_ids: &[DeviceId]) -> Result<Session>;

    async fn get(&self, session_id: SessionId) -> Result<Session>;

    /// Every session, in the order the service sent them.
    ///
    /// Any error while draining discards what was already received.
    async fn list(&self) -> Result<Vec<Session>>;

    async fn delete(&self, session_id: SessionId) -> Result<()>;

    /// Watch for sessions that become ready for `device_id`.
    async fn wait_for(
        &self,
        device_id: DeviceId,
    ) -> Result<Subscription<WaitForSessionResponse>, SubscribeError>;

    /// Devices currently waiting for a session.
    ///
    /// An error after the stream opened ends the listing early; the devices
    /// received up to that point are returned.
    async fn list_waiting(&self) -> Result<Vec<Device>>;

    /// Join a session and follow the device's state within it.
    ///
    /// Every pushed message is delivered; one that carries no session device
    /// arrives as `None`.
    async fn join(
        &self,
        device_id: DeviceId,
        session_id: SessionId,
    ) -> Result<Subscription<Option<SessionDevice>>, SubscribeError>;

    /// Release the service connection, ending every open subscription.
    ///
    /// Boxed so it can be called through `Box<dyn SessionService>`.
    /// Implementations also offer `close(self)` on the concrete type.
    fn close(self: Box<Self>);
}
