//! In-memory `SessionService` double for tests.
//!
//! Each operation is answered by an optional closure. Operations without one
//! fail with `Status::unimplemented`. Every call is recorded before its
//! closure runs.
//!
//! ```ignore
//! let mock = MockSessionService::new()
//!     .on_get(|id| Ok(Session { id, name: "lobby".into(), device_ids: vec![] }));
//! assert_eq!(mock.get(3).await?.name, "lobby");
//! assert_eq!(mock.get_calls(), vec![3]);
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use huddleproto::{Device, DeviceId, Session, SessionDevice, SessionId, WaitForSessionResponse};
use tokio_util::sync::CancellationToken;
use tonic::Status;

use crate::error::{Result, SubscribeError};
use crate::relay::{CancelHandle, Subscription};
use crate::service::SessionService;

/// Updates a streaming handler hands back.
pub type UpdateStream<T> = BoxStream<'static, Result<T, Status>>;

type Handler<A, T> = Box<dyn Fn(A) -> Result<T, Status> + Send + Sync>;

/// Stream of the given updates, ending normally after the last.
pub fn updates<T: Send + 'static>(items: Vec<T>) -> UpdateStream<T> {
    stream::iter(items.into_iter().map(Ok)).boxed()
}

/// Every call a `MockSessionService` received, per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockCalls {
    pub create: Vec<(String, Vec<DeviceId>)>,
    pub get: Vec<SessionId>,
    pub list: usize,
    pub delete: Vec<SessionId>,
    pub wait_for: Vec<DeviceId>,
    pub list_waiting: usize,
    pub join: Vec<(DeviceId, SessionId)>,
    pub closed: bool,
}

/// Shared view of a mock's call record. Outlives the mock, so `close` can
/// be observed.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    inner: Arc<Mutex<MockCalls>>,
}

impl CallLog {
    pub fn snapshot(&self) -> MockCalls {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, f: impl FnOnce(&mut MockCalls)) {
        let mut calls = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut calls);
    }
}

#[derive(Default)]
pub struct MockSessionService {
    on_create: Option<Handler<(String, Vec<DeviceId>), Session>>,
    on_get: Option<Handler<SessionId, Session>>,
    on_list: Option<Handler<(), Vec<Session>>>,
    on_delete: Option<Handler<SessionId, ()>>,
    on_wait_for: Option<Handler<DeviceId, UpdateStream<WaitForSessionResponse>>>,
    on_list_waiting: Option<Handler<(), Vec<Device>>>,
    on_join: Option<Handler<(DeviceId, SessionId), UpdateStream<SessionDevice>>>,
    calls: CallLog,
    root: CancellationToken,
}

impl MockSessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &[DeviceId]) -> Result<Session, Status> + Send + Sync + 'static,
    {
        self.on_create = Some(Box::new(move |(name, ids): (String, Vec<DeviceId>)| {
            f(&name, &ids)
        }));
        self
    }

    pub fn on_get<F>(mut self, f: F) -> Self
    where
        F: Fn(SessionId) -> Result<Session, Status> + Send + Sync + 'static,
    {
        self.on_get = Some(Box::new(f));
        self
    }

    pub fn on_list<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Vec<Session>, Status> + Send + Sync + 'static,
    {
        self.on_list = Some(Box::new(move |_: ()| f()));
        self
    }

    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(SessionId) -> Result<(), Status> + Send + Sync + 'static,
    {
        self.on_delete = Some(Box::new(f));
        self
    }

    pub fn on_wait_for<F>(mut self, f: F) -> Self
    where
        F: Fn(DeviceId) -> Result<UpdateStream<WaitForSessionResponse>, Status>
            + Send
            + Sync
            + 'static,
    {
        self.on_wait_for = Some(Box::new(f));
        self
    }

    pub fn on_list_waiting<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Vec<Device>, Status> + Send + Sync + 'static,
    {
        self.on_list_waiting = Some(Box::new(move |_: ()| f()));
        self
    }

    pub fn on_join<F>(mut self, f: F) -> Self
    where
        F: Fn(DeviceId, SessionId) -> Result<UpdateStream<SessionDevice>, Status>
            + Send
            + Sync
            + 'static,
    {
        self.on_join = Some(Box::new(move |(device, session): (DeviceId, SessionId)| {
            f(device, session)
        }));
        self
    }

    pub fn call_log(&self) -> CallLog {
        self.calls.clone()
    }

    pub fn create_calls(&self) -> Vec<(String, Vec<DeviceId>)> {
        self.calls.snapshot().create
    }

    pub fn get_calls(&self) -> Vec<SessionId> {
        self.calls.snapshot().get
    }

    pub fn list_calls(&self) -> usize {
        self.calls.snapshot().list
    }

    pub fn delete_calls(&self) -> Vec<SessionId> {
        self.calls.snapshot().delete
    }

    pub fn wait_for_calls(&self) -> Vec<DeviceId> {
        self.calls.snapshot().wait_for
    }

    pub fn list_waiting_calls(&self) -> usize {
        self.calls.snapshot().list_waiting
    }

    pub fn join_calls(&self) -> Vec<(DeviceId, SessionId)> {
        self.calls.snapshot().join
    }

    /// Cancel every subscription handed out and record the close.
    pub fn close(self) {
        self.root.cancel();
        self.calls.record(|c| c.closed = true);
    }

    fn subscribe<T: Send + 'static>(
        &self,
        operation: &'static str,
        opened: Result<UpdateStream<T>, Status>,
    ) -> Result<Subscription<T>, SubscribeError> {
        let cancel = CancelHandle::new(self.root.child_token());
        match opened {
            Ok(stream) => Ok(Subscription::from_stream(stream, cancel)),
            Err(status) => Err(SubscribeError::new(operation, status.into(), cancel)),
        }
    }
}

fn answer<A, T>(handler: &Option<Handler<A, T>>, operation: &str, args: A) -> Result<T, Status> {
    match handler {
        Some(handler) => handler(args),
        None => Err(Status::unimplemented(format!(
            "mock has no {} handler",
            operation
        ))),
    }
}

#[async_trait]
impl SessionService for MockSessionService {
    async fn create(&self, name: &str, device_ids: &[DeviceId]) -> Result<Session> {
        self.calls
            .record(|c| c.create.push((name.to_string(), device_ids.to_vec())));
        let args = (name.to_string(), device_ids.to_vec());
        Ok(answer(&self.on_create, "create", args)?)
    }

    async fn get(&self, session_id: SessionId) -> Result<Session> {
        self.calls.record(|c| c.get.push(session_id));
        Ok(answer(&self.on_get, "get", session_id)?)
    }

    async fn list(&self) -> Result<Vec<Session>> {
        self.calls.record(|c| c.list += 1);
        Ok(answer(&self.on_list, "list", ())?)
    }

    async fn delete(&self, session_id: SessionId) -> Result<()> {
        self.calls.record(|c| c.delete.push(session_id));
        Ok(answer(&self.on_delete, "delete", session_id)?)
    }

    async fn wait_for(
        &self,
        device_id: DeviceId,
    ) -> Result<Subscription<WaitForSessionResponse>, SubscribeError> {
        self.calls.record(|c| c.wait_for.push(device_id));
        let opened = answer(&self.on_wait_for, "wait_for", device_id);
        self.subscribe("wait_for", opened)
    }

    async fn list_waiting(&self) -> Result<Vec<Device>> {
        self.calls.record(|c| c.list_waiting += 1);
        Ok(answer(&self.on_list_waiting, "list_waiting", ())?)
    }

    async fn join(
        &self,
        device_id: DeviceId,
        session_id: SessionId,
    ) -> Result<Subscription<Option<SessionDevice>>, SubscribeError> {
        self.calls.record(|c| c.join.push((device_id, session_id)));
        let opened = answer(&self.on_join, "join", (device_id, session_id))
            .map(|updates| updates.map(|update| update.map(Some)).boxed());
        self.subscribe("join", opened)
    }

    fn close(self: Box<Self>) {
        MockSessionService::close(*self);
    }
}
