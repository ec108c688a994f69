//! Common test utilities for huddle client tests
//!
//! `ScriptedRpc` stands in for the gRPC stub: each call pops the next
//! scripted result for its operation and records the request it was given.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;
use huddle::rpc::{RpcStream, SessionRpc};
use huddle::{Device, DeviceState, Session, SessionDevice, SessionId};
use huddleproto::{
    CreateSessionRequest, CreateSessionResponse, DeleteSessionRequest, DeleteSessionResponse,
    GetSessionRequest, GetSessionResponse, JoinSessionRequest, JoinSessionResponse,
    ListSessionsRequest, ListSessionsResponse, ListWaitingSessionRequest,
    ListWaitingSessionResponse, WaitForSessionRequest, WaitForSessionResponse,
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::Status;

/// A request as the fake received it.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Create(CreateSessionRequest),
    Get(GetSessionRequest),
    List,
    Delete(DeleteSessionRequest),
    WaitFor(WaitForSessionRequest),
    ListWaiting,
    Join(JoinSessionRequest),
}

type Script<T> = Mutex<VecDeque<Result<T, Status>>>;

#[derive(Default)]
pub struct ScriptedRpc {
    requests: Mutex<Vec<Recorded>>,
    create: Script<CreateSessionResponse>,
    get: Script<GetSessionResponse>,
    list: Script<RpcStream<ListSessionsResponse>>,
    delete: Script<DeleteSessionResponse>,
    wait_for: Script<RpcStream<WaitForSessionResponse>>,
    list_waiting: Script<RpcStream<ListWaitingSessionResponse>>,
    join: Script<RpcStream<JoinSessionResponse>>,
}

impl ScriptedRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create(self, result: Result<CreateSessionResponse, Status>) -> Self {
        self.create.lock().unwrap().push_back(result);
        self
    }

    pub fn on_get(self, result: Result<GetSessionResponse, Status>) -> Self {
        self.get.lock().unwrap().push_back(result);
        self
    }

    pub fn on_list(self, result: Result<RpcStream<ListSessionsResponse>, Status>) -> Self {
        self.list.lock().unwrap().push_back(result);
        self
    }

    pub fn on_delete(self, result: Result<DeleteSessionResponse, Status>) -> Self {
        self.delete.lock().unwrap().push_back(result);
        self
    }

    pub fn on_wait_for(self, result: Result<RpcStream<WaitForSessionResponse>, Status>) -> Self {
        self.wait_for.lock().unwrap().push_back(result);
        self
    }

    pub fn on_list_waiting(
        self,
        result: Result<RpcStream<ListWaitingSessionResponse>, Status>,
    ) -> Self {
        self.list_waiting.lock().unwrap().push_back(result);
        self
    }

    pub fn on_join(self, result: Result<RpcStream<JoinSessionResponse>, Status>) -> Self {
        self.join.lock().unwrap().push_back(result);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: Recorded) {
        self.requests.lock().unwrap().push(request);
    }
}

fn next<T>(script: &Script<T>, operation: &str) -> Result<T, Status> {
    script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| {
            Err(Status::unimplemented(format!(
                "nothing scripted for {}",
                operation
            )))
        })
}

#[async_trait]
impl SessionRpc for ScriptedRpc {
    async fn create(&self, request: CreateSessionRequest) -> Result<CreateSessionResponse, Status> {
        self.record(Recorded::Create(request));
        next(&self.create, "create")
    }

    async fn get(&self, request: GetSessionRequest) -> Result<GetSessionResponse, Status> {
        self.record(Recorded::Get(request));
        next(&self.get, "get")
    }

    async fn list(
        &self,
        _request: ListSessionsRequest,
    ) -> Result<RpcStream<ListSessionsResponse>, Status> {
        self.record(Recorded::List);
        next(&self.list, "list")
    }

    async fn delete(&self, request: DeleteSessionRequest) -> Result<DeleteSessionResponse, Status> {
        self.record(Recorded::Delete(request));
        next(&self.delete, "delete")
    }

    async fn wait_for(
        &self,
        request: WaitForSessionRequest,
    ) -> Result<RpcStream<WaitForSessionResponse>, Status> {
        self.record(Recorded::WaitFor(request));
        next(&self.wait_for, "wait_for")
    }

    async fn list_waiting(
        &self,
        _request: ListWaitingSessionRequest,
    ) -> Result<RpcStream<ListWaitingSessionResponse>, Status> {
        self.record(Recorded::ListWaiting);
        next(&self.list_waiting, "list_waiting")
    }

    async fn join(
        &self,
        request: JoinSessionRequest,
    ) -> Result<RpcStream<JoinSessionResponse>, Status> {
        self.record(Recorded::Join(request));
        next(&self.join, "join")
    }
}

/// A finite server stream yielding `items` then ending.
pub fn finite<M: Send + 'static>(items: Vec<Result<M, Status>>) -> RpcStream<M> {
    Box::pin(stream::iter(items))
}

/// A server stream that never yields or ends.
pub fn silent<M: Send + 'static>() -> RpcStream<M> {
    Box::pin(stream::pending())
}

/// A server stream fed by hand through the returned sender.
///
/// The feed holds `capacity` messages the relay has not pulled yet. Dropping
/// the sender ends the stream normally.
pub fn fed<M: Send + 'static>(capacity: usize) -> (mpsc::Sender<Result<M, Status>>, RpcStream<M>) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, Box::pin(ReceiverStream::new(rx)))
}

pub fn session(id: SessionId, name: &str, device_ids: &[u64]) -> Session {
    Session {
        id,
        name: name.to_string(),
        device_ids: device_ids.to_vec(),
    }
}

pub fn device(id: u64, name: &str) -> Device {
    Device {
        id,
        name: name.to_string(),
    }
}

pub fn join_update(
    session_id: SessionId,
    device_id: u64,
    state: DeviceState,
) -> JoinSessionResponse {
    JoinSessionResponse {
        session_device: Some(SessionDevice {
            session_id,
            device: Some(device(device_id, "pad")),
            state: state as i32,
        }),
    }
}

pub fn ready(session: Session) -> WaitForSessionResponse {
    WaitForSessionResponse {
        session: Some(session),
    }
}
