//! gRPC client stub for `huddle.v1.SessionService`.
//!
//! A thin typed layer over `tonic::client::Grpc`: one method per RPC, each
//! issuing the call on the shared `Channel` with the prost codec. Cloning the
//! stub clones the channel handle, not the connection, which is how callers
//! issue concurrent calls.

use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{IntoRequest, Response, Status, Streaming};

use crate::messages::*;

/// Fully-qualified RPC paths.
pub mod paths {
    pub const CREATE: &str = "/huddle.v1.SessionService/Create";
    pub const GET: &str = "/huddle.v1.SessionService/Get";
    pub const LIST: &str = "/huddle.v1.SessionService/List";
    pub const DELETE: &str = "/huddle.v1.SessionService/Delete";
    pub const WAIT_FOR: &str = "/huddle.v1.SessionService/WaitFor";
    pub const LIST_WAITING: &str = "/huddle.v1.SessionService/ListWaiting";
    pub const JOIN: &str = "/huddle.v1.SessionService/Join";
}

#[derive(Debug, Clone)]
pub struct SessionServiceStub {
    inner: tonic::client::Grpc<Channel>,
}

impl SessionServiceStub {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    /// Wait for the channel to accept a call.
    async fn ready(&mut self) -> Result<(), Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unavailable(format!("Service was not ready: {}", e)))
    }

    pub async fn create(
        &mut self,
        request: impl IntoRequest<CreateSessionRequest>,
    ) -> Result<Response<CreateSessionResponse>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static(paths::CREATE);
        self.inner
            .unary(request.into_request(), path, ProstCodec::default())
            .await
    }

    pub async fn get(
        &mut self,
        request: impl IntoRequest<GetSessionRequest>,
    ) -> Result<Response<GetSessionResponse>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static(paths::GET);
        self.inner
            .unary(request.into_request(), path, ProstCodec::default())
            .await
    }

    pub async fn list(
        &mut self,
        request: impl IntoRequest<ListSessionsRequest>,
    ) -> Result<Response<Streaming<ListSessionsResponse>>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static(paths::LIST);
        self.inner
            .server_streaming(request.into_request(), path, ProstCodec::default())
            .await
    }

    pub async fn delete(
        &mut self,
        request: impl IntoRequest<DeleteSessionRequest>,
    ) -> Result<Response<DeleteSessionResponse>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static(paths::DELETE);
        self.inner
            .unary(request.into_request(), path, ProstCodec::default())
            .await
    }

    pub async fn wait_for(
        &mut self,
        request: impl IntoRequest<WaitForSessionRequest>,
    ) -> Result<Response<Streaming<WaitForSessionResponse>>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static(paths::WAIT_FOR);
        self.inner
            .server_streaming(request.into_request(), path, ProstCodec::default())
            .await
    }

    pub async fn list_waiting(
        &mut self,
        request: impl IntoRequest<ListWaitingSessionRequest>,
    ) -> Result<Response<Streaming<ListWaitingSessionResponse>>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static(paths::LIST_WAITING);
        self.inner
            .server_streaming(request.into_request(), path, ProstCodec::default())
            .await
    }

    pub async fn join(
        &mut self,
        request: impl IntoRequest<JoinSessionRequest>,
    ) -> Result<Response<Streaming<JoinSessionResponse>>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static(paths::JOIN);
        self.inner
            .server_streaming(request.into_request(), path, ProstCodec::default())
            .await
    }
}
