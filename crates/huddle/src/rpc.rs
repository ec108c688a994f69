//! The RPC seam between `SessionClient` and the wire.
//!
//! `SessionClient` issues every call through `SessionRpc`. The production
//! implementation is `SessionServiceStub` over a tonic `Channel`; tests swap
//! in a scripted fake without a server.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use huddleproto::{
    CreateSessionRequest, CreateSessionResponse, DeleteSessionRequest, DeleteSessionResponse,
    GetSessionRequest, GetSessionResponse, JoinSessionRequest, JoinSessionResponse,
    ListSessionsRequest, ListSessionsResponse, ListWaitingSessionRequest,
    ListWaitingSessionResponse, SessionServiceStub, WaitForSessionRequest,
    WaitForSessionResponse,
};
use tonic::Status;

/// Boxed server stream: one item per message, `None` on normal end.
pub type RpcStream<T> = Pin<Box<dyn Stream<Item = Result<T, Status>> + Send + 'static>>;

/// Raw session service calls, one per RPC.
#[async_trait]
pub trait SessionRpc: Send + Sync + 'static {
    async fn create(&self, request: CreateSessionRequest) -> Result<CreateSessionResponse, Status>;

    async fn get(&self, request: GetSessionRequest) -> Result<GetSessionResponse, Status>;

    async fn list(
        &self,
        request: ListSessionsRequest,
    ) -> Result<RpcStream<ListSessionsResponse>, Status>;

    async fn delete(&self, request: DeleteSessionRequest) -> Result<DeleteSessionResponse, Status>;

    async fn wait_for(
        &self,
        request: WaitForSessionRequest,
    ) -> Result<RpcStream<WaitForSessionResponse>, Status>;

    async fn list_waiting(
        &self,
        request: ListWaitingSessionRequest,
    ) -> Result<RpcStream<ListWaitingSessionResponse>, Status>;

    async fn join(
        &self,
        request: JoinSessionRequest,
    ) -> Result<RpcStream<JoinSessionResponse>, Status>;
}

// Each call clones the stub: the clone shares the underlying connection.
// Inherent methods are called by path because the trait methods share names.
#[async_trait]
impl SessionRpc for SessionServiceStub {
    async fn create(&self, request: CreateSessionRequest) -> Result<CreateSessionResponse, Status> {
        let mut stub = self.clone();
        let response = SessionServiceStub::create(&mut stub, request).await?;
        Ok(response.into_inner())
    }

    async fn get(&self, request: GetSessionRequest) -> Result<GetSessionResponse, Status> {
        let mut stub = self.clone();
        let response = SessionServiceStub::get(&mut stub, request).await?;
        Ok(response.into_inner())
    }

    async fn list(
        &self,
        request: ListSessionsRequest,
    ) -> Result<RpcStream<ListSessionsResponse>, Status> {
        let mut stub = self.clone();
        let response = SessionServiceStub::list(&mut stub, request).await?;
        Ok(Box::pin(response.into_inner()))
    }

    async fn delete(&self, request: DeleteSessionRequest) -> Result<DeleteSessionResponse, Status> {
        let mut stub = self.clone();
        let response = SessionServiceStub::delete(&mut stub, request).await?;
        Ok(response.into_inner())
    }

    async fn wait_for(
        &self,
        request: WaitForSessionRequest,
    ) -> Result<RpcStream<WaitForSessionResponse>, Status> {
        let mut stub = self.clone();
        let response = SessionServiceStub::wait_for(&mut stub, request).await?;
        Ok(Box::pin(response.into_inner()))
    }

    async fn list_waiting(
        &self,
        request: ListWaitingSessionRequest,
    ) -> Result<RpcStream<ListWaitingSessionResponse>, Status> {
        let mut stub = self.clone();
        let response = SessionServiceStub::list_waiting(&mut stub, request).await?;
        Ok(Box::pin(response.into_inner()))
    }

    async fn join(
        &self,
        request: JoinSessionRequest,
    ) -> Result<RpcStream<JoinSessionResponse>, Status> {
        let mut stub = self.clone();
        let response = SessionServiceStub::join(&mut stub, request).await?;
        Ok(Box::pin(response.into_inner()))
    }
}
