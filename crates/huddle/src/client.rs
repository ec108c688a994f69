//! gRPC client for the session service.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use huddleconf::ClientConfig;
use huddleproto::{
    CreateSessionRequest, DeleteSessionRequest, Device, DeviceId, GetSessionRequest,
    JoinSessionRequest, JoinSessionResponse, ListSessionsRequest, ListWaitingSessionRequest,
    Session, SessionDevice, SessionId, SessionServiceStub, WaitForSessionRequest,
    WaitForSessionResponse,
};
use tokio_util::sync::CancellationToken;
use tonic::transport::Endpoint;
use tonic::Status;
use tracing::{debug, info, warn};

use crate::error::{Result, SessionError, SubscribeError};
use crate::relay::{CancelHandle, Subscription};
use crate::rpc::{RpcStream, SessionRpc};
use crate::service::SessionService;

/// Client for `huddle.v1.SessionService`.
///
/// All calls share one connection. Every subscription runs under a child of
/// the client's root cancellation scope, so [`close`](SessionService::close)
/// ends them all.
pub struct SessionClient<R = SessionServiceStub> {
    rpc: R,
    root: CancellationToken,
    endpoint: String,
}

impl SessionClient<SessionServiceStub> {
    /// Connect to the service at `address`, failing if it is unreachable.
    pub async fn connect(address: &str) -> Result<Self> {
        Self::from_config(&ClientConfig::for_endpoint(address)).await
    }

    /// Build a client from configuration.
    ///
    /// With `lazy_connect` the connection is made on first use and this only
    /// fails for an unparseable endpoint.
    pub async fn from_config(config: &ClientConfig) -> Result<Self> {
        let endpoint = normalize_endpoint(&config.endpoint);

        let mut builder = Endpoint::from_shared(endpoint.clone()).map_err(|source| {
            SessionError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                source,
            }
        })?;
        if config.connect_timeout_ms > 0 {
            builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
        }

        let channel = if config.lazy_connect {
            debug!("Deferring connection to {} until first call", endpoint);
            builder.connect_lazy()
        } else {
            let channel = builder
                .connect()
                .await
                .map_err(|source| SessionError::Connect {
                    endpoint: endpoint.clone(),
                    source,
                })?;
            info!("Connected to session service at {}", endpoint);
            channel
        };

        Ok(Self {
            rpc: SessionServiceStub::new(channel),
            root: CancellationToken::new(),
            endpoint,
        })
    }
}

impl<R: SessionRpc> SessionClient<R> {
    /// Client over any RPC implementation.
    pub fn with_rpc(rpc: R) -> Self {
        Self {
            rpc,
            root: CancellationToken::new(),
            endpoint: "in-process".to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    /// Release the connection, ending every open subscription.
    pub fn close(self) {
        self.root.cancel();
        info!("Closed session client for {}", self.endpoint);
    }

    /// Open a server stream and relay it under a fresh child scope.
    async fn subscribe<M, T, Fut, F>(
        &self,
        operation: &'static str,
        open: Fut,
        extract: F,
    ) -> Result<Subscription<T>, SubscribeError>
    where
        M: Send + 'static,
        T: Send + 'static,
        Fut: Future<Output = Result<RpcStream<M>, Status>> + Send,
        F: FnMut(M) -> T + Send + 'static,
    {
        let cancel = CancelHandle::new(self.root.child_token());

        match open.await {
            Ok(stream) => Ok(Subscription::spawn(operation, stream, cancel, extract)),
            Err(status) => {
                debug!("{} stream failed to open: {}", operation, status);
                Err(SubscribeError::new(operation, status.into(), cancel))
            }
        }
    }
}

#[async_trait]
impl<R: SessionRpc> SessionService for SessionClient<R> {
    #[tracing::instrument(skip(self))]
    async fn create(&self, name: &str, device_ids: &[DeviceId]) -> Result<Session> {
        let response = self
            .rpc
            .create(CreateSessionRequest {
                name: name.to_string(),
                device_ids: device_ids.to_vec(),
            })
            .await?;

        response.session.ok_or(SessionError::MissingPayload {
            operation: "create",
            field: "session",
        })
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, session_id: SessionId) -> Result<Session> {
        let response = self.rpc.get(GetSessionRequest { session_id }).await?;

        response.session.ok_or(SessionError::MissingPayload {
            operation: "get",
            field: "session",
        })
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Session>> {
        let mut stream = self.rpc.list(ListSessionsRequest {}).await?;
        let mut sessions = Vec::new();

        while let Some(item) = stream.next().await {
            match item?.session {
                Some(session) => sessions.push(session),
                None => warn!("List response without session, skipping"),
            }
        }

        debug!("Listed {} sessions", sessions.len());
        Ok(sessions)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, session_id: SessionId) -> Result<()> {
        self.rpc.delete(DeleteSessionRequest { session_id }).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn wait_for(
        &self,
        device_id: DeviceId,
    ) -> Result<Subscription<WaitForSessionResponse>, SubscribeError> {
        let open = self.rpc.wait_for(WaitForSessionRequest { device_id });
        self.subscribe("wait_for", open, |response| response).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_waiting(&self) -> Result<Vec<Device>> {
        let mut stream = self.rpc.list_waiting(ListWaitingSessionRequest {}).await?;
        let mut devices = Vec::new();

        while let Some(item) = stream.next().await {
            match item {
                Ok(response) => match response.device {
                    Some(device) => devices.push(device),
                    None => warn!("ListWaiting response without device, skipping"),
                },
                Err(status) => {
                    warn!(
                        "ListWaiting stream failed after {} devices, returning them: {}",
                        devices.len(),
                        status
                    );
                    break;
                }
            }
        }

        Ok(devices)
    }

    #[tracing::instrument(skip(self))]
    async fn join(
        &self,
        device_id: DeviceId,
        session_id: SessionId,
    ) -> Result<Subscription<Option<SessionDevice>>, SubscribeError> {
        let open = self.rpc.join(JoinSessionRequest {
            device_id,
            session_id,
        });
        self.subscribe("join", open, |response: JoinSessionResponse| {
            response.session_device
        })
        .await
    }

    fn close(self: Box<Self>) {
        SessionClient::close(*self);
    }
}

/// Give a bare `host:port` the `http` scheme.
fn normalize_endpoint(address: &str) -> String {
    let address = address.trim();
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}
