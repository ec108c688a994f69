//! huddle - client access layer for the huddle session service
//!
//! Devices use the session service to create shared sessions, find sessions
//! that are waiting for them, and join. This crate wraps the gRPC service in
//! a typed client:
//!
//! - [`SessionService`]: the operations, as a trait
//! - [`SessionClient`]: the gRPC implementation, over one shared connection
//! - [`Subscription`]: a live update stream for `wait_for` and `join`
//! - [`mock::MockSessionService`]: closure-backed double for tests
//!
//! # Streams
//!
//! `list` and `list_waiting` drain their server stream before returning.
//! `wait_for` and `join` return immediately with a [`Subscription`] fed by a
//! background relay task. The relay holds at most one undelivered update, so
//! a consumer that stops reading stalls the stream rather than losing
//! updates. Cancel with [`Subscription::cancel`] (or a [`CancelHandle`]) and
//! keep reading until `None`. [`Subscription::finish`] reports why the
//! stream ended.
//!
//! ```ignore
//! let client = SessionClient::connect("127.0.0.1:50051").await?;
//! let session = client.create("jam", &[1, 2]).await?;
//! let mut updates = client.join(1, session.id).await?;
//! while let Some(update) = updates.recv().await {
//!     if let Some(device) = update {
//!         println!("{:?}", device.state());
//!     }
//! }
//! client.close();
//! ```

pub mod client;
pub mod error;
pub mod mock;
pub mod relay;
pub mod rpc;
pub mod service;

pub use client::SessionClient;
pub use error::{Result, SessionError, SubscribeError};
pub use relay::{CancelHandle, StreamEnd, Subscription};
pub use rpc::{RpcStream, SessionRpc};
pub use service::SessionService;

pub use huddleproto::{
    Device, DeviceId, DeviceState, Session, SessionDevice, SessionId, WaitForSessionResponse,
};
pub use tonic::{Code, Status};
