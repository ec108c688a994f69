//! huddleproto - wire types for the huddle session service
//!
//! The session service is a gRPC service (`huddle.v1.SessionService`,
//! schema in `proto/session.proto`) that lets devices create, discover, and
//! join shared sessions. This crate holds only the protocol surface:
//!
//! - `messages`: prost messages for every request and response
//! - `stub`: `SessionServiceStub`, the typed tonic client over one `Channel`
//!
//! Anything with behaviour (draining streams, relaying pushes, error
//! translation) lives in the `huddle` crate.

pub mod messages;
pub mod stub;

pub use messages::{
    CreateSessionRequest, CreateSessionResponse, DeleteSessionRequest, DeleteSessionResponse,
    Device, DeviceId, DeviceState, GetSessionRequest, GetSessionResponse, JoinSessionRequest,
    JoinSessionResponse, ListSessionsRequest, ListSessionsResponse, ListWaitingSessionRequest,
    ListWaitingSessionResponse, Session, SessionDevice, SessionId, WaitForSessionRequest,
    WaitForSessionResponse,
};
pub use stub::SessionServiceStub;

/// Fully-qualified gRPC service name.
pub const SERVICE_NAME: &str = "huddle.v1.SessionService";
