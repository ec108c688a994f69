//! Protobuf messages for `huddle.v1.SessionService`.
//!
//! Field tags follow `proto/session.proto`.

use serde::Serialize;

/// Numeric session identifier assigned by the service.
pub type SessionId = u64;

/// Numeric device identifier.
pub type DeviceId = u64;

/// A shared session and the devices admitted to it.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message, Serialize)]
pub struct Session {
    #[prost(uint64, tag = "1")]
    pub id: SessionId,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(uint64, repeated, tag = "3")]
    pub device_ids: Vec<DeviceId>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message, Serialize)]
pub struct Device {
    #[prost(uint64, tag = "1")]
    pub id: DeviceId,
    #[prost(string, tag = "2")]
    pub name: String,
}

/// Where a device stands relative to a session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum DeviceState {
    Unspecified = 0,
    Waiting = 1,
    Joining = 2,
    Joined = 3,
    Left = 4,
}

impl DeviceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Unspecified => "unspecified",
            DeviceState::Waiting => "waiting",
            DeviceState::Joining => "joining",
            DeviceState::Joined => "joined",
            DeviceState::Left => "left",
        }
    }
}

/// A device's standing within one session, pushed during `Join`.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message, Serialize)]
pub struct SessionDevice {
    #[prost(uint64, tag = "1")]
    pub session_id: SessionId,
    #[prost(message, optional, tag = "2")]
    pub device: Option<Device>,
    #[prost(enumeration = "DeviceState", tag = "3")]
    pub state: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateSessionRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(uint64, repeated, tag = "2")]
    pub device_ids: Vec<DeviceId>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateSessionResponse {
    #[prost(message, optional, tag = "1")]
    pub session: Option<Session>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetSessionRequest {
    #[prost(uint64, tag = "1")]
    pub session_id: SessionId,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetSessionResponse {
    #[prost(message, optional, tag = "1")]
    pub session: Option<Session>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListSessionsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListSessionsResponse {
    #[prost(message, optional, tag = "1")]
    pub session: Option<Session>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteSessionRequest {
    #[prost(uint64, tag = "1")]
    pub session_id: SessionId,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteSessionResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WaitForSessionRequest {
    #[prost(uint64, tag = "1")]
    pub device_id: DeviceId,
}

/// Notification that a session is ready for a waiting device.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message, Serialize)]
pub struct WaitForSessionResponse {
    #[prost(message, optional, tag = "1")]
    pub session: Option<Session>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListWaitingSessionRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListWaitingSessionResponse {
    #[prost(message, optional, tag = "1")]
    pub device: Option<Device>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct JoinSessionRequest {
    #[prost(uint64, tag = "1")]
    pub device_id: DeviceId,
    #[prost(uint64, tag = "2")]
    pub session_id: SessionId,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct JoinSessionResponse {
    #[prost(message, optional, tag = "1")]
    pub session_device: Option<SessionDevice>,
}
