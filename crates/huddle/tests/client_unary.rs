//! Tests for SessionClient's unary and drained-stream operations
//!
//! These run against `ScriptedRpc`, so every response (and every failure)
//! is exactly what the test scripted.

mod common;

use common::{device, finite, session, Recorded, ScriptedRpc};
use huddle::{SessionClient, SessionError, SessionService};
use huddleproto::{
    CreateSessionRequest, CreateSessionResponse, DeleteSessionRequest, DeleteSessionResponse,
    GetSessionRequest, GetSessionResponse, ListSessionsResponse, ListWaitingSessionResponse,
};
use pretty_assertions::assert_eq;
use tonic::{Code, Status};

/// create sends the name and device list and returns the session it got back
#[tokio::test]
async fn test_create_echoes_name_and_devices() {
    let rpc = ScriptedRpc::new().on_create(Ok(CreateSessionResponse {
        session: Some(session(11, "jam", &[1, 2, 3])),
    }));
    let client = SessionClient::with_rpc(rpc);

    let created = client.create("jam", &[1, 2, 3]).await.unwrap();

    assert_eq!(created, session(11, "jam", &[1, 2, 3]));
    assert_eq!(
        client.rpc().requests(),
        vec![Recorded::Create(CreateSessionRequest {
            name: "jam".to_string(),
            device_ids: vec![1, 2, 3],
        })]
    );
}

/// An ok response without a session is a failure, never a default session
#[tokio::test]
async fn test_create_without_session_is_missing_payload() {
    let rpc = ScriptedRpc::new().on_create(Ok(CreateSessionResponse { session: None }));
    let client = SessionClient::with_rpc(rpc);

    let err = client.create("jam", &[]).await.unwrap_err();

    assert!(
        matches!(
            err,
            SessionError::MissingPayload {
                operation: "create",
                field: "session"
            }
        ),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_get_returns_session_by_id() {
    let rpc = ScriptedRpc::new().on_get(Ok(GetSessionResponse {
        session: Some(session(4, "lobby", &[9])),
    }));
    let client = SessionClient::with_rpc(rpc);

    let got = client.get(4).await.unwrap();

    assert_eq!(got.name, "lobby");
    assert_eq!(
        client.rpc().requests(),
        vec![Recorded::Get(GetSessionRequest { session_id: 4 })]
    );
}

#[tokio::test]
async fn test_get_without_session_is_missing_payload() {
    let rpc = ScriptedRpc::new().on_get(Ok(GetSessionResponse { session: None }));
    let client = SessionClient::with_rpc(rpc);

    let err = client.get(4).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::MissingPayload {
            operation: "get",
            ..
        }
    ));
}

/// RPC failures pass through with code and message unchanged
#[tokio::test]
async fn test_get_not_found_passes_status_through() {
    let rpc = ScriptedRpc::new().on_get(Err(Status::not_found("no session 4")));
    let client = SessionClient::with_rpc(rpc);

    let err = client.get(4).await.unwrap_err();
    let status = err.status().expect("rpc error");
    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(status.message(), "no session 4");
}

/// list keeps the order the stream delivered
#[tokio::test]
async fn test_list_preserves_stream_order() {
    let items: Vec<_> = [3, 1, 2]
        .into_iter()
        .map(|id| {
            Ok(ListSessionsResponse {
                session: Some(session(id, &format!("s{}", id), &[])),
            })
        })
        .collect();
    let client = SessionClient::with_rpc(ScriptedRpc::new().on_list(Ok(finite(items))));

    let ids: Vec<u64> = client.list().await.unwrap().iter().map(|s| s.id).collect();

    assert_eq!(ids, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_list_empty_stream_is_empty() {
    let client = SessionClient::with_rpc(ScriptedRpc::new().on_list(Ok(finite(vec![]))));

    assert!(client.list().await.unwrap().is_empty());
}

/// A failure mid-stream discards what was already received
#[tokio::test]
async fn test_list_error_mid_stream_discards_partial() {
    let items = vec![
        Ok(ListSessionsResponse {
            session: Some(session(1, "a", &[])),
        }),
        Err(Status::unavailable("connection reset")),
    ];
    let client = SessionClient::with_rpc(ScriptedRpc::new().on_list(Ok(finite(items))));

    let err = client.list().await.unwrap_err();
    assert_eq!(err.code(), Some(Code::Unavailable));
}

#[tokio::test]
async fn test_list_establishment_error() {
    let client = SessionClient::with_rpc(
        ScriptedRpc::new().on_list(Err(Status::permission_denied("no"))),
    );

    let err = client.list().await.unwrap_err();
    assert_eq!(err.code(), Some(Code::PermissionDenied));
}

#[tokio::test]
async fn test_list_skips_items_without_session() {
    let items = vec![
        Ok(ListSessionsResponse { session: None }),
        Ok(ListSessionsResponse {
            session: Some(session(2, "b", &[])),
        }),
    ];
    let client = SessionClient::with_rpc(ScriptedRpc::new().on_list(Ok(finite(items))));

    assert_eq!(client.list().await.unwrap(), vec![session(2, "b", &[])]);
}

/// delete issues exactly one call with the given ID
#[tokio::test]
async fn test_delete_single_call_with_id() {
    let client =
        SessionClient::with_rpc(ScriptedRpc::new().on_delete(Ok(DeleteSessionResponse {})));

    client.delete(42).await.unwrap();

    assert_eq!(
        client.rpc().requests(),
        vec![Recorded::Delete(DeleteSessionRequest { session_id: 42 })]
    );
}

#[tokio::test]
async fn test_delete_failure_status_unchanged() {
    let client = SessionClient::with_rpc(
        ScriptedRpc::new().on_delete(Err(Status::failed_precondition("session has devices"))),
    );

    let err = client.delete(42).await.unwrap_err();
    let status = err.status().expect("rpc error");
    assert_eq!(status.code(), Code::FailedPrecondition);
    assert_eq!(status.message(), "session has devices");
    assert_eq!(client.rpc().requests().len(), 1);
}

#[tokio::test]
async fn test_list_waiting_returns_devices() {
    let items = vec![
        Ok(ListWaitingSessionResponse {
            device: Some(device(1, "pad")),
        }),
        Ok(ListWaitingSessionResponse {
            device: Some(device(2, "keys")),
        }),
    ];
    let client = SessionClient::with_rpc(ScriptedRpc::new().on_list_waiting(Ok(finite(items))));

    let devices = client.list_waiting().await.unwrap();

    assert_eq!(devices, vec![device(1, "pad"), device(2, "keys")]);
    assert_eq!(client.rpc().requests(), vec![Recorded::ListWaiting]);
}

/// A failure mid-stream ends list_waiting early but keeps what arrived
#[tokio::test]
async fn test_list_waiting_error_returns_prefix() {
    let items = vec![
        Ok(ListWaitingSessionResponse {
            device: Some(device(1, "pad")),
        }),
        Err(Status::internal("stream broke")),
        Ok(ListWaitingSessionResponse {
            device: Some(device(2, "keys")),
        }),
    ];
    let client = SessionClient::with_rpc(ScriptedRpc::new().on_list_waiting(Ok(finite(items))));

    let devices = client.list_waiting().await.unwrap();

    assert_eq!(devices, vec![device(1, "pad")]);
}

#[tokio::test]
async fn test_list_waiting_establishment_error() {
    let client = SessionClient::with_rpc(
        ScriptedRpc::new().on_list_waiting(Err(Status::unavailable("down"))),
    );

    let err = client.list_waiting().await.unwrap_err();
    assert_eq!(err.code(), Some(Code::Unavailable));
}
