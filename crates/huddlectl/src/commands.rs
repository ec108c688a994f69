//! CLI command implementations

use std::future::Future;
use std::io::Write;

use anyhow::{Context, Result};
use huddle::{DeviceId, SessionId, SessionService, StreamEnd, SubscribeError, Subscription};
use tracing::{info, warn};

use crate::output::Output;

pub async fn create<S, W>(
    service: &S,
    name: &str,
    device_ids: &[DeviceId],
    out: &mut Output<W>,
) -> Result<()>
where
    S: SessionService,
    W: Write,
{
    let session = service
        .create(name, device_ids)
        .await
        .with_context(|| format!("Failed to create session '{}'", name))?;
    out.session(&session)
}

pub async fn get<S: SessionService, W: Write>(
    service: &S,
    session_id: SessionId,
    out: &mut Output<W>,
) -> Result<()> {
    let session = service
        .get(session_id)
        .await
        .with_context(|| format!("Failed to get session {}", session_id))?;
    out.session(&session)
}

pub async fn list<S: SessionService, W: Write>(service: &S, out: &mut Output<W>) -> Result<()> {
    let sessions = service.list().await.context("Failed to list sessions")?;
    out.sessions(&sessions)
}

pub async fn delete<S: SessionService, W: Write>(
    service: &S,
    session_id: SessionId,
    out: &mut Output<W>,
) -> Result<()> {
    service
        .delete(session_id)
        .await
        .with_context(|| format!("Failed to delete session {}", session_id))?;
    out.deleted(session_id)
}

pub async fn waiting<S: SessionService, W: Write>(service: &S, out: &mut Output<W>) -> Result<()> {
    let devices = service
        .list_waiting()
        .await
        .context("Failed to list waiting devices")?;
    out.devices(&devices)
}

/// Print sessions that become ready for a device until the stream ends.
pub async fn wait_for<S, W, F>(
    service: &S,
    device_id: DeviceId,
    count: Option<usize>,
    shutdown: F,
    out: &mut Output<W>,
) -> Result<StreamEnd>
where
    S: SessionService,
    W: Write,
    F: Future<Output = ()>,
{
    let subscription = service
        .wait_for(device_id)
        .await
        .map_err(abandon)
        .with_context(|| format!("Failed to wait for sessions for device {}", device_id))?;

    follow(subscription, count, shutdown, |update| out.session_ready(&update)).await
}

/// Join a session and print the device's state changes until the stream ends.
pub async fn join<S, W, F>(
    service: &S,
    device_id: DeviceId,
    session_id: SessionId,
    count: Option<usize>,
    shutdown: F,
    out: &mut Output<W>,
) -> Result<StreamEnd>
where
    S: SessionService,
    W: Write,
    F: Future<Output = ()>,
{
    let subscription = service
        .join(device_id, session_id)
        .await
        .map_err(abandon)
        .with_context(|| {
            format!(
                "Failed to join session {} as device {}",
                session_id, device_id
            )
        })?;

    follow(subscription, count, shutdown, |update| out.session_device(update.as_ref())).await
}

fn abandon(err: SubscribeError) -> huddle::SessionError {
    let (source, cancel) = err.into_parts();
    cancel.cancel();
    source
}

/// Emit updates until the subscription closes.
///
/// Cancels on `shutdown` or once `count` updates were emitted, then keeps
/// draining so the relay exit is observed before the end reason is read.
async fn follow<T, F, E>(
    mut subscription: Subscription<T>,
    count: Option<usize>,
    shutdown: F,
    mut emit: E,
) -> Result<StreamEnd>
where
    F: Future<Output = ()>,
    E: FnMut(T) -> Result<()>,
{
    tokio::pin!(shutdown);
    let mut emitted = 0usize;
    let mut interrupted = false;

    if count == Some(0) {
        subscription.cancel();
    }

    loop {
        tokio::select! {
            _ = &mut shutdown, if !interrupted => {
                info!("Interrupted, cancelling subscription");
                interrupted = true;
                subscription.cancel();
            }
            update = subscription.recv() => {
                let Some(update) = update else { break };
                if count.is_some_and(|limit| emitted >= limit) {
                    continue;
                }
                emit(update)?;
                emitted += 1;
                if count.is_some_and(|limit| emitted >= limit) {
                    subscription.cancel();
                }
            }
        }
    }

    let end = subscription.finish().await;
    match &end {
        StreamEnd::Failed(status) => warn!("Stream failed after {} updates: {}", emitted, status),
        other => info!("Stream {} after {} updates", other, emitted),
    }
    Ok(end)
}
