//! Background relay from a server stream to a caller-facing channel.
//!
//! Each `wait_for`/`join` subscription owns one relay task. The task reserves
//! a slot on a capacity-one channel before it receives from the network, so
//! a message is only pulled off the stream once the consumer has taken the
//! previous one. The item channel closes on every kind of end; the reason is
//! kept separately and handed out by [`Subscription::finish`].

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tonic::Status;
use tracing::{debug, warn};

use crate::rpc::RpcStream;

/// Cancels one subscription.
///
/// Clones share the same scope. Cancelling is idempotent, never blocks, and
/// is harmless after the stream ended or if it never opened.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// A handle not tied to any client.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Why a relay stopped.
#[derive(Debug, Clone)]
pub enum StreamEnd {
    /// The server ended the stream normally
    Completed,
    /// The subscription (or its client) was cancelled
    Cancelled,
    /// The stream reported an error
    Failed(Status),
    /// The consumer went away before the stream ended
    Abandoned,
}

impl StreamEnd {
    pub fn is_completed(&self) -> bool {
        matches!(self, StreamEnd::Completed)
    }

    pub fn status(&self) -> Option<&Status> {
        match self {
            StreamEnd::Failed(status) => Some(status),
            _ => None,
        }
    }
}

impl fmt::Display for StreamEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamEnd::Completed => write!(f, "completed"),
            StreamEnd::Cancelled => write!(f, "cancelled"),
            StreamEnd::Failed(status) => {
                write!(f, "failed: {:?}: {}", status.code(), status.message())
            }
            StreamEnd::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// A live stream of updates from the session service.
///
/// Read with [`recv`](Self::recv) or as a `futures::Stream`. `None` means
/// the relay has exited, whatever the cause. After cancelling, keep reading
/// until `None` to observe that exit.
pub struct Subscription<T> {
    updates: mpsc::Receiver<T>,
    cancel: CancelHandle,
    relay: JoinHandle<StreamEnd>,
}

impl<T: Send + 'static> Subscription<T> {
    /// Spawn the relay task for `stream`, forwarding `extract` of every message.
    pub(crate) fn spawn<M, F>(
        operation: &'static str,
        stream: RpcStream<M>,
        cancel: CancelHandle,
        extract: F,
    ) -> Self
    where
        M: Send + 'static,
        F: FnMut(M) -> T + Send + 'static,
    {
        let (tx, updates) = mpsc::channel(1);
        let token = cancel.token().clone();
        let relay = tokio::spawn(relay(operation, stream, tx, token, extract));
        Self {
            updates,
            cancel,
            relay,
        }
    }

    /// Relay any stream of results through a new subscription.
    ///
    /// Lets service doubles hand out subscriptions that behave like the
    /// client's own.
    pub fn from_stream<S>(stream: S, cancel: CancelHandle) -> Self
    where
        S: Stream<Item = Result<T, Status>> + Send + 'static,
    {
        Self::spawn("stream", Box::pin(stream), cancel, |item| item)
    }
}

impl<T> Subscription<T> {
    /// Next update, or `None` once the relay has exited.
    pub async fn recv(&mut self) -> Option<T> {
        self.updates.recv().await
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.relay.is_finished()
    }

    /// Stop reading and wait for the relay's end reason.
    ///
    /// Undelivered updates are discarded. If the stream was still open the
    /// relay sees the receiver go and reports `Abandoned`.
    pub async fn finish(self) -> StreamEnd {
        let Subscription { updates, relay, .. } = self;
        drop(updates);
        match relay.await {
            Ok(end) => end,
            Err(e) => {
                warn!("Relay task did not complete: {}", e);
                StreamEnd::Abandoned
            }
        }
    }

    pub fn into_parts(self) -> (mpsc::Receiver<T>, CancelHandle, JoinHandle<StreamEnd>) {
        (self.updates, self.cancel, self.relay)
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().updates.poll_recv(cx)
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("finished", &self.relay.is_finished())
            .finish()
    }
}

async fn relay<M, T, F>(
    operation: &'static str,
    mut stream: RpcStream<M>,
    tx: mpsc::Sender<T>,
    token: CancellationToken,
    mut extract: F,
) -> StreamEnd
where
    F: FnMut(M) -> T,
{
    debug!("{} relay started", operation);
    let mut delivered: u64 = 0;

    let end = loop {
        // Slot first: frees only once the consumer took the previous update
        let permit = tokio::select! {
            biased;
            _ = token.cancelled() => break StreamEnd::Cancelled,
            permit = tx.reserve() => match permit {
                Ok(permit) => permit,
                Err(_) => break StreamEnd::Abandoned,
            },
        };

        let next = tokio::select! {
            biased;
            _ = token.cancelled() => break StreamEnd::Cancelled,
            _ = tx.closed() => break StreamEnd::Abandoned,
            next = stream.next() => next,
        };

        match next {
            Some(Ok(message)) => {
                permit.send(extract(message));
                delivered += 1;
            }
            Some(Err(status)) => break StreamEnd::Failed(status),
            None => break StreamEnd::Completed,
        }
    };

    debug!("{} relay stopped after {} updates: {}", operation, delivered, end);
    end
}
