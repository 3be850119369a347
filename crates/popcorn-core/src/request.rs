use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The single logical place a controller issues requests into
///
/// Issuing a new request cancels the one before it, so at most one request
/// per slot is ever outstanding. Ids increase monotonically and let a request
/// task recognise that it has been superseded even if it raced past its
/// cancellation check.
#[derive(Debug, Default)]
pub struct RequestSlot {
    next_id: u64,
    current: Option<CancellationToken>,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the outstanding request (if any) and reserve a new one
    pub fn issue(&mut self) -> (u64, CancellationToken) {
        self.cancel();
        self.next_id += 1;
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        (self.next_id, token)
    }

    /// Cancel without issuing a replacement; fire and forget
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            if !token.is_cancelled() {
                debug!(request_id = self.next_id, "Cancelling outstanding request");
            }
            token.cancel();
        }
    }

    pub fn has_outstanding(&self) -> bool {
        self.current.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}

impl Drop for RequestSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Handle to an issued request, returned to the caller
///
/// Dropping the handle does not cancel the request; the owning controller
/// does that on supersession or teardown.
#[derive(Debug)]
pub struct RequestHandle {
    id: u64,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl RequestHandle {
    pub(crate) fn new(id: u64, token: CancellationToken, task: JoinHandle<()>) -> Self {
        Self { id, token, task }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until the request task has applied (or discarded) its outcome
    pub async fn settled(self) {
        if let Err(e) = self.task.await {
            debug!(request_id = self.id, error = %e, "Request task did not complete");
        }
    }
}

/// Run `fut` unless `token` is cancelled first; `None` means cancelled
pub async fn run_cancellable<F: Future>(token: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;

        () = token.cancelled() => None,

        output = fut => Some(output),
    }
}
