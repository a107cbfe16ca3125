//! A single-occupancy request slot: starting a request cancels the one
//! before it, and only the newest request's output is ever handed back.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to one issued request. Cancelling it guarantees its output is
/// never delivered.
#[derive(Debug, Clone)]
pub struct RequestToken {
    generation: u64,
    cancel: CancellationToken,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

struct InFlight {
    token: RequestToken,
    task: JoinHandle<()>,
}

struct Delivery<T> {
    generation: u64,
    output: T,
}

pub struct LatestOnly<T> {
    generation: u64,
    in_flight: Option<InFlight>,
    tx: mpsc::UnboundedSender<Delivery<T>>,
    rx: mpsc::UnboundedReceiver<Delivery<T>>,
}

impl<T: Send + 'static> Default for LatestOnly<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> LatestOnly<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            generation: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    /// Cancels whatever is running, then runs `request` in its place.
    pub fn start<F>(&mut self, request: F) -> RequestToken
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let token = RequestToken {
            generation: self.generation,
            cancel: CancellationToken::new(),
        };
        let cancel = token.cancel.clone();
        let tx = self.tx.clone();
        let generation = self.generation;
        let task = tokio::spawn(async move {
            let output = tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                output = request => output,
            };
            if cancel.is_cancelled() {
                return;
            }
            let _ = tx.send(Delivery { generation, output });
        });
        self.in_flight = Some(InFlight {
            token: token.clone(),
            task,
        });
        token
    }

    /// Cancels the running request, if any. Its output will not surface.
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(generation = in_flight.token.generation, "cancelling in-flight request");
            in_flight.token.cancel();
            in_flight.task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|in_flight| !in_flight.token.is_cancelled())
    }

    /// Waits for the current request's output. Outputs of superseded or
    /// cancelled requests are dropped on the way. Pends forever when
    /// nothing is in flight, so it composes with `select!`.
    pub async fn next(&mut self) -> T {
        loop {
            let Some(delivery) = self.rx.recv().await else {
                // Unreachable while `self.tx` is alive.
                std::future::pending::<()>().await;
                continue;
            };
            let current = self
                .in_flight
                .as_ref()
                .filter(|in_flight| in_flight.token.generation == delivery.generation)
                .is_some_and(|in_flight| !in_flight.token.is_cancelled());
            if !current {
                debug!(generation = delivery.generation, "dropping superseded response");
                continue;
            }
            self.in_flight = None;
            return delivery.output;
        }
    }
}

impl<T> Drop for LatestOnly<T> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.token.cancel();
            in_flight.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::{Notify, oneshot};

    use super::*;

    #[tokio::test]
    async fn latest_request_wins() {
        let mut slot = LatestOnly::new();
        let gate = Arc::new(Notify::new());
        let slow_gate = gate.clone();
        let first = slot.start(async move {
            slow_gate.notified().await;
            "first"
        });
        let second = slot.start(async { "second" });
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        gate.notify_waiters();
        assert_eq!(slot.next().await, "second");
        assert!(!slot.is_pending());
    }

    #[tokio::test]
    async fn finished_but_superseded_output_is_dropped() {
        let mut slot = LatestOnly::new();
        slot.start(async { 1 });
        // Let the first task run to completion and enqueue its output.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        let (tx, rx) = oneshot::channel::<u32>();
        slot.start(async move { rx.await.unwrap_or(0) });
        tx.send(2).unwrap();
        assert_eq!(slot.next().await, 2);
    }

    #[tokio::test]
    async fn cancelled_request_stays_silent() {
        let mut slot: LatestOnly<u32> = LatestOnly::new();
        let token = slot.start(async { 7 });
        token.cancel();
        assert!(!slot.is_pending());
        let waited = tokio::time::timeout(Duration::from_millis(50), slot.next()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn drop_aborts_in_flight_task() {
        let (tx, rx) = oneshot::channel::<()>();
        let mut slot = LatestOnly::new();
        slot.start(async move {
            let _keep = tx;
            std::future::pending::<()>().await;
        });
        drop(slot);
        // The sender is dropped once the task is aborted.
        assert!(rx.await.is_err());
    }
}
