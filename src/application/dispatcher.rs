//! Event channel between the notification source and the relay.
//!
//! ```text
//! EventSender::send() ──mpsc──► Dispatcher::run()
//!                                 ├─ EnvironmentSource::snapshot()   // fresh per event
//!                                 └─ spawn task per event
//!                                      ├─ acquire semaphore permit   // caps concurrency
//!                                      └─ Relay::relay()
//! ```
//!
//! Each event gets exactly one independent attempt. There is no dedup,
//! ordering or batching, and completions may arrive out of order. The
//! receive loop never waits on a permit, so a saturated backend cannot
//! stall producers or delay shutdown.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use super::environment::EnvironmentSource;
use super::relay::{Ack, Relay};
use crate::domain::event::PaymentEvent;
use crate::error::{NotifyError, RelayError, Result};

type RelayOutcome = std::result::Result<Ack, RelayError>;
type TaskOutcome = std::result::Result<RelayOutcome, JoinError>;

/// Tuning for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub channel_capacity: usize,
    pub max_concurrent_relays: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            max_concurrent_relays: 16,
        }
    }
}

/// Counts of relay outcomes observed by one `Dispatcher::run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub delivered: usize,
    pub rejected: usize,
    pub failed: usize,
    pub abandoned: usize,
}

impl DispatchSummary {
    fn record(&mut self, outcome: TaskOutcome) {
        match outcome {
            Ok(Ok(_)) => self.delivered += 1,
            Ok(Err(RelayError::ServerRejected { .. })) => self.rejected += 1,
            Ok(Err(_)) => self.failed += 1,
            Err(e) => {
                tracing::warn!(error = %e, "Relay task did not complete");
                self.failed += 1;
            }
        }
    }
}

/// Producer half. Cheap to clone; one per event source.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<PaymentEvent>,
}

impl EventSender {
    /// Queues an event, waiting only for channel capacity.
    pub async fn send(&self, event: PaymentEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| NotifyError::DispatcherClosed)
    }
}

/// Consumer half: receives events and spawns one relay task per event.
pub struct Dispatcher {
    rx: mpsc::Receiver<PaymentEvent>,
    relay: Arc<Relay>,
    environment: Arc<EnvironmentSource>,
    semaphore: Arc<Semaphore>,
    shutdown: CancellationToken,
}

/// Creates a connected sender/dispatcher pair.
pub fn channel(
    relay: Arc<Relay>,
    environment: Arc<EnvironmentSource>,
    config: DispatcherConfig,
    shutdown: CancellationToken,
) -> (EventSender, Dispatcher) {
    let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
    let dispatcher = Dispatcher {
        rx,
        relay,
        environment,
        semaphore: Arc::new(Semaphore::new(config.max_concurrent_relays.max(1))),
        shutdown,
    };
    (EventSender { tx }, dispatcher)
}

impl Dispatcher {
    /// Runs the dispatcher on its own task.
    pub fn spawn(self) -> JoinHandle<DispatchSummary> {
        tokio::spawn(self.run())
    }

    /// Consumes events until every sender is dropped or shutdown fires.
    ///
    /// On channel close, in-flight relays are awaited. On shutdown they are
    /// aborted, including those still waiting for a permit, and counted as
    /// abandoned.
    pub async fn run(mut self) -> DispatchSummary {
        let mut in_flight: JoinSet<RelayOutcome> = JoinSet::new();
        let mut summary = DispatchSummary::default();

        loop {
            let event = tokio::select! {
                received = self.rx.recv() => match received {
                    Some(event) => event,
                    None => {
                        tracing::debug!("Event channel closed, draining in-flight relays");
                        break;
                    }
                },
                Some(outcome) = in_flight.join_next(), if !in_flight.is_empty() => {
                    summary.record(outcome);
                    continue;
                }
                _ = self.shutdown.cancelled() => {
                    return Self::abandon(in_flight, summary);
                }
            };

            let config = match self.environment.snapshot().await {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        amount = %event.amount,
                        "Failed to read relay environment, dropping event"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            let relay = Arc::clone(&self.relay);
            let semaphore = Arc::clone(&self.semaphore);
            in_flight.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Err(RelayError::TransportError(
                        "relay semaphore closed".to_string(),
                    ));
                };
                relay.relay(&event, &config).await
            });
        }

        loop {
            tokio::select! {
                outcome = in_flight.join_next() => match outcome {
                    Some(outcome) => summary.record(outcome),
                    None => break,
                },
                _ = self.shutdown.cancelled() => {
                    return Self::abandon(in_flight, summary);
                }
            }
        }

        tracing::info!(
            delivered = summary.delivered,
            rejected = summary.rejected,
            failed = summary.failed,
            "Dispatcher finished"
        );
        summary
    }

    fn abandon(
        mut in_flight: JoinSet<RelayOutcome>,
        mut summary: DispatchSummary,
    ) -> DispatchSummary {
        summary.abandoned += in_flight.len();
        in_flight.abort_all();
        tracing::info!(abandoned = summary.abandoned, "Dispatcher shut down");
        summary
    }
}
