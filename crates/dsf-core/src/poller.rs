//! Verification polling
//!
//! Fetches a fresh snapshot and evaluates it on a fixed cadence until the
//! domain connects, the host cancels, or the propagation window closes.
//! Attempts are independent: nothing from one cycle feeds the next.

use crate::api::DomainApi;
use crate::config::SetupConfig;
use crate::error::FetchError;
use crate::verification::{evaluate, VerificationOutcome};
use dsf_kernel::Mode;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Shortest cadence the poller will run at
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Create a linked cancel handle and signal
#[must_use]
pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelSignal(rx))
}

/// Held by the host; dropping it without cancelling lets polling run on
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Observed by the poller
#[derive(Debug, Clone)]
pub struct CancelSignal(watch::Receiver<bool>);

impl CancelSignal {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancelled; pends forever if the handle is dropped first
    pub async fn cancelled(&mut self) {
        if self.0.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// How polling ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    Connected,
    Cancelled,
    TimedOut,
}

/// Summary of a polling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub result: PollResult,
    /// Snapshot fetches attempted
    pub attempts: u32,
    /// Outcome of the most recent successful fetch
    pub last_outcome: Option<VerificationOutcome>,
    /// Error of the most recent failed fetch
    pub last_error: Option<FetchError>,
}

impl PollReport {
    fn new() -> Self {
        Self {
            result: PollResult::TimedOut,
            attempts: 0,
            last_outcome: None,
            last_error: None,
        }
    }
}

/// Polls one domain's connection status
///
/// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
pub struct VerificationPoller<'a, A: DomainApi + ?Sized> {
    api: &'a A,
    interval: Duration,
    max_duration: Duration,
}

impl<'a, A: DomainApi + ?Sized> VerificationPoller<'a, A> {
    #[must_use]
    pub fn new(api: &'a A, config: &SetupConfig) -> Self {
        Self {
            api,
            interval: config.poll_interval().max(MIN_POLL_INTERVAL),
            max_duration: config.max_poll_duration(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Poll `domain` under `mode`'s rules
    ///
    /// The first attempt is immediate. Cancellation is checked before the
    /// deadline, and both before the next tick.
    pub async fn run(&self, domain: &str, mode: Mode, mut cancel: CancelSignal) -> PollReport {
        let mut report = PollReport::new();
        let deadline = tokio::time::sleep(self.max_duration);
        tokio::pin!(deadline);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    report.result = PollResult::Cancelled;
                    break;
                }
                () = &mut deadline => {
                    report.result = PollResult::TimedOut;
                    break;
                }
                _ = ticker.tick() => {
                    report.attempts += 1;
                    match self.api.fetch_connection_snapshot(domain).await {
                        Ok(snapshot) => {
                            let outcome = evaluate(mode, &snapshot);
                            let connected = outcome.is_success();
                            report.last_outcome = Some(outcome);
                            if connected {
                                report.result = PollResult::Connected;
                                break;
                            }
                        }
                        Err(error) => {
                            tracing::warn!(%domain, attempt = report.attempts, %error, "snapshot fetch failed");
                            report.last_error = Some(error);
                        }
                    }
                }
            }
        }

        tracing::info!(
            %domain,
            %mode,
            result = ?report.result,
            attempts = report.attempts,
            "verification polling finished"
        );
        report
    }
}
