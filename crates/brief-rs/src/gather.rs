//! Failure-isolated signal gathering under a latency budget.
//!
//! Every optional signal is a fallible future. [`SignalGatherer`] runs them
//! concurrently, gives each one the same timeout, and stops waiting
//! altogether at a global deadline. A signal that succeeds in time is
//! stored into a caller-owned accumulator; any other outcome leaves the
//! accumulator's default in place. That rule lives in one function,
//! [`settle`].
//!
//! ```ignore
//! #[derive(Default)]
//! struct Collected {
//!     git: Option<GitInfo>,
//!     specs: SpecProgress,
//! }
//!
//! let mut collected = Collected::default();
//! SignalGatherer::new(Duration::from_secs(3))
//!     .task_timeout(Duration::from_secs(2))
//!     .signal("git", git_future, |info, c| c.git = Some(info))
//!     .signal("specs", spec_future, |progress, c| c.specs = progress)
//!     .run(&mut collected)
//!     .await;
//! ```

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::sources::SourceError;

/// Default-on-failure combinator for optional signals.
///
/// Returns the value on success. On failure the error is traced and `None`
/// is returned; the caller keeps that signal's documented default. Nothing
/// is retried and nothing reaches the banner.
pub fn settle<T>(signal: &str, outcome: Result<T, SourceError>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(signal, error = %e, "Signal unavailable, using default");
            None
        }
    }
}

/// A settled success, ready to be written into the accumulator.
type Apply<S> = Box<dyn FnOnce(&mut S) + Send>;

/// A registered signal: its name and a future that settles it.
struct PendingSignal<S> {
    name: String,
    settled: Pin<Box<dyn Future<Output = Option<Apply<S>>> + Send>>,
}

/// Concurrent gatherer for optional signals.
///
/// Each `store` closure writes its own field of `S`, so the result does not
/// depend on the order in which signals finish.
pub struct SignalGatherer<S> {
    signals: Vec<PendingSignal<S>>,
    deadline: Duration,
    task_timeout: Duration,
}

impl<S: Send + 'static> SignalGatherer<S> {
    /// Gatherer that stops waiting `deadline` after [`run`](Self::run)
    /// starts. Each signal also gets a 2 s timeout unless overridden.
    pub fn new(deadline: Duration) -> Self {
        Self {
            signals: Vec::new(),
            deadline,
            task_timeout: Duration::from_secs(2),
        }
    }

    /// Time allowed to each individual signal.
    pub fn task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }

    /// Register a signal. `store` runs only if `future` succeeds within the
    /// task timeout and before the deadline.
    pub fn signal<V, Fut, F>(mut self, name: &str, future: Fut, store: F) -> Self
    where
        V: Send + 'static,
        Fut: Future<Output = Result<V, SourceError>> + Send + 'static,
        F: FnOnce(V, &mut S) + Send + 'static,
    {
        let limit = self.task_timeout;
        let label = name.to_string();
        let settled = Box::pin(async move {
            let outcome = tokio::time::timeout(limit, future)
                .await
                .unwrap_or_else(|_| {
                    Err(SourceError::Timeout {
                        signal: label.clone(),
                        timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                });
            settle(&label, outcome).map(|value| Box::new(move |s: &mut S| store(value, s)) as Apply<S>)
        });

        self.signals.push(PendingSignal {
            name: name.to_string(),
            settled,
        });
        self
    }

    /// Run every registered signal and store the successes into `state`.
    ///
    /// Returns once all signals have settled or the deadline passes,
    /// whichever comes first. Signals still running at that point are
    /// aborted.
    pub async fn run(self, state: &mut S) {
        let Self {
            signals, deadline, ..
        } = self;
        if signals.is_empty() {
            return;
        }

        let total = signals.len();
        let mut outstanding: BTreeSet<String> = signals.iter().map(|s| s.name.clone()).collect();
        let mut running = JoinSet::new();
        for PendingSignal { name, settled } in signals {
            running.spawn(async move { (name, settled.await) });
        }

        let cutoff = Instant::now() + deadline;
        let mut stored = 0usize;
        loop {
            match tokio::time::timeout_at(cutoff, running.join_next()).await {
                Ok(Some(Ok((name, apply)))) => {
                    outstanding.remove(&name);
                    if let Some(apply) = apply {
                        apply(state);
                        stored += 1;
                    }
                }
                Ok(Some(Err(e))) => warn!("Signal task panicked: {e}"),
                Ok(None) => break,
                Err(_) => {
                    debug!(abandoned = ?outstanding, "Signal deadline reached");
                    break;
                }
            }
        }
        running.abort_all();

        info!(
            stored,
            total,
            deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            "Signals gathered"
        );
    }
}
