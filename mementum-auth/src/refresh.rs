//! Single-flight session refresh.
//!
//! When several requests fail with 401 at once, only one refresh call may
//! reach the backend: a server that rotates the refresh credential on use
//! would reject every call after the first. [`RefreshCoordinator`] holds the
//! in-flight refresh and hands every caller that arrives while it runs a
//! handle to the same future.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use tracing::debug;

/// How a refresh attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The backend issued a new session cookie.
    Renewed,
    /// The backend answered with a non-success status.
    Rejected {
        /// HTTP status code.
        status: u16,
    },
    /// The refresh call got no response.
    Unreachable {
        /// Transport error message.
        reason: String,
    },
}

impl RefreshOutcome {
    /// Whether the session was renewed.
    pub fn is_renewed(&self) -> bool {
        matches!(self, Self::Renewed)
    }
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renewed => write!(f, "session renewed"),
            Self::Rejected { status } => write!(f, "refresh rejected with status {}", status),
            Self::Unreachable { reason } => write!(f, "refresh failed: {}", reason),
        }
    }
}

/// Whether a refresh is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// No refresh in flight.
    Idle,
    /// A refresh is in flight; new callers join it.
    Refreshing,
}

type InFlight = Shared<BoxFuture<'static, RefreshOutcome>>;

#[derive(Default)]
struct Slot {
    started: u64,
    inflight: Option<(u64, InFlight)>,
}

/// Runs at most one refresh at a time and shares its outcome.
///
/// The in-flight marker is cleared by the refresh future itself as it
/// settles, before any waiter sees the outcome. A caller arriving after that
/// point starts a new refresh rather than reusing a stale result.
#[derive(Clone, Default)]
pub struct RefreshCoordinator {
    slot: Arc<Mutex<Slot>>,
}

impl fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("state", &self.state())
            .field("started", &self.refreshes_started())
            .finish()
    }
}

impl RefreshCoordinator {
    /// Create an idle coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> RefreshState {
        if self.slot.lock().inflight.is_some() {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }

    /// Number of refreshes started over the coordinator's lifetime.
    pub fn refreshes_started(&self) -> u64 {
        self.slot.lock().started
    }

    /// Join the in-flight refresh, or start one with `refresh`.
    ///
    /// `refresh` is only invoked when no refresh is running. It is called
    /// while the coordinator's lock is held, so it must only build the
    /// future, not poll it. Every caller of the same round receives a clone
    /// of the same outcome. Dropping the caller that started the refresh does
    /// not cancel it for the others.
    pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome> + Send + 'static,
    {
        let inflight = {
            let mut slot = self.slot.lock();
            let joined = slot
                .inflight
                .as_ref()
                .map(|(round, fut)| (*round, fut.clone()));
            match joined {
                Some((round, fut)) => {
                    debug!(round, "Joining in-flight session refresh");
                    fut
                }
                None => {
                    slot.started += 1;
                    let round = slot.started;
                    debug!(round, "Starting session refresh");
                    let fut = settle(Arc::downgrade(&self.slot), round, refresh())
                        .boxed()
                        .shared();
                    slot.inflight = Some((round, fut.clone()));
                    fut
                }
            }
        };

        inflight.await
    }
}

async fn settle<Fut>(slot: Weak<Mutex<Slot>>, round: u64, attempt: Fut) -> RefreshOutcome
where
    Fut: Future<Output = RefreshOutcome>,
{
    let outcome = attempt.await;
    if let Some(slot) = slot.upgrade() {
        let mut slot = slot.lock();
        if slot.inflight.as_ref().map(|(r, _)| *r) == Some(round) {
            slot.inflight = None;
        }
    }
    debug!(round, outcome = %outcome, "Session refresh settled");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn counting(
        calls: &Arc<AtomicU32>,
        delay: Duration,
        outcome: RefreshOutcome,
    ) -> impl FnOnce() -> BoxFuture<'static, RefreshOutcome> {
        let calls = Arc::clone(calls);
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                outcome
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_single_refresh() {
        let coordinator = RefreshCoordinator::new();
        let calls = Arc::new(AtomicU32::new(0));

        let outcome = coordinator
            .run(counting(&calls, Duration::ZERO, RefreshOutcome::Renewed))
            .await;

        assert!(outcome.is_renewed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let coordinator = RefreshCoordinator::new();
        let calls = Arc::new(AtomicU32::new(0));

        let waiters = (0..10).map(|_| {
            coordinator.run(counting(
                &calls,
                Duration::from_millis(50),
                RefreshOutcome::Renewed,
            ))
        });
        let outcomes = join_all(waiters).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.refreshes_started(), 1);
        assert!(outcomes.iter().all(RefreshOutcome::is_renewed));
        assert_eq!(coordinator.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn test_failure_reaches_every_waiter() {
        let coordinator = RefreshCoordinator::new();
        let calls = Arc::new(AtomicU32::new(0));
        let rejected = RefreshOutcome::Rejected { status: 401 };

        let outcomes = join_all((0..5).map(|_| {
            coordinator.run(counting(&calls, Duration::from_millis(20), rejected.clone()))
        }))
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(outcomes.iter().all(|o| *o == rejected));
    }

    #[tokio::test]
    async fn test_sequential_rounds_refresh_again() {
        let coordinator = RefreshCoordinator::new();
        let calls = Arc::new(AtomicU32::new(0));

        coordinator
            .run(counting(&calls, Duration::ZERO, RefreshOutcome::Renewed))
            .await;
        coordinator
            .run(counting(&calls, Duration::ZERO, RefreshOutcome::Renewed))
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(coordinator.refreshes_started(), 2);
    }

    #[tokio::test]
    async fn test_state_while_refreshing() {
        let coordinator = RefreshCoordinator::new();
        let gate = Arc::new(Notify::new());

        let task = {
            let coordinator = coordinator.clone();
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                coordinator
                    .run(move || async move {
                        gate.notified().await;
                        RefreshOutcome::Renewed
                    })
                    .await
            })
        };

        while coordinator.state() == RefreshState::Idle {
            tokio::task::yield_now().await;
        }
        assert_eq!(coordinator.state(), RefreshState::Refreshing);

        gate.notify_one();
        assert!(task.await.unwrap().is_renewed());
        assert_eq!(coordinator.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn test_cancelled_starter_does_not_strand_waiters() {
        let coordinator = RefreshCoordinator::new();
        let gate = Arc::new(Notify::new());

        let starter = {
            let coordinator = coordinator.clone();
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                coordinator
                    .run(move || async move {
                        gate.notified().await;
                        RefreshOutcome::Unreachable {
                            reason: "connection reset".into(),
                        }
                    })
                    .await
            })
        };

        while coordinator.state() == RefreshState::Idle {
            tokio::task::yield_now().await;
        }

        let follower = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .run(|| async { RefreshOutcome::Renewed })
                    .await
            })
        };
        tokio::task::yield_now().await;

        starter.abort();
        gate.notify_one();

        let outcome = follower.await.unwrap();
        assert!(matches!(outcome, RefreshOutcome::Unreachable { .. }));
        assert_eq!(coordinator.refreshes_started(), 1);
    }
}
