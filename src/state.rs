//! View lifecycle: the loading/ready machine and the scope that owns a view's
//! in-flight work.

use crate::errors::RetrievalError;
use crate::store::{Action, Dispatch, Operation};

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// Identifies one load or refresh; only the most recent one may settle the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Idle,
    Loading,
    Ready { data: T, refreshing: bool },
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct ViewState<T> {
    phase: Phase<T>,
    issued: u64,
    last_error: Option<String>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            issued: 0,
            last_error: None,
        }
    }
}

impl<T> ViewState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase<T> {
        &self.phase
    }

    pub fn data(&self) -> Option<&T> {
        match &self.phase {
            Phase::Ready { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(
            self.phase,
            Phase::Ready {
                refreshing: true,
                ..
            }
        )
    }

    /// Reason of the most recent failed load or refresh, cleared by a success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// The view was (re)mounted: any previous data is discarded
    pub fn mount(&mut self) -> Ticket {
        self.phase = Phase::Loading;
        self.issue()
    }

    /// Pull-to-refresh. Keeps showing the current data while the fetch runs
    /// and supersedes any fetch that is still pending.
    pub fn refresh(&mut self) -> Ticket {
        let phase = std::mem::replace(&mut self.phase, Phase::Loading);
        self.phase = match phase {
            Phase::Ready { data, .. } => Phase::Ready {
                data,
                refreshing: true,
            },
            Phase::Idle | Phase::Loading | Phase::Failed { .. } => Phase::Loading,
        };
        self.issue()
    }

    /// Settle the fetch identified by `ticket`.
    ///
    /// Returns `false` when a newer load or refresh has been started since, in
    /// which case the outcome is ignored.
    pub fn complete<E: Display>(&mut self, ticket: Ticket, result: Result<T, E>) -> bool {
        if ticket.0 != self.issued {
            tracing::trace!(ticket = ticket.0, latest = self.issued, "Ignoring superseded fetch");
            return false;
        }

        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        self.phase = match (phase, result) {
            (_, Ok(data)) => {
                self.last_error = None;
                Phase::Ready {
                    data,
                    refreshing: false,
                }
            }
            (Phase::Ready { data, .. }, Err(e)) => {
                self.last_error = Some(e.to_string());
                Phase::Ready {
                    data,
                    refreshing: false,
                }
            }
            (_, Err(e)) => {
                let error = e.to_string();
                self.last_error = Some(error.clone());
                Phase::Failed { error }
            }
        };

        true
    }
}

/// Lifetime of a consuming view. Work started through [`ViewScope::run`] is
/// cancelled on [`ViewScope::teardown`], and dispatchers obtained from
/// [`ViewScope::dispatcher`] stop forwarding.
#[derive(Debug, Clone)]
pub struct ViewScope {
    torn_down: Arc<watch::Sender<bool>>,
}

impl Default for ViewScope {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            torn_down: Arc::new(tx),
        }
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !*self.torn_down.borrow()
    }

    pub fn teardown(&self) {
        self.torn_down.send_replace(true);
    }

    /// Resolves once the scope has been torn down
    pub async fn torn_down(&self) {
        let mut torn_down = self.torn_down.subscribe();
        // The sender lives as long as `self`, so this only returns on teardown
        let _ = torn_down.wait_for(|v| *v).await;
    }

    pub async fn run<F: Future>(
        &self,
        operation: Operation,
        work: F,
    ) -> Result<F::Output, RetrievalError> {
        if !self.is_active() {
            return Err(RetrievalError::Cancelled(operation));
        }

        tokio::select! {
            biased;
            _ = self.torn_down() => Err(RetrievalError::Cancelled(operation)),
            output = work => Ok(output),
        }
    }

    /// Like [`ViewScope::run`] for work that can fail on its own
    pub async fn try_run<T, F>(&self, operation: Operation, work: F) -> Result<T, RetrievalError>
    where
        F: Future<Output = Result<T, RetrievalError>>,
    {
        self.run(operation, work).await?
    }

    pub fn dispatcher<'a>(&'a self, inner: &'a dyn Dispatch) -> ScopedDispatch<'a> {
        ScopedDispatch { scope: self, inner }
    }
}

pub struct ScopedDispatch<'a> {
    scope: &'a ViewScope,
    inner: &'a dyn Dispatch,
}

impl Dispatch for ScopedDispatch<'_> {
    fn dispatch(&self, action: Action) {
        if self.scope.is_active() {
            self.inner.dispatch(action);
        } else {
            tracing::debug!(operation = %action.operation(), "View is gone, dropping action");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::recorder::RecordingDispatch;
    use std::time::Duration;

    #[test]
    fn test_mount_then_success() {
        let mut view: ViewState<Vec<u32>> = ViewState::new();
        assert_eq!(&Phase::Idle, view.phase());

        let ticket = view.mount();
        assert!(view.is_loading());

        assert!(view.complete::<String>(ticket, Ok(vec![1, 2])));
        assert_eq!(Some(&vec![1, 2]), view.data());
        assert!(!view.is_refreshing());
    }

    #[test]
    fn test_failed_mount_is_observable() {
        let mut view: ViewState<u32> = ViewState::new();
        let ticket = view.mount();
        view.complete(ticket, Err("Server responded with status 500"));

        assert_eq!(
            &Phase::Failed {
                error: "Server responded with status 500".to_string()
            },
            view.phase()
        );
        assert!(!view.is_loading());

        // Refreshing a failed view retries the initial load
        let ticket = view.refresh();
        assert!(view.is_loading());
        view.complete::<String>(ticket, Ok(7));
        assert_eq!(Some(&7), view.data());
        assert_eq!(None, view.last_error());
    }

    #[test]
    fn test_failed_refresh_keeps_data_and_clears_flag() {
        let mut view: ViewState<u32> = ViewState::new();
        let ticket = view.mount();
        view.complete::<String>(ticket, Ok(1));

        let ticket = view.refresh();
        assert!(view.is_refreshing());
        assert_eq!(Some(&1), view.data());

        view.complete(ticket, Err("timeout"));
        assert!(!view.is_refreshing());
        assert_eq!(Some(&1), view.data());
        assert_eq!(Some("timeout"), view.last_error());
    }

    #[test]
    fn test_overlapping_refreshes() {
        let mut view: ViewState<u32> = ViewState::new();
        let ticket = view.mount();
        view.complete::<String>(ticket, Ok(1));

        let first = view.refresh();
        let second = view.refresh();

        // The superseded fetch neither lands data nor clears the flag
        assert!(!view.complete::<String>(first, Ok(2)));
        assert!(view.is_refreshing());
        assert_eq!(Some(&1), view.data());

        assert!(view.complete(second, Err("connection reset")));
        assert!(!view.is_refreshing());
        assert_eq!(Some(&1), view.data());
    }

    #[test]
    fn test_refresh_while_initial_load_pending() {
        let mut view: ViewState<u32> = ViewState::new();
        let first = view.mount();
        let second = view.refresh();
        assert!(view.is_loading());

        assert!(!view.complete(first, Err("stale")));
        assert!(view.is_loading());

        assert!(view.complete::<String>(second, Ok(3)));
        assert_eq!(Some(&3), view.data());
    }

    #[test]
    fn test_remount_discards_data() {
        let mut view: ViewState<u32> = ViewState::new();
        let ticket = view.mount();
        view.complete::<String>(ticket, Ok(1));

        view.mount();
        assert!(view.is_loading());
        assert_eq!(None, view.data());
    }

    #[tokio::test]
    async fn test_scope_runs_work() {
        let scope = ViewScope::new();
        let result = scope.run(Operation::Weather, async { 42 }).await;
        assert_eq!(42, result.unwrap());
    }

    #[tokio::test]
    async fn test_teardown_cancels_pending_work() {
        let scope = ViewScope::new();
        let handle = {
            let scope = scope.clone();
            tokio::spawn(async move {
                scope
                    .run(Operation::VideoDetails, tokio::time::sleep(Duration::from_secs(30)))
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        scope.teardown();

        let result = handle.await.unwrap();
        assert!(matches!(
            result,
            Err(RetrievalError::Cancelled(Operation::VideoDetails))
        ));

        // Nothing new starts once the view is gone
        let result = scope.run(Operation::VideoDetails, async {}).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_try_run_flattens_and_cancels() {
        let scope = ViewScope::new();
        let failed: Result<u32, RetrievalError> = scope
            .try_run(Operation::Weather, async {
                Err(RetrievalError::Cancelled(Operation::Weather))
            })
            .await;
        assert!(failed.is_err());
        assert_eq!(
            5,
            scope
                .try_run(Operation::Weather, async { Ok::<_, RetrievalError>(5) })
                .await
                .unwrap()
        );

        // A teardown from elsewhere interrupts a retrieval that is still waiting
        let signal = scope.clone();
        let (result, _) = tokio::join!(
            scope.try_run(Operation::FishingReports, async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, RetrievalError>(())
            }),
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                signal.teardown();
            }
        );
        assert!(matches!(
            result,
            Err(RetrievalError::Cancelled(Operation::FishingReports))
        ));

        // Already torn down
        tokio::time::timeout(Duration::from_secs(1), scope.torn_down())
            .await
            .unwrap();
    }

    #[test]
    fn test_scoped_dispatch_drops_after_teardown() {
        let scope = ViewScope::new();
        let recorder = RecordingDispatch::default();
        let dispatch = scope.dispatcher(&recorder);

        dispatch.dispatch(Action::RetrievalFailed {
            operation: Operation::Weather,
            reason: "first".to_string(),
        });
        scope.teardown();
        dispatch.dispatch(Action::RetrievalFailed {
            operation: Operation::Weather,
            reason: "second".to_string(),
        });

        assert_eq!(1, recorder.actions().len());
    }
}
