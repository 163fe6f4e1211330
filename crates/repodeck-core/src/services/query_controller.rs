//! Debounced query controller.
//!
//! Watches the filter snapshot in the [`StateStore`] and turns settled filter
//! values into at most one search call each.
//!
//! # Concurrency Model
//!
//! - One long-lived task owns all controller state (timer, lease counter,
//!   in-flight handle); no locks
//! - Each filter change cancels and re-arms the single-slot [`DebounceTimer`]
//! - Searches run in spawned tasks and report back over a channel tagged with
//!   a lease number; only the latest lease is considered
//! - Results are committed with [`StateStore::dispatch_if`] against the filter
//!   snapshot they were issued for, so a response can never overwrite state
//!   that has moved on
//! - Losing the identity tears down pending work: the timer is cancelled and
//!   an in-flight search is aborted

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::{RepositorySummary, View};
use crate::ports::{SearchError, SearchPort, SearchRequest};
use crate::state::{Action, ExplorerState};

use super::debounce::DebounceTimer;
use super::store::StateStore;

/// Lease number of an issued search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lease(u64);

/// Message from a finished search task.
struct Completed {
    lease: Lease,
    request: SearchRequest,
    result: Result<Vec<RepositorySummary>, SearchError>,
}

/// The search currently allowed to commit results.
struct InFlight {
    lease: Lease,
    abort: AbortHandle,
}

/// Debounced search trigger.
///
/// Construct with [`QueryController::new`] and start with
/// [`QueryController::spawn`]; the task runs until the token is cancelled.
pub struct QueryController {
    store: StateStore,
    search: Arc<dyn SearchPort>,
    config: EngineConfig,
}

impl QueryController {
    pub fn new(store: StateStore, search: Arc<dyn SearchPort>, config: &EngineConfig) -> Self {
        Self {
            store,
            search,
            config: config.clone(),
        }
    }

    /// Start the controller task.
    ///
    /// Cancelling `cancel` drops the pending timer and aborts any in-flight
    /// search before the task exits.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(self, cancel: CancellationToken) {
        let (results_tx, results) = mpsc::unbounded_channel();
        let mut state = ControllerLoop {
            rx: self.store.subscribe(),
            timer: DebounceTimer::new(self.config.search_debounce()),
            store: self.store,
            search: self.search,
            page_size: self.config.page_size,
            results_tx,
            results,
            observed: None,
            signed_in: false,
            settled: None,
            in_flight: None,
            next_lease: 0,
        };

        state.observe_current();

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    state.shutdown();
                    break;
                }
                changed = state.rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    state.observe_current();
                }
                () = state.timer.expired(), if state.timer.is_armed() => {
                    state.issue();
                }
                Some(completed) = state.results.recv() => {
                    state.complete(completed);
                }
            }
        }

        debug!("Query controller stopped");
    }
}

/// Mutable controller state, owned by the controller task.
struct ControllerLoop {
    store: StateStore,
    search: Arc<dyn SearchPort>,
    page_size: u32,
    rx: tokio::sync::watch::Receiver<ExplorerState>,
    timer: DebounceTimer,
    results_tx: mpsc::UnboundedSender<Completed>,
    results: mpsc::UnboundedReceiver<Completed>,
    /// Last (search, view) pair seen; other state changes are ignored.
    observed: Option<(SearchRequest, View)>,
    /// Whether the last observed state carried an identity.
    signed_in: bool,
    /// Search whose results are displayed or on their way.
    settled: Option<SearchRequest>,
    in_flight: Option<InFlight>,
    next_lease: u64,
}

impl ControllerLoop {
    fn request_for(&self, state: &ExplorerState) -> SearchRequest {
        SearchRequest::from_filters(&state.filters, self.page_size)
    }

    /// React to the latest state if its filters changed in a way that matters.
    fn observe_current(&mut self) {
        let page_size = self.page_size;
        let (request, view, signed_in) = {
            let state = self.rx.borrow_and_update();
            (
                SearchRequest::from_filters(&state.filters, page_size),
                state.filters.view,
                state.identity.is_some(),
            )
        };

        if std::mem::replace(&mut self.signed_in, signed_in) && !signed_in {
            self.teardown();
        }

        if self
            .observed
            .as_ref()
            .is_some_and(|(r, v)| *r == request && *v == view)
        {
            return;
        }
        self.observed = Some((request.clone(), view));
        self.timer.cancel();

        if view != View::Discover {
            debug!("Search timer cancelled, not in discover view");
            return;
        }
        if self.settled.as_ref() == Some(&request) {
            debug!(query = %request.query, "Results already current, no search needed");
            return;
        }

        self.timer.rearm();
        debug!(query = %request.query, "Search timer armed");
    }

    /// Timer expired: issue a search for the filters as they are now.
    fn issue(&mut self) {
        let (request, view) = self
            .store
            .read(|state| (self.request_for(state), state.filters.view));
        if view != View::Discover {
            return;
        }

        if let Some(previous) = self.in_flight.take() {
            debug!(lease = previous.lease.0, "Aborting superseded search");
            previous.abort.abort();
        }
        self.settled = Some(request.clone());

        if request.is_empty() {
            let page_size = self.page_size;
            self.store.dispatch_if(
                move |state| is_current(state, &request, page_size),
                [
                    Action::SetSearchResults(Vec::new()),
                    Action::SetError(None),
                    Action::SetLoading(false),
                ],
            );
            debug!("Empty query, results cleared without a search");
            return;
        }

        self.next_lease += 1;
        let lease = Lease(self.next_lease);
        self.store.dispatch_if(
            |_| true,
            [Action::SetError(None), Action::SetLoading(true)],
        );
        debug!(lease = lease.0, query = %request.query, sort = request.sort.as_api_param(), "Issuing search");

        let search = Arc::clone(&self.search);
        let tx = self.results_tx.clone();
        let handle = tokio::spawn(async move {
            let result = search.search(&request).await;
            // The controller may already be gone; nothing to report to then.
            let _ = tx.send(Completed {
                lease,
                request,
                result,
            });
        });

        self.in_flight = Some(InFlight {
            lease,
            abort: handle.abort_handle(),
        });
    }

    /// A search finished: commit it if it is still the relevant one.
    fn complete(&mut self, completed: Completed) {
        let Completed {
            lease,
            request,
            result,
        } = completed;

        if self.in_flight.as_ref().map(|f| f.lease) != Some(lease) {
            debug!(lease = lease.0, "Dropping superseded search result");
            return;
        }
        self.in_flight = None;

        let page_size = self.page_size;
        let guard = |state: &ExplorerState| is_current(state, &request, page_size);

        let committed = match result {
            Ok(items) => {
                let count = items.len();
                let committed = self.store.dispatch_if(
                    guard,
                    [
                        Action::SetSearchResults(items),
                        Action::SetError(None),
                        Action::SetLoading(false),
                    ],
                );
                if committed {
                    debug!(lease = lease.0, count, "Search results applied");
                }
                committed
            }
            Err(err) => {
                warn!(lease = lease.0, error = %err, "Search failed");
                let committed = self.store.dispatch_if(
                    guard,
                    [
                        Action::SetError(Some(err.user_message().to_string())),
                        Action::SetLoading(false),
                    ],
                );
                // A failed search is not current; the next flip back or
                // re-entry of the same query tries again.
                self.settled = None;
                committed
            }
        };

        if !committed {
            debug!(lease = lease.0, "Search result no longer relevant, discarded");
            self.settled = None;
            self.store.dispatch(Action::SetLoading(false));
        }
    }

    /// Identity went away: drop the pending timer and any in-flight search.
    ///
    /// The filters stay observed, so only a later filter edit searches again.
    fn teardown(&mut self) {
        let was_armed = self.timer.is_armed();
        let aborted = self.in_flight.is_some();
        self.shutdown();
        if aborted {
            // Its results never arrived; the same query must search again.
            self.settled = None;
            self.store.dispatch(Action::SetLoading(false));
        }
        debug!(was_armed, aborted, "Search work torn down after identity loss");
    }

    fn shutdown(&mut self) {
        self.timer.cancel();
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort.abort();
        }
    }
}

/// Whether `request` still matches what the user is looking at.
fn is_current(state: &ExplorerState, request: &SearchRequest, page_size: u32) -> bool {
    state.filters.view == View::Discover
        && SearchRequest::from_filters(&state.filters, page_size) == *request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FiltersUpdate, Identity};
    use crate::ports::RATE_LIMITED_MESSAGE;
    use crate::ports::search::MockSearchPort;
    use crate::test_utils::repo_with_stars;
    use std::time::Duration;
    use tokio::time::sleep;

    const SETTLE: Duration = Duration::from_millis(700);

    /// Wraps a mock with one second of latency.
    struct Slow(MockSearchPort);

    #[async_trait::async_trait]
    impl SearchPort for Slow {
        async fn search(
            &self,
            request: &SearchRequest,
        ) -> Result<Vec<RepositorySummary>, SearchError> {
            sleep(Duration::from_secs(1)).await;
            self.0.search(request).await
        }
    }

    fn start(mock: Arc<MockSearchPort>) -> (StateStore, CancellationToken, JoinHandle<()>) {
        let store = StateStore::default();
        let cancel = CancellationToken::new();
        let search: Arc<dyn SearchPort> = mock;
        let handle = QueryController::new(store.clone(), search, &EngineConfig::default())
            .spawn(cancel.clone());
        (store, cancel, handle)
    }

    async fn stop(cancel: CancellationToken, handle: JoinHandle<()>) {
        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_coalesce_into_one_search() {
        let mut mock = MockSearchPort::new();
        mock.expect_search()
            .withf(|req| req.query == "react")
            .times(1)
            .returning(|_| Ok(vec![repo_with_stars(1, 10)]));
        let mock = Arc::new(mock);
        let (store, cancel, handle) = start(Arc::clone(&mock));

        for partial in ["r", "re", "rea", "reac", "react"] {
            store.dispatch(Action::UpdateFilters(FiltersUpdate::query(partial)));
            sleep(Duration::from_millis(100)).await;
        }
        sleep(SETTLE).await;

        let state = store.snapshot();
        assert_eq!(state.search_results.len(), 1);
        assert!(!state.ui.loading);

        stop(cancel, handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_skips_network() {
        let mut mock = MockSearchPort::new();
        mock.expect_search().times(0);
        let mock = Arc::new(mock);
        let (store, cancel, handle) = start(Arc::clone(&mock));

        store.dispatch(Action::SetSearchResults(vec![repo_with_stars(5, 1)]));
        store.dispatch(Action::UpdateFilters(FiltersUpdate::query("   ")));
        sleep(SETTLE).await;

        assert!(store.snapshot().search_results.is_empty());
        stop(cancel, handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_flip_does_not_search_again() {
        let mut mock = MockSearchPort::new();
        mock.expect_search()
            .times(1)
            .returning(|_| Ok(vec![repo_with_stars(1, 3), repo_with_stars(2, 2)]));
        let mock = Arc::new(mock);
        let (store, cancel, handle) = start(Arc::clone(&mock));

        store.dispatch(Action::UpdateFilters(FiltersUpdate::query("tokio")));
        sleep(SETTLE).await;
        let before = store.snapshot().search_results;

        store.dispatch(Action::UpdateFilters(FiltersUpdate::view(View::Bookmarks)));
        sleep(SETTLE).await;
        store.dispatch(Action::UpdateFilters(FiltersUpdate::view(View::Discover)));
        sleep(SETTLE).await;

        assert_eq!(store.snapshot().search_results, before);
        stop(cancel, handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_to_bookmarks_cancels_pending_timer() {
        let mut mock = MockSearchPort::new();
        mock.expect_search().times(0);
        let mock = Arc::new(mock);
        let (store, cancel, handle) = start(Arc::clone(&mock));

        store.dispatch(Action::UpdateFilters(FiltersUpdate::query("serde")));
        sleep(Duration::from_millis(200)).await;
        store.dispatch(Action::UpdateFilters(FiltersUpdate::view(View::Bookmarks)));
        sleep(SETTLE).await;

        stop(cancel, handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_failure_sets_error_and_clears_loading() {
        let mut mock = MockSearchPort::new();
        mock.expect_search()
            .times(1)
            .returning(|_| Err(SearchError::RateLimited));
        let mock = Arc::new(mock);
        let (store, cancel, handle) = start(Arc::clone(&mock));

        let prior = vec![repo_with_stars(9, 9)];
        store.dispatch(Action::SetSearchResults(prior.clone()));
        store.dispatch(Action::UpdateFilters(FiltersUpdate::query("axum")));
        sleep(SETTLE).await;

        let state = store.snapshot();
        assert_eq!(state.ui.error.as_deref(), Some(RATE_LIMITED_MESSAGE));
        assert!(!state.ui.loading);
        assert_eq!(*state.search_results, prior);

        stop(cancel, handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_identity_loss_cancels_pending_timer() {
        let mut mock = MockSearchPort::new();
        mock.expect_search().times(0);
        let mock = Arc::new(mock);
        let (store, cancel, handle) = start(Arc::clone(&mock));

        store.dispatch(Action::SetIdentity(Some(Identity::new("user-1"))));
        sleep(Duration::from_millis(10)).await;
        store.dispatch(Action::UpdateFilters(FiltersUpdate::query("react")));
        sleep(Duration::from_millis(100)).await;
        store.dispatch(Action::SetIdentity(None));
        sleep(SETTLE).await;

        assert!(!store.snapshot().ui.loading);
        stop(cancel, handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_identity_loss_aborts_in_flight_search() {
        let mut mock = MockSearchPort::new();
        mock.expect_search().times(0);
        let search: Arc<dyn SearchPort> = Arc::new(Slow(mock));
        let store = StateStore::default();
        let cancel = CancellationToken::new();
        let handle =
            QueryController::new(store.clone(), search, &EngineConfig::default()).spawn(cancel.clone());

        store.dispatch(Action::SetIdentity(Some(Identity::new("user-1"))));
        store.dispatch(Action::UpdateFilters(FiltersUpdate::query("react")));
        sleep(Duration::from_millis(650)).await;
        assert!(store.snapshot().ui.loading);

        store.dispatch(Action::SetIdentity(None));
        sleep(Duration::from_secs(2)).await;

        let state = store.snapshot();
        assert!(!state.ui.loading);
        assert!(state.search_results.is_empty());
        stop(cancel, handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_expiry_never_searches() {
        let mut mock = MockSearchPort::new();
        mock.expect_search().times(0);
        let mock = Arc::new(mock);
        let (store, cancel, handle) = start(Arc::clone(&mock));

        store.dispatch(Action::UpdateFilters(FiltersUpdate::query("hyper")));
        sleep(Duration::from_millis(100)).await;
        stop(cancel, handle).await;
        sleep(SETTLE).await;

        assert!(!store.snapshot().ui.loading);
    }
}
