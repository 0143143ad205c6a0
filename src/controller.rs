//! Keeps a [`ListState`] synchronized with a server-side collection.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::{Api, Collection};
use crate::client::Client;
use crate::config::ListConfig;
use crate::error::{Error, Result, SelectionError};
use crate::list::{ListState, Seq};
use crate::notify::{Kind, LogNotifier, Notifier};
use crate::resource::Resource;

mod task;
use task::CancellableTask;

/// Fetches allowed in flight at once; ticks beyond this are skipped.
pub const MAX_IN_FLIGHT: usize = 4;

/// Title of the warning raised when a tick fails.
pub const CONNECTION_ISSUE: &str = "Connection Issue.";

/// Whether the poll loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Polling,
}

/// Outcome of a batch action over the selection.
#[derive(Debug)]
pub struct BatchReport<R> {
    pub succeeded: Vec<R>,
    pub failed: Vec<(R, Error)>,
}

impl<R> Default for BatchReport<R> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<R> BatchReport<R> {
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }
}

/// The poll task of one `start`..`stop` cycle.
struct Running {
    task: CancellableTask<()>,
    refresh: Arc<Notify>,
}

struct Shared<R: Resource, C, N> {
    collection: C,
    notifier: N,
    config: ListConfig<R>,
    state: Mutex<ListState<R>>,
    running: Mutex<Option<Running>>,
    next_seq: AtomicU64,
}

/// A live table over one REST collection.
///
/// [`start`](Self::start) spawns a poll loop on the current tokio runtime;
/// the loop fetches immediately and then once per configured interval,
/// replacing the snapshot while keeping the filter and the selection.
/// Dropping the controller stops the loop.
pub struct ListController<R: Resource, C = Api<R>, N = LogNotifier> {
    shared: Arc<Shared<R, C, N>>,
}

impl<R: Resource> ListController<R, Api<R>, LogNotifier> {
    /// A controller over `R::PATH` that reports through the `log` facade.
    pub fn from_client(client: Client, config: ListConfig<R>) -> Self {
        Self::new(Api::new(client), LogNotifier, config)
    }
}

impl<R, C, N> ListController<R, C, N>
where
    R: Resource,
    C: Collection<R>,
    N: Notifier,
{
    pub fn new(collection: C, notifier: N, config: ListConfig<R>) -> Self {
        Self {
            shared: Arc::new(Shared {
                collection,
                notifier,
                config,
                state: Mutex::new(ListState::default()),
                running: Mutex::new(None),
                next_seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &ListConfig<R> {
        &self.shared.config
    }

    pub fn phase(&self) -> Phase {
        if self.shared.running.lock().is_some() {
            Phase::Polling
        } else {
            Phase::Idle
        }
    }

    /// Starts the poll loop. Returns `false` if it was already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut running = self.shared.running.lock();
        if running.is_some() {
            log::debug!("{} list already polling", R::KIND);
            return false;
        }

        let token = CancellationToken::new();
        let refresh = Arc::new(Notify::new());
        let join_handle = tokio::spawn(poll(
            Arc::clone(&self.shared),
            token.clone(),
            Arc::clone(&refresh),
        ));
        *running = Some(Running {
            task: CancellableTask { join_handle, token },
            refresh,
        });
        log::debug!(
            "polling {} every {:?}",
            R::PATH,
            self.shared.config.poll_interval()
        );
        true
    }

    /// Stops the poll loop. Returns `false` if it was not running.
    ///
    /// A response still in flight is discarded; it never reaches the state.
    pub fn stop(&self) -> bool {
        let Some(Running { task, .. }) = self.shared.running.lock().take() else {
            return false;
        };
        {
            // the loop applies snapshots under this lock after checking the token
            let _state = self.shared.state.lock();
            task.abort();
        }
        log::debug!("stopped polling {}", R::PATH);
        true
    }

    /// Stops the poll loop and waits for it to exit.
    pub async fn shutdown(&self) {
        let Some(Running { task, .. }) = self.shared.running.lock().take() else {
            return;
        };
        {
            let _state = self.shared.state.lock();
            task.token.cancel();
        }
        task.cancel().await;
    }

    /// Requests an immediate tick. Does nothing while the loop is stopped.
    pub fn refresh(&self) {
        if let Some(running) = self.shared.running.lock().as_ref() {
            running.refresh.notify_one();
        }
    }

    /// Runs `f` against the current state.
    pub fn with_state<T>(&self, f: impl FnOnce(&ListState<R>) -> T) -> T {
        f(&self.shared.state.lock())
    }

    pub fn unfiltered(&self) -> Arc<Vec<R>> {
        self.with_state(|state| Arc::clone(state.unfiltered()))
    }

    pub fn displayed(&self) -> Arc<Vec<R>> {
        self.with_state(|state| Arc::clone(state.displayed()))
    }

    pub fn selected(&self) -> Vec<R> {
        self.with_state(|state| state.selection().items().to_vec())
    }

    pub fn filter_text(&self) -> String {
        self.with_state(|state| state.filter_text().to_owned())
    }

    pub fn is_checked(&self, item: &R) -> bool {
        self.with_state(|state| state.selection().is_checked(item))
    }

    /// Changes the filter; the displayed set is recomputed before returning.
    pub fn set_filter_text(&self, text: impl Into<String>) {
        self.shared.state.lock().set_filter_text(text);
    }

    /// Returns whether `item` is selected afterwards.
    pub fn toggle_select(&self, item: R) -> bool {
        self.shared.state.lock().selection_mut().toggle(item)
    }

    pub fn select(&self, items: impl IntoIterator<Item = R>) {
        self.shared.state.lock().selection_mut().select_all(items);
    }

    pub fn set_checked(&self, item: R, checked: bool) {
        self.shared
            .state
            .lock()
            .selection_mut()
            .set_checked(item, checked);
    }

    pub fn reset_selection(&self) {
        self.shared.state.lock().selection_mut().clear();
    }

    /// The single selected item, for edit-style operations. Otherwise warns
    /// and returns why there is no unique target.
    pub fn single_selected(&self, verb: &str) -> Result<R, SelectionError> {
        let single = self.with_state(|state| state.selection().single().cloned());
        if let Err(err) = &single {
            let message = match err {
                SelectionError::NothingSelected => nothing_selected::<R>(),
                SelectionError::MultipleSelected(_) => {
                    format!("You cannot {verb} more than one {} at a time.", R::KIND)
                }
            };
            self.shared.notifier.notify(Kind::Warn, "Warning:", &message);
        }
        single
    }

    /// Deletes every selected item concurrently.
    ///
    /// Each success is announced and leaves the selection; each failure is
    /// announced and stays selected. A refresh follows the batch.
    pub async fn delete_selected(&self) -> BatchReport<R> {
        let shared = Arc::clone(&self.shared);
        self.run_on_selected("Deleted...", move |item| {
            let shared = Arc::clone(&shared);
            async move { shared.collection.delete(item.id()).await }
        })
        .await
    }

    /// Runs `action` on every selected item concurrently, with the same
    /// per-item reporting as [`delete_selected`](Self::delete_selected).
    /// `done` is the success message, e.g. `"API Key Updated..."`.
    pub async fn run_on_selected<F, Fut, T>(&self, done: &str, action: F) -> BatchReport<R>
    where
        F: Fn(R) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let targets = self.selected();
        if targets.is_empty() {
            self.shared
                .notifier
                .notify(Kind::Warn, "Warning:", &nothing_selected::<R>());
            return BatchReport::default();
        }

        let mut pending: FuturesUnordered<_> = targets
            .into_iter()
            .map(|item| {
                let fut = action(item.clone());
                async move { (item, fut.await) }
            })
            .collect();

        let mut report = BatchReport::default();
        while let Some((item, result)) = pending.next().await {
            let title = format!("{}: {}", R::KIND, item.label());
            match result {
                Ok(_) => {
                    self.shared
                        .state
                        .lock()
                        .selection_mut()
                        .deselect(item.id());
                    self.shared.notifier.notify(Kind::Success, &title, done);
                    report.succeeded.push(item);
                }
                Err(err) => {
                    log::debug!("{title} failed: {err}");
                    self.shared
                        .notifier
                        .notify(Kind::Error, &title, &format!("Error: {err}"));
                    report.failed.push((item, err));
                }
            }
        }

        self.refresh();
        report
    }
}

impl<R: Resource, C, N> Drop for ListController<R, C, N> {
    fn drop(&mut self) {
        if let Some(Running { task, .. }) = self.shared.running.lock().take() {
            let _state = self.shared.state.lock();
            task.abort();
        }
    }
}

fn nothing_selected<R: Resource>() -> String {
    format!("No {} Selected.", R::KIND)
}

type FetchFuture<R> = BoxFuture<'static, (Seq, Result<Vec<R>>)>;

impl<R, C, N> Shared<R, C, N>
where
    R: Resource,
    C: Collection<R>,
    N: Notifier,
{
    fn issue(self: &Arc<Self>, in_flight: &mut FuturesUnordered<FetchFuture<R>>) {
        if in_flight.len() >= MAX_IN_FLIGHT {
            log::warn!(
                "{} fetch(es) to {} still pending, skipping tick",
                in_flight.len(),
                R::PATH
            );
            return;
        }
        in_flight.push(self.fetch());
    }

    fn fetch(self: &Arc<Self>) -> FetchFuture<R> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("fetching {} (#{seq})", R::PATH);
        let shared = Arc::clone(self);
        async move {
            let result = shared.collection.list(shared.config.params()).await;
            (seq, result)
        }
        .boxed()
    }

    fn settle(&self, token: &CancellationToken, seq: Seq, result: Result<Vec<R>>) {
        match result {
            Ok(items) => {
                let items = self.config.retain(items);
                let count = items.len();
                let mut state = self.state.lock();
                if token.is_cancelled() {
                    return;
                }
                if state.apply(seq, items) {
                    log::debug!("{} #{seq}: {count} item(s)", R::PATH);
                }
            }
            Err(err) => {
                log::warn!("fetching {} (#{seq}) failed: {err}", R::PATH);
                if self.config.warns_on_fetch_error() && !token.is_cancelled() {
                    self.notifier
                        .notify(Kind::Warn, CONNECTION_ISSUE, &err.to_string());
                }
            }
        }
    }
}

async fn poll<R, C, N>(
    shared: Arc<Shared<R, C, N>>,
    token: CancellationToken,
    refresh: Arc<Notify>,
) where
    R: Resource,
    C: Collection<R>,
    N: Notifier,
{
    let mut ticker = time::interval(shared.config.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // slow fetches keep running; the sequence guard in `ListState::apply`
    // drops whichever response was issued before the last applied one
    let mut in_flight = FuturesUnordered::new();

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            Some((seq, result)) = in_flight.next(), if !in_flight.is_empty() => {
                shared.settle(&token, seq, result);
            }
            _ = ticker.tick() => shared.issue(&mut in_flight),
            () = refresh.notified() => shared.issue(&mut in_flight),
        }
    }
}
