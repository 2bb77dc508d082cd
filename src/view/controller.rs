//! A mounted queue view: foreground fetch on mount, silent polling,
//! manual refresh, retry, and unmount.
//!
//! State lives in a `tokio::sync::watch` channel so a render layer can
//! subscribe to changes. Every mutation first checks the view is still
//! mounted, inside the same critical section, so nothing can update a
//! view after `unmount` returns.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use super::poller::{PollTransition, Poller, RearmPolicy};
use super::source::SnapshotSource;
use super::state::{FetchMode, FetchOutcome, RequestTicket, ViewPhase, ViewState};
use crate::error::FetchError;

/// Called on every 401/403 so the session owner can log the user out.
pub type AuthFailureHook = Arc<dyn Fn(&FetchError) + Send + Sync>;

/// Decides from the latest snapshot whether background polling should run.
pub type PollCondition<T> = Arc<dyn Fn(Option<&T>) -> bool + Send + Sync>;

// ═══════════════════════════════════════════════════════════
// Options
// ═══════════════════════════════════════════════════════════

pub struct ViewOptions<T> {
    pub interval: Duration,
    pub rearm: RearmPolicy,
    pub condition: Option<PollCondition<T>>,
    pub on_auth_failure: Option<AuthFailureHook>,
}

impl<T> ViewOptions<T> {
    /// Poll unconditionally at `interval`.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            rearm: RearmPolicy::default(),
            condition: None,
            on_auth_failure: None,
        }
    }

    pub fn with_rearm(mut self, rearm: RearmPolicy) -> Self {
        self.rearm = rearm;
        self
    }

    pub fn poll_while<F>(mut self, condition: F) -> Self
    where
        F: Fn(Option<&T>) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn on_auth_failure(mut self, hook: AuthFailureHook) -> Self {
        self.on_auth_failure = Some(hook);
        self
    }
}

// ═══════════════════════════════════════════════════════════
// Shared view internals
// ═══════════════════════════════════════════════════════════

struct Shared<S: SnapshotSource> {
    id: Uuid,
    source: S,
    state: watch::Sender<ViewState<S::Snapshot>>,
    poller: Mutex<Poller>,
    options: ViewOptions<S::Snapshot>,
}

impl<S: SnapshotSource> Shared<S> {
    fn is_mounted(&self) -> bool {
        self.state.borrow().is_mounted()
    }

    async fn run_fetch(self: &Arc<Self>, mode: FetchMode) -> FetchOutcome {
        let guard = match InFlight::begin(self, mode) {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };
        let ticket = guard.ticket;
        tracing::debug!(view_id = %self.id, seq = ticket.seq, %mode, "Fetch started");

        let result = self.source.fetch().await;

        if let Err(e) = &result {
            self.report_failure(ticket, e);
        }
        let outcome = guard.complete(result);

        match &outcome {
            FetchOutcome::Applied => {
                tracing::debug!(view_id = %self.id, seq = ticket.seq, "Snapshot applied");
                self.reevaluate_polling();
            }
            FetchOutcome::Discarded => {
                tracing::debug!(view_id = %self.id, seq = ticket.seq, %mode, "Out-of-order response discarded");
            }
            FetchOutcome::Unmounted => {
                tracing::debug!(view_id = %self.id, %mode, "Response arrived after unmount");
            }
            FetchOutcome::Failed(_) | FetchOutcome::Skipped => {}
        }
        outcome
    }

    fn report_failure(&self, ticket: RequestTicket, err: &FetchError) {
        if !self.is_mounted() {
            return;
        }
        if ticket.mode.is_silent() {
            tracing::debug!(view_id = %self.id, seq = ticket.seq, error = %err, "Background refresh failed");
        } else {
            tracing::warn!(view_id = %self.id, seq = ticket.seq, error = %err, "Fetch failed");
        }
        if err.is_auth_failure() {
            tracing::warn!(view_id = %self.id, status = ?err.status(), "Authentication rejected");
            if let Some(hook) = &self.options.on_auth_failure {
                hook(err);
            }
        }
    }

    /// Evaluate the poll condition against the current snapshot and hand
    /// the result to the poller. Runs once per applied snapshot. Without a
    /// condition only `ResetPhase` has anything to do here.
    fn reevaluate_polling(self: &Arc<Self>) {
        if self.options.condition.is_none() && self.options.rearm == RearmPolicy::Stable {
            return;
        }
        self.sync_poller();
    }

    fn sync_poller(self: &Arc<Self>) {
        let should_poll = match &self.options.condition {
            Some(condition) => {
                let state = self.state.borrow();
                state.is_mounted() && condition(state.snapshot())
            }
            None => self.is_mounted(),
        };

        let Ok(mut poller) = self.poller.lock() else {
            tracing::error!(view_id = %self.id, "Poller lock poisoned");
            return;
        };
        // Re-check under the poller lock: unmount holds it while stopping.
        let should_poll = should_poll && self.is_mounted();
        let weak = Arc::downgrade(self);
        let transition = poller.condition_changed(should_poll, self.options.interval, move |interval| {
            spawn_ticker(weak, interval)
        });
        match transition {
            PollTransition::Armed | PollTransition::Rearmed => {
                tracing::debug!(view_id = %self.id, interval_secs = self.options.interval.as_secs(), ?transition, "Poll timer armed");
            }
            PollTransition::Stopped => {
                tracing::debug!(view_id = %self.id, "Poll timer stopped");
            }
            PollTransition::Kept | PollTransition::StayedIdle => {}
        }
    }
}

/// Recurring timer task. Holds only a weak reference so a dropped view is
/// never kept alive by its own timer.
fn spawn_ticker<S: SnapshotSource>(view: Weak<Shared<S>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let Some(shared) = view.upgrade() else { break };
            if !shared.is_mounted() {
                break;
            }
            // Ticks never wait on the previous fetch, like a browser interval.
            tokio::spawn(async move {
                shared.run_fetch(FetchMode::Silent).await;
            });
        }
    })
}

// ═══════════════════════════════════════════════════════════
// InFlight: releases request flags on every exit path
// ═══════════════════════════════════════════════════════════

struct InFlight<'a, S: SnapshotSource> {
    shared: &'a Arc<Shared<S>>,
    ticket: RequestTicket,
    done: bool,
}

impl<'a, S: SnapshotSource> InFlight<'a, S> {
    fn begin(shared: &'a Arc<Shared<S>>, mode: FetchMode) -> Result<Self, FetchOutcome> {
        let mut ticket = Err(FetchOutcome::Unmounted);
        shared.state.send_if_modified(|state| {
            if !state.is_mounted() {
                return false;
            }
            match state.begin(mode) {
                Some(t) => {
                    ticket = Ok(t);
                    true
                }
                None => {
                    ticket = Err(FetchOutcome::Skipped);
                    false
                }
            }
        });
        ticket.map(|ticket| Self {
            shared,
            ticket,
            done: false,
        })
    }

    /// Apply the response and release the flags in one state change.
    fn complete(mut self, result: Result<S::Snapshot, FetchError>) -> FetchOutcome {
        self.done = true;
        let ticket = self.ticket;
        let mut outcome = FetchOutcome::Unmounted;
        self.shared.state.send_if_modified(|state| {
            if !state.is_mounted() {
                return false;
            }
            outcome = state.apply(ticket, result);
            state.finish(ticket);
            true
        });
        outcome
    }
}

impl<S: SnapshotSource> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        // Cancelled or panicked mid-request.
        let ticket = self.ticket;
        self.shared.state.send_if_modified(|state| {
            if !state.is_mounted() {
                return false;
            }
            state.finish(ticket);
            true
        });
    }
}

// ═══════════════════════════════════════════════════════════
// QueueView
// ═══════════════════════════════════════════════════════════

/// Handle to one mounted view. Dropping it unmounts the view.
pub struct QueueView<S: SnapshotSource> {
    shared: Arc<Shared<S>>,
}

impl<S: SnapshotSource> QueueView<S> {
    /// Mount: start the foreground fetch and arm the poll timer.
    ///
    /// Must be called from within a tokio runtime. Returns immediately;
    /// use `loaded()` or `subscribe()` to wait for data.
    pub fn mount(source: S, options: ViewOptions<S::Snapshot>) -> Self {
        let (state, _) = watch::channel(ViewState::new());
        let shared = Arc::new(Shared {
            id: Uuid::new_v4(),
            source,
            state,
            poller: Mutex::new(Poller::new(options.rearm)),
            options,
        });
        tracing::info!(
            view_id = %shared.id,
            source = %shared.source.describe(),
            interval_secs = shared.options.interval.as_secs(),
            "View mounted"
        );

        let initial = shared.clone();
        tokio::spawn(async move {
            initial.run_fetch(FetchMode::Foreground).await;
        });
        shared.sync_poller();

        Self { shared }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn source(&self) -> &S {
        &self.shared.source
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState<S::Snapshot>> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> ViewState<S::Snapshot> {
        self.shared.state.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<S::Snapshot> {
        self.shared.state.borrow().snapshot().cloned()
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.is_mounted()
    }

    pub fn is_polling(&self) -> bool {
        self.shared.poller.lock().map(|p| p.is_polling()).unwrap_or(false)
    }

    /// Number of timers created so far (re-arm diagnostics).
    pub fn timer_arm_count(&self) -> u64 {
        self.shared.poller.lock().map(|p| p.arm_count()).unwrap_or(0)
    }

    /// Wait until the initial load has settled (snapshot or error panel).
    pub async fn loaded(&self) -> ViewPhase {
        let mut rx = self.subscribe();
        // Bound first so the `Ref` is released before `rx` goes out of scope.
        let phase = match rx.wait_for(|s| s.phase() != ViewPhase::Loading || !s.is_mounted()).await {
            Ok(state) => state.phase(),
            Err(_) => self.shared.state.borrow().phase(),
        };
        phase
    }

    /// Manual refresh: a silent fetch that disables the refresh control
    /// while it runs. Returns `Skipped` if one is already running.
    pub async fn refresh(&self) -> FetchOutcome {
        tracing::info!(view_id = %self.shared.id, "Manual refresh");
        self.shared.run_fetch(FetchMode::Manual).await
    }

    /// Retry after a foreground failure.
    pub async fn retry(&self) -> FetchOutcome {
        tracing::info!(view_id = %self.shared.id, "Retry");
        self.shared.run_fetch(FetchMode::Foreground).await
    }

    /// `refresh` on its own task. The caller keeps rendering from
    /// `subscribe()` while the request runs.
    pub fn spawn_refresh(&self) -> JoinHandle<FetchOutcome> {
        tracing::info!(view_id = %self.shared.id, "Manual refresh");
        let shared = self.shared.clone();
        tokio::spawn(async move { shared.run_fetch(FetchMode::Manual).await })
    }

    /// `retry` on its own task.
    pub fn spawn_retry(&self) -> JoinHandle<FetchOutcome> {
        tracing::info!(view_id = %self.shared.id, "Retry");
        let shared = self.shared.clone();
        tokio::spawn(async move { shared.run_fetch(FetchMode::Foreground).await })
    }

    /// Stop polling and freeze the state. In-flight requests still resolve
    /// but their results are dropped.
    pub fn unmount(&self) {
        let mut was_mounted = false;
        self.shared.state.send_if_modified(|state| {
            was_mounted = state.mark_unmounted();
            was_mounted
        });
        if let Ok(mut poller) = self.shared.poller.lock() {
            poller.stop();
        }
        if was_mounted {
            tracing::info!(view_id = %self.shared.id, "View unmounted");
        }
    }
}

impl<S: SnapshotSource> Drop for QueueView<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
