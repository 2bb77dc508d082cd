//! View reducer: the last applied snapshot plus the flags a page renders
//! around it.
//!
//! Every fetch takes a `RequestTicket` with a monotonic sequence number.
//! A response is applied only if its sequence number is not lower than
//! that of the last applied snapshot, so an older request resolving late
//! can never overwrite newer data. Failures never advance the guard: a
//! failed refresh cannot block an earlier request that still brings data.
//! Applied results replace the snapshot wholesale.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::FetchError;

const INTERRUPTED: &str = "The request was interrupted. Please try again.";

/// How a fetch affects the view while it runs and when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Mount and retry. Shows the loading state; failure replaces the view
    /// with an error panel.
    Foreground,
    /// Poll tick. Failure keeps the last snapshot on screen.
    Silent,
    /// User-triggered refresh. Silent, and disables the refresh control
    /// while in flight.
    Manual,
}

impl FetchMode {
    pub fn is_silent(self) -> bool {
        !matches!(self, Self::Foreground)
    }
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Foreground => write!(f, "foreground"),
            Self::Silent => write!(f, "silent"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub mode: FetchMode,
}

/// What the page shows as its main content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    /// No snapshot yet and a foreground fetch is running.
    Loading,
    /// A snapshot is displayed (possibly stale, see `error`).
    Ready,
    /// Foreground fetch failed: full error panel with retry.
    Failed,
}

/// Result of one fetch as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Response replaced the snapshot.
    Applied,
    /// Response was an error and was recorded in the view.
    Failed(FetchError),
    /// A newer response had already been applied.
    Discarded,
    /// A manual refresh was already in flight.
    Skipped,
    /// The view was unmounted before the response could be applied.
    Unmounted,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewState<T> {
    snapshot: Option<T>,
    error: Option<String>,
    phase: ViewPhase,
    foreground_in_flight: u32,
    silent_in_flight: u32,
    manual_in_flight: bool,
    next_seq: u64,
    last_applied_seq: u64,
    revision: u64,
    updated_at: Option<DateTime<Utc>>,
    mounted: bool,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewState<T> {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            error: None,
            phase: ViewPhase::Loading,
            foreground_in_flight: 0,
            silent_in_flight: 0,
            manual_in_flight: false,
            next_seq: 0,
            last_applied_seq: 0,
            revision: 0,
            updated_at: None,
            mounted: true,
        }
    }

    // ── Reads ───────────────────────────────────────────────

    pub fn snapshot(&self) -> Option<&T> {
        self.snapshot.as_ref()
    }

    /// Last error message. On a `Ready` view this is the non-blocking
    /// "could not refresh" indicator.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.foreground_in_flight > 0
    }

    pub fn is_refreshing(&self) -> bool {
        self.silent_in_flight > 0
    }

    /// The manual refresh control is disabled exactly while its request runs.
    pub fn refresh_disabled(&self) -> bool {
        self.manual_in_flight
    }

    /// Bumped on every mutation; a render layer can diff on it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Sequence number of the request that produced the current snapshot.
    pub fn last_applied_seq(&self) -> u64 {
        self.last_applied_seq
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // ── Transitions ─────────────────────────────────────────

    /// Start a request. Returns `None` when a manual refresh is requested
    /// while another one is still running.
    pub fn begin(&mut self, mode: FetchMode) -> Option<RequestTicket> {
        if mode == FetchMode::Manual && self.manual_in_flight {
            return None;
        }
        self.next_seq += 1;
        match mode {
            FetchMode::Foreground => {
                self.foreground_in_flight += 1;
                if self.snapshot.is_none() {
                    self.phase = ViewPhase::Loading;
                }
            }
            FetchMode::Silent => self.silent_in_flight += 1,
            FetchMode::Manual => {
                self.silent_in_flight += 1;
                self.manual_in_flight = true;
            }
        }
        self.revision += 1;
        Some(RequestTicket {
            seq: self.next_seq,
            mode,
        })
    }

    /// Apply a response. Does not clear in-flight flags; see `finish`.
    pub fn apply(&mut self, ticket: RequestTicket, result: Result<T, FetchError>) -> FetchOutcome {
        if ticket.seq < self.last_applied_seq {
            return FetchOutcome::Discarded;
        }
        self.revision += 1;

        match result {
            Ok(snapshot) => {
                self.last_applied_seq = ticket.seq;
                self.snapshot = Some(snapshot);
                self.error = None;
                self.phase = ViewPhase::Ready;
                self.updated_at = Some(Utc::now());
                FetchOutcome::Applied
            }
            Err(err) => {
                self.error = Some(err.display_message());
                if !ticket.mode.is_silent() {
                    self.snapshot = None;
                    self.phase = ViewPhase::Failed;
                }
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Release the flags taken by `begin`. Runs for every ticket, whatever
    /// happened to the request.
    pub fn finish(&mut self, ticket: RequestTicket) {
        match ticket.mode {
            FetchMode::Foreground => {
                self.foreground_in_flight = self.foreground_in_flight.saturating_sub(1);
            }
            FetchMode::Silent => {
                self.silent_in_flight = self.silent_in_flight.saturating_sub(1);
            }
            FetchMode::Manual => {
                self.silent_in_flight = self.silent_in_flight.saturating_sub(1);
                self.manual_in_flight = false;
            }
        }
        // Nothing left that could fill the view: never leave the spinner up.
        if ticket.mode == FetchMode::Foreground
            && self.foreground_in_flight == 0
            && self.phase == ViewPhase::Loading
        {
            self.phase = ViewPhase::Failed;
            self.error.get_or_insert_with(|| INTERRUPTED.to_string());
        }
        self.revision += 1;
    }

    pub(crate) fn mark_unmounted(&mut self) -> bool {
        std::mem::replace(&mut self.mounted, false)
    }
}
