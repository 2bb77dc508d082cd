//! Poll timer lifecycle: `Idle` or `Polling(handle)`.
//!
//! The poller owns at most one timer task. "Whether to poll" comes from
//! `condition_changed`; "what to poll" is the ticker closure passed in by
//! the view. Under `RearmPolicy::Stable` a content update that leaves the
//! condition and interval unchanged keeps the running timer and its phase.

use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RearmPolicy {
    /// Keep the running timer unless polling toggles or the interval changes.
    #[default]
    Stable,
    /// Tear down and re-create the timer on every applied snapshot while
    /// polling is wanted. The next tick is one full interval away.
    ResetPhase,
}

#[derive(Debug)]
pub enum PollState {
    Idle,
    Polling {
        interval: Duration,
        task: JoinHandle<()>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTransition {
    /// Timer created from idle.
    Armed,
    /// Running timer replaced by a new one.
    Rearmed,
    /// Running timer left untouched.
    Kept,
    /// Running timer cancelled.
    Stopped,
    /// Was idle, stays idle.
    StayedIdle,
}

#[derive(Debug)]
pub struct Poller {
    state: PollState,
    policy: RearmPolicy,
    arm_count: u64,
}

impl Poller {
    pub fn new(policy: RearmPolicy) -> Self {
        Self {
            state: PollState::Idle,
            policy,
            arm_count: 0,
        }
    }

    pub fn is_polling(&self) -> bool {
        matches!(self.state, PollState::Polling { .. })
    }

    pub fn interval(&self) -> Option<Duration> {
        match &self.state {
            PollState::Polling { interval, .. } => Some(*interval),
            PollState::Idle => None,
        }
    }

    /// How many timers this poller has created so far.
    pub fn arm_count(&self) -> u64 {
        self.arm_count
    }

    pub fn policy(&self) -> RearmPolicy {
        self.policy
    }

    /// Ensure a timer runs at `interval`. An existing timer at the same
    /// interval is kept.
    pub fn start<F>(&mut self, interval: Duration, spawn: F) -> PollTransition
    where
        F: FnOnce(Duration) -> JoinHandle<()>,
    {
        match &self.state {
            PollState::Polling { interval: current, .. } if *current == interval => PollTransition::Kept,
            PollState::Polling { .. } => {
                self.replace(interval, spawn);
                PollTransition::Rearmed
            }
            PollState::Idle => {
                self.replace(interval, spawn);
                PollTransition::Armed
            }
        }
    }

    /// Cancel the timer. The task is aborted before this returns, so no
    /// further tick body can start.
    pub fn stop(&mut self) -> PollTransition {
        match std::mem::replace(&mut self.state, PollState::Idle) {
            PollState::Polling { task, .. } => {
                task.abort();
                PollTransition::Stopped
            }
            PollState::Idle => PollTransition::StayedIdle,
        }
    }

    /// Re-derive polling from the latest state. Call once per state change,
    /// never from inside a tick.
    pub fn condition_changed<F>(&mut self, should_poll: bool, interval: Duration, spawn: F) -> PollTransition
    where
        F: FnOnce(Duration) -> JoinHandle<()>,
    {
        if !should_poll {
            return self.stop();
        }
        match (&self.state, self.policy) {
            (PollState::Polling { .. }, RearmPolicy::ResetPhase) => {
                self.replace(interval, spawn);
                PollTransition::Rearmed
            }
            _ => self.start(interval, spawn),
        }
    }

    fn replace<F>(&mut self, interval: Duration, spawn: F)
    where
        F: FnOnce(Duration) -> JoinHandle<()>,
    {
        if let PollState::Polling { task, .. } = std::mem::replace(&mut self.state, PollState::Idle) {
            task.abort();
        }
        let task = spawn(interval);
        self.arm_count += 1;
        self.state = PollState::Polling { interval, task };
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
