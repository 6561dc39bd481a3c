//! Scheduler control state
//!
//! This module defines the control-state machine the scheduler transitions
//! through, and the cooperative pause primitive the workers block on.

use std::fmt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Lifecycle state of the scheduler
///
/// Transitions happen only through the scheduler's public operations:
/// `Idle -> Running -> {Paused <-> Running} -> Stopped`, with `Stopped`
/// re-enterable into `Running` via `start`. `Paused` is a cooperative
/// sub-state of `Running`, not a distinct execution mode for the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Created, nothing submitted yet
    Idle,
    /// Tasks are being executed
    Running,
    /// Running, but workers stall at their next checkpoint
    Paused,
    /// All in-flight work cancelled; restartable via `start`
    Stopped,
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlState::Idle => "idle",
            ControlState::Running => "running",
            ControlState::Paused => "paused",
            ControlState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Cooperative pause flag workers block on
///
/// A worker reaching its checkpoint while the gate is paused suspends on the
/// watch channel until the coordinator signals `resume`, instead of polling
/// in a sleep loop. The stop signal takes precedence: a cancellation fired
/// while a worker waits here wins over the pause flag.
#[derive(Debug)]
pub struct PauseGate {
    paused: watch::Sender<bool>,
}

impl Default for PauseGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PauseGate {
    /// Creates a gate in the resumed (open) state
    pub fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self { paused }
    }

    /// Raises the pause flag; workers stall at their next checkpoint
    pub fn pause(&self) {
        let _ = self.paused.send(true);
    }

    /// Clears the pause flag and wakes every waiting worker
    pub fn resume(&self) {
        let _ = self.paused.send(false);
    }

    /// Returns whether the gate is currently paused
    pub fn is_paused(&self) -> bool {
        *self.paused.borrow()
    }

    /// Suspends while the gate is paused
    ///
    /// Returns `true` once the gate is open, or `false` if `cancel` fired
    /// while waiting.
    pub async fn wait_while_paused(&self, cancel: &CancellationToken) -> bool {
        let mut rx = self.paused.subscribe();
        loop {
            if !*rx.borrow_and_update() {
                return true;
            }
            tokio::select! {
                _ = cancel.cancelled() => return false,
                changed = rx.changed() => {
                    // Sender dropped means the scheduler is gone; unblock.
                    if changed.is_err() {
                        return true;
                    }
                }
            }
        }
    }
}
