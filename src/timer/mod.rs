// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cancellable delayed callbacks, one live timer per kind.
//!
//! A [`TimerScheduler`] keeps at most one armed timer for each
//! [`TimerKind`]. Arming a kind cancels whatever was armed for it before.
//! Each armed timer is identified by a [`TimerTicket`] carrying a generation
//! number, so a fire that was already in flight when its timer got replaced
//! can be recognized and discarded with [`TimerScheduler::claim`].
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use smart_switch::timer::{TimerKind, TimerScheduler};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut scheduler = TimerScheduler::new();
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//!
//! let ticket = scheduler.schedule(TimerKind::AutoOff, Duration::from_millis(10), move |ticket| {
//!     let _ = tx.send(ticket);
//! });
//!
//! let fired = rx.recv().await.unwrap();
//! assert_eq!(fired, ticket);
//! assert!(scheduler.claim(fired));
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio::task::JoinHandle;

/// The purpose of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Turns the switch off after it has been on for the configured time.
    AutoOff,
    /// Turns the switch on after it has been off for the configured time.
    AutoOn,
    /// Re-sends the restored state's payload after a reload.
    Resend,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AutoOff => "auto-off",
            Self::AutoOn => "auto-on",
            Self::Resend => "resend",
        })
    }
}

/// Identifies one arming of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTicket {
    kind: TimerKind,
    generation: u64,
}

impl TimerTicket {
    /// Returns the timer kind.
    #[must_use]
    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Returns the generation number of this arming.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle to a spawned timer task.
///
/// Cancelling is idempotent: cancelling twice, or cancelling a timer that
/// already fired, does nothing.
#[derive(Debug)]
pub struct TimerHandle {
    ticket: TimerTicket,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Returns the ticket of this timer.
    #[must_use]
    pub fn ticket(&self) -> TimerTicket {
        self.ticket
    }

    /// Cancels the timer if it has not fired yet.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns true if the timer task has completed or was cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Per-accessory timer slots.
///
/// Dropping the scheduler cancels every armed timer.
#[derive(Debug, Default)]
pub struct TimerScheduler {
    next_generation: u64,
    slots: HashMap<TimerKind, TimerHandle>,
}

impl TimerScheduler {
    /// Creates a scheduler with no armed timers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a timer of `kind` that calls `on_fire` after `delay`.
    ///
    /// Any timer previously armed for the same kind is cancelled. Must be
    /// called from within a tokio runtime.
    pub fn schedule<F>(&mut self, kind: TimerKind, delay: Duration, on_fire: F) -> TimerTicket
    where
        F: FnOnce(TimerTicket) + Send + 'static,
    {
        self.cancel(kind);

        self.next_generation += 1;
        let ticket = TimerTicket {
            kind,
            generation: self.next_generation,
        };

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::trace!(%kind, generation = ticket.generation, "Timer fired");
            on_fire(ticket);
        });

        tracing::debug!(%kind, delay_ms = delay.as_millis(), "Timer armed");
        self.slots.insert(kind, TimerHandle { ticket, task });
        ticket
    }

    /// Cancels the timer armed for `kind`, if any.
    ///
    /// Returns true if a timer was armed.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        match self.slots.remove(&kind) {
            Some(handle) => {
                handle.cancel();
                tracing::debug!(%kind, "Timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancels every armed timer.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.slots.drain() {
            handle.cancel();
        }
    }

    /// Returns true if a timer is armed for `kind`.
    ///
    /// A timer stays armed until it is cancelled, replaced or claimed.
    #[must_use]
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.slots.contains_key(&kind)
    }

    /// Returns the ticket currently armed for `kind`.
    #[must_use]
    pub fn current(&self, kind: TimerKind) -> Option<TimerTicket> {
        self.slots.get(&kind).map(TimerHandle::ticket)
    }

    /// Consumes the slot of a fired timer.
    ///
    /// Returns false if `ticket` is stale, meaning its timer was cancelled or
    /// replaced after the fire had already been delivered.
    pub fn claim(&mut self, ticket: TimerTicket) -> bool {
        if self.current(ticket.kind) == Some(ticket) {
            self.slots.remove(&ticket.kind);
            true
        } else {
            false
        }
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
