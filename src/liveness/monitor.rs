// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling loop that turns probe readings into reachability edges.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::{Probe, Reachability};

/// Spawns reachability polling loops.
#[derive(Debug)]
pub struct LivenessMonitor;

impl LivenessMonitor {
    /// Starts polling `target` every `interval`.
    ///
    /// `on_edge` is called with the first reading and then with every reading
    /// that differs from the previous one. Returning `ControlFlow::Break`
    /// stops the loop. Probes run one at a time: the next probe starts
    /// `interval` after the previous one has completed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<P, F>(
        target: impl Into<String>,
        interval: Duration,
        probe: P,
        mut on_edge: F,
    ) -> MonitorHandle
    where
        P: Probe,
        F: FnMut(Reachability) -> ControlFlow<()> + Send + 'static,
    {
        let target = target.into();

        let task = tokio::spawn(async move {
            tracing::debug!(%target, interval_ms = interval.as_millis(), "Starting liveness monitor");
            let mut last = None;

            loop {
                let reading = match probe.probe(&target).await {
                    Ok(reading) => reading,
                    Err(e) => {
                        tracing::debug!(%target, error = %e, "Probe failed, treating host as down");
                        Reachability::Down
                    }
                };

                if last != Some(reading) {
                    tracing::debug!(%target, %reading, "Reachability changed");
                    last = Some(reading);
                    if on_edge(reading).is_break() {
                        break;
                    }
                }

                tokio::time::sleep(interval).await;
            }

            tracing::debug!(%target, "Liveness monitor stopped");
        });

        MonitorHandle { task }
    }
}

/// Handle to a running liveness monitor.
///
/// Dropping the handle stops the monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stops all future polls. Idempotent.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns true once the polling loop has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
