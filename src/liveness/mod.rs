// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host reachability monitoring.
//!
//! A [`LivenessMonitor`] polls a [`Probe`] at a fixed interval and reports
//! only the edges of the result: the first reading, then every up/down
//! change. Probe failures read as [`Reachability::Down`].
//!
//! # Examples
//!
//! ```no_run
//! use std::ops::ControlFlow;
//! use std::time::Duration;
//! use smart_switch::liveness::{LivenessMonitor, TcpProbe};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let handle = LivenessMonitor::spawn(
//!     "192.168.1.20:80",
//!     Duration::from_secs(5),
//!     TcpProbe::new(),
//!     |reachability| {
//!         println!("host is {reachability}");
//!         ControlFlow::Continue(())
//!     },
//! );
//!
//! // Later
//! handle.cancel();
//! # }
//! ```

mod monitor;
mod probe;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use monitor::{LivenessMonitor, MonitorHandle};
pub use probe::{Probe, TcpProbe};

/// Result of one reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reachability {
    /// The host answered.
    Up,
    /// The host did not answer, or the probe failed.
    Down,
}

impl Reachability {
    /// Returns true if the host is up.
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

impl From<bool> for Reachability {
    fn from(up: bool) -> Self {
        if up { Self::Up } else { Self::Down }
    }
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}
