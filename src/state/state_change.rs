// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] is produced only for observed transitions, i.e. when the
//! new state differs from the previous one. Redundant requests never yield a
//! change.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SwitchState;

/// What caused a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerSource {
    /// An explicit set request from the host integration.
    Request,
    /// The auto-off timer expired.
    AutoOff,
    /// The auto-on timer expired.
    AutoOn,
    /// The liveness monitor reported a reachability edge.
    Reachability,
}

impl TriggerSource {
    /// Returns the source name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::AutoOff => "auto-off",
            Self::AutoOn => "auto-on",
            Self::Reachability => "reachability",
        }
    }
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed switch transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    /// State before the transition.
    pub previous: SwitchState,
    /// State after the transition.
    pub current: SwitchState,
    /// The trigger that caused the transition.
    pub source: TriggerSource,
    /// When the transition was applied.
    pub at: DateTime<Utc>,
}

impl StateChange {
    /// Creates a change stamped with the current time.
    #[must_use]
    pub fn new(previous: SwitchState, current: SwitchState, source: TriggerSource) -> Self {
        Self {
            previous,
            current,
            source,
            at: Utc::now(),
        }
    }

    /// Returns true if the switch turned on.
    #[must_use]
    pub fn turned_on(&self) -> bool {
        self.current == SwitchState::On
    }

    /// Returns true if the switch turned off.
    #[must_use]
    pub fn turned_off(&self) -> bool {
        self.current == SwitchState::Off
    }
}
