// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch event types.

use crate::liveness::Reachability;
use crate::state::{StateChange, SwitchState};
use crate::types::{AccessoryId, Payload};

/// Events emitted by a switch accessory.
#[derive(Debug, Clone)]
pub enum SwitchEvent {
    /// The switch state changed.
    StateChanged {
        /// The accessory.
        identity: AccessoryId,
        /// The observed transition.
        change: StateChange,
    },

    /// A payload was handed to the transport successfully.
    CommandEmitted {
        /// The accessory.
        identity: AccessoryId,
        /// The state the payload represents.
        state: SwitchState,
        /// The payload sent.
        payload: Payload,
    },

    /// The transport failed to send a payload.
    ///
    /// The state change that triggered the emission is kept.
    EmissionFailed {
        /// The accessory.
        identity: AccessoryId,
        /// The payload that was not sent.
        payload: Payload,
        /// Description of the failure.
        error: String,
    },

    /// Writing the state to the store failed.
    PersistenceFailed {
        /// The accessory.
        identity: AccessoryId,
        /// Description of the failure.
        error: String,
    },

    /// The liveness monitor reported an edge.
    ReachabilityChanged {
        /// The accessory.
        identity: AccessoryId,
        /// The new reachability.
        reachability: Reachability,
    },
}

impl SwitchEvent {
    /// Returns the identity of the accessory that emitted the event.
    #[must_use]
    pub fn identity(&self) -> &AccessoryId {
        match self {
            Self::StateChanged { identity, .. }
            | Self::CommandEmitted { identity, .. }
            | Self::EmissionFailed { identity, .. }
            | Self::PersistenceFailed { identity, .. }
            | Self::ReachabilityChanged { identity, .. } => identity,
        }
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns `true` if this event reports a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::EmissionFailed { .. } | Self::PersistenceFailed { .. }
        )
    }
}
