// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transition logic of a switch accessory.
//!
//! [`SwitchStateMachine`] owns the current [`SwitchState`] and decides, for
//! every requested value, whether a transition happens and which effects it
//! has. It performs no I/O: the returned [`Transition`] describes the
//! emission, persistence and timer arming that the caller must carry out.
//!
//! # Examples
//!
//! ```
//! use smart_switch::SwitchConfig;
//! use smart_switch::machine::{Emission, SwitchStateMachine};
//! use smart_switch::state::{SwitchState, TriggerSource};
//!
//! let config = SwitchConfig::new("ON", "OFF").with_persist_state(false);
//! let mut machine = SwitchStateMachine::new(config, SwitchState::Unknown);
//!
//! let transition = machine.apply(true, TriggerSource::Request).unwrap();
//! assert!(matches!(transition.emission, Emission::Send(ref p) if p.as_str() == "ON"));
//!
//! // Same value again: nothing happens
//! assert!(machine.apply(true, TriggerSource::Request).is_none());
//! ```

use std::time::Duration;

use crate::config::SwitchConfig;
use crate::state::{StateChange, SwitchState, TriggerSource};
use crate::timer::TimerKind;
use crate::types::Payload;

/// What to send for a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// Send this payload.
    Send(Payload),
    /// No payload is configured for the new state; nothing is sent.
    Unconfigured,
    /// The transition mirrors reachability only; nothing is sent.
    Suppressed,
}

/// Effects of one observed transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The state change itself.
    pub change: StateChange,
    /// The command to emit.
    pub emission: Emission,
    /// Whether the new state must be written to the store.
    pub persist: bool,
    /// Auto timer to (re)arm, replacing any pending one of the same kind.
    pub arm: Option<(TimerKind, Duration)>,
}

/// The decision core of a switch accessory.
#[derive(Debug, Clone)]
pub struct SwitchStateMachine {
    config: SwitchConfig,
    state: SwitchState,
}

impl SwitchStateMachine {
    /// Creates a machine starting in `initial`.
    ///
    /// `initial` is the restored state, or `Unknown` when nothing was
    /// restored. Restoring never produces a transition.
    #[must_use]
    pub fn new(config: SwitchConfig, initial: SwitchState) -> Self {
        Self {
            config,
            state: initial,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SwitchState {
        self.state
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    /// Requests the switch to become `value`.
    ///
    /// Returns `None` when the switch already is in that state: no emission,
    /// no persistence and no timer change follow. Otherwise the state is
    /// updated immediately and the effects are returned.
    ///
    /// Reachability edges on a state-only accessory update the state (and
    /// persist it) without emitting or arming auto timers.
    pub fn apply(&mut self, value: bool, source: TriggerSource) -> Option<Transition> {
        let next = SwitchState::from(value);
        if next == self.state {
            return None;
        }

        let previous = std::mem::replace(&mut self.state, next);
        let mirror_only =
            source == TriggerSource::Reachability && self.config.ping_ip_address_state_only;

        let emission = if mirror_only {
            Emission::Suppressed
        } else {
            self.config
                .payload_for(next)
                .cloned()
                .map_or(Emission::Unconfigured, Emission::Send)
        };

        let arm = if mirror_only {
            None
        } else if value {
            self.config
                .auto_off_delay()
                .map(|delay| (TimerKind::AutoOff, delay))
        } else {
            self.config
                .auto_on_delay()
                .map(|delay| (TimerKind::AutoOn, delay))
        };

        Some(Transition {
            change: StateChange::new(previous, next, source),
            emission,
            persist: self.config.persist_state,
            arm,
        })
    }

    /// Returns the payload that re-asserts the current state.
    ///
    /// Used to resynchronize the device after a reload. Returns `None` while
    /// the state is unknown or when no payload is configured for it.
    #[must_use]
    pub fn resync_payload(&self) -> Option<&Payload> {
        self.config.payload_for(self.state)
    }
}
