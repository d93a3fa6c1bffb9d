// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch state types.
//!
//! [`SwitchState`] is the logical on/off state of an accessory, and
//! [`StateChange`] records one observed transition together with the
//! trigger that caused it.
//!
//! # Examples
//!
//! ```
//! use smart_switch::state::SwitchState;
//!
//! let state = SwitchState::from(true);
//! assert_eq!(state, SwitchState::On);
//! assert_eq!(state.as_bool(), Some(true));
//! assert_eq!(SwitchState::Unknown.as_bool(), None);
//! ```

mod state_change;
mod switch_state;

pub use state_change::{StateChange, TriggerSource};
pub use switch_state::SwitchState;
