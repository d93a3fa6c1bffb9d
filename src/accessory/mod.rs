// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch accessories.
//!
//! A [`Switch`] is a handle to one accessory. Each accessory runs as a
//! background task that processes its triggers strictly one at a time:
//! explicit set requests, auto timer fires and reachability edges all go
//! through the same queue. Timers and the liveness monitor only enqueue
//! triggers; they never touch the state themselves.
//!
//! The accessory stops when [`Switch::shutdown`] is called or the last
//! handle is dropped. Stopping cancels every pending timer and the liveness
//! monitor.
//!
//! # Examples
//!
//! ```
//! use smart_switch::{CommandEmitter, Switch, SwitchConfig};
//! use smart_switch::error::EmitError;
//! use smart_switch::state::SwitchState;
//! use smart_switch::types::Payload;
//!
//! struct Blaster;
//!
//! impl CommandEmitter for Blaster {
//!     async fn emit(&self, payload: &Payload) -> Result<(), EmitError> {
//!         println!("sending {payload}");
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> smart_switch::Result<()> {
//! let config = SwitchConfig::new("ON", "OFF").with_persist_state(false);
//! let switch = Switch::builder("Desk Fan", config).spawn(Blaster)?;
//!
//! switch.turn_on().await?;
//! assert_eq!(switch.state(), SwitchState::On);
//!
//! switch.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod actor;
mod switch;

pub use switch::{Switch, SwitchBuilder};
