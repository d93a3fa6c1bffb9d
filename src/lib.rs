// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `smart_switch` - State engine for smart-switch accessories.
//!
//! This library decides what logical on/off state a switch accessory should
//! be in and sends the matching command exactly once per transition. Three
//! independent triggers feed into one consistent state:
//!
//! - **Explicit requests** from the host integration
//! - **Auto timers** turning the switch off (or on) after a delay
//! - **Reachability edges** from periodic probing of a host
//!
//! The last state can be persisted and restored across restarts, optionally
//! re-sending it to resynchronize the physical device.
//!
//! The physical transport and the reachability primitive are injected: see
//! [`CommandEmitter`] and [`liveness::Probe`].
//!
//! # Quick Start
//!
//! ```
//! use smart_switch::{CommandEmitter, Switch, SwitchConfig};
//! use smart_switch::error::EmitError;
//! use smart_switch::state::SwitchState;
//! use smart_switch::types::Payload;
//!
//! struct IrBlaster;
//!
//! impl CommandEmitter for IrBlaster {
//!     async fn emit(&self, _payload: &Payload) -> Result<(), EmitError> {
//!         // Hand the payload to the transport here
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> smart_switch::Result<()> {
//! let config = SwitchConfig::new("ON", "OFF")
//!     .with_persist_state(false)
//!     .with_auto_off(600.0);
//!
//! let switch = Switch::builder("Heater", config).spawn(IrBlaster)?;
//!
//! switch.turn_on().await?;
//! assert_eq!(switch.state(), SwitchState::On);
//!
//! // Redundant requests are no-ops
//! assert!(switch.turn_on().await?.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Reachability-driven switch
//!
//! ```no_run
//! use smart_switch::{CommandEmitter, Switch, SwitchConfig};
//! use smart_switch::liveness::TcpProbe;
//! # use smart_switch::{error::EmitError, types::Payload};
//! # struct Noop;
//! # impl CommandEmitter for Noop {
//! #     async fn emit(&self, _: &Payload) -> Result<(), EmitError> { Ok(()) }
//! # }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> smart_switch::Result<()> {
//! let config = SwitchConfig::ping_only("192.168.1.40")
//!     .with_ping_state_only(true)
//!     .with_persist_state(false);
//!
//! let tv = Switch::builder("TV", config).spawn(Noop)?;
//! tv.watch_reachability(TcpProbe::new().with_port(8001))?;
//! # Ok(())
//! # }
//! ```

mod accessory;
mod config;
mod emitter;
pub mod error;
pub mod event;
pub mod liveness;
pub mod machine;
pub mod state;
pub mod store;
pub mod timer;
pub mod types;

pub use accessory::{Switch, SwitchBuilder};
pub use config::{CommandData, SwitchConfig};
pub use emitter::CommandEmitter;
pub use error::{ConfigError, EmitError, Error, PersistenceError, ProbeError, Result};
pub use event::{EventBus, SwitchEvent};
pub use state::{StateChange, SwitchState, TriggerSource};
