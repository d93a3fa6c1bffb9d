// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for switch accessories.
//!
//! Every accessory publishes [`SwitchEvent`]s on an [`EventBus`]: state
//! transitions, emitted commands, and failures that are not returned to any
//! caller (timer-driven emissions, persistence writes).
//!
//! # Examples
//!
//! ```
//! use smart_switch::event::{EventBus, SwitchEvent};
//! use smart_switch::liveness::Reachability;
//! use smart_switch::types::AccessoryId;
//!
//! let bus = EventBus::new();
//! let _rx = bus.subscribe();
//!
//! bus.publish(SwitchEvent::ReachabilityChanged {
//!     identity: AccessoryId::new("NAS"),
//!     reachability: Reachability::Up,
//! });
//! ```

mod event_bus;
mod switch_event;

pub use event_bus::EventBus;
pub use switch_event::SwitchEvent;
