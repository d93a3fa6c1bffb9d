// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the switch engine.
//!
//! # Types
//!
//! - [`AccessoryId`] - Stable identity of an accessory, used as storage key
//! - [`Payload`] - Opaque on/off command value handed to the transport

mod accessory_id;
mod payload;

pub use accessory_id::AccessoryId;
pub use payload::Payload;
