// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Durable storage of the last known switch state.
//!
//! A [`StateStore`] maps an [`AccessoryId`] to the last confirmed on/off
//! value. Two backends are provided:
//!
//! - [`MemoryStateStore`] - process-local, shareable between instances
//! - [`JsonFileStateStore`] - a JSON document on disk, written atomically
//!
//! Stores never hold an unknown state; only `true`/`false` are recorded.

mod json_file;
mod memory;

pub use json_file::JsonFileStateStore;
pub use memory::MemoryStateStore;

use std::sync::Arc;

use crate::error::PersistenceError;
use crate::types::AccessoryId;

/// Key-value persistence of switch states.
///
/// Concurrent writers for the same identity are allowed; the last write
/// wins.
pub trait StateStore: Send + Sync + std::fmt::Debug {
    /// Returns the recorded state for `identity`, if any.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the backing storage cannot be read.
    fn load(&self, identity: &AccessoryId) -> Result<Option<bool>, PersistenceError>;

    /// Records `value` as the state of `identity`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the backing storage cannot be written.
    fn save(&self, identity: &AccessoryId, value: bool) -> Result<(), PersistenceError>;
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn load(&self, identity: &AccessoryId) -> Result<Option<bool>, PersistenceError> {
        (**self).load(identity)
    }

    fn save(&self, identity: &AccessoryId, value: bool) -> Result<(), PersistenceError> {
        (**self).save(identity, value)
    }
}
