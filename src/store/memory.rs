// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory state store.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::StateStore;
use crate::error::PersistenceError;
use crate::types::AccessoryId;

/// Process-local state store.
///
/// Records survive as long as the store does. Wrap it in an `Arc` to share
/// it between accessory instances, e.g. to simulate a reload in tests.
///
/// # Examples
///
/// ```
/// use smart_switch::store::{MemoryStateStore, StateStore};
/// use smart_switch::types::AccessoryId;
///
/// let store = MemoryStateStore::new();
/// let id = AccessoryId::new("Fan");
///
/// store.save(&id, true).unwrap();
/// assert_eq!(store.load(&id).unwrap(), Some(true));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    records: RwLock<HashMap<AccessoryId, bool>>,
}

impl MemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Removes the record of `identity`, returning it.
    pub fn remove(&self, identity: &AccessoryId) -> Option<bool> {
        self.records.write().remove(identity)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, identity: &AccessoryId) -> Result<Option<bool>, PersistenceError> {
        Ok(self.records.read().get(identity).copied())
    }

    fn save(&self, identity: &AccessoryId, value: bool) -> Result<(), PersistenceError> {
        self.records.write().insert(identity.clone(), value);
        Ok(())
    }
}
