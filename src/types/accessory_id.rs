// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of an accessory.
///
/// The identity keys the persisted switch state, so two instances built with
/// the same identity share one record. It is usually the accessory's
/// configured name.
///
/// # Examples
///
/// ```
/// use smart_switch::types::AccessoryId;
///
/// let id = AccessoryId::new("Living Room Fan");
/// assert_eq!(id.as_str(), "Living Room Fan");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessoryId(String);

impl AccessoryId {
    /// Creates an identity from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identity is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessoryId({:?})", self.0)
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccessoryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccessoryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
