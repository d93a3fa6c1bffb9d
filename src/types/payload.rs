// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command payload type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An already-resolved command value for the physical transport.
///
/// The engine never looks inside a payload. Typical payloads are IR/RF hex
/// codes or transport-specific command strings.
///
/// # Examples
///
/// ```
/// use smart_switch::types::Payload;
///
/// let on = Payload::new("2600500000012...");
/// assert_eq!(on.as_str(), "2600500000012...");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(String);

impl Payload {
    /// Creates a payload from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the payload contents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self(value)
    }
}
