// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON file state store.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::StateStore;
use crate::error::PersistenceError;
use crate::types::AccessoryId;

/// State store backed by a single JSON document.
///
/// The document is an object mapping identities to booleans:
///
/// ```json
/// { "Living Room Fan": true, "Porch Light": false }
/// ```
///
/// A missing file reads as an empty store. Writes go to a temporary sibling
/// file that is then renamed over the document, so a crash never leaves a
/// truncated file behind.
#[derive(Debug)]
pub struct JsonFileStateStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStateStore {
    /// Creates a store persisting to `path`.
    ///
    /// The file and its parent directories are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> Result<BTreeMap<AccessoryId, bool>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No state file yet");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_records(&self, records: &BTreeMap<AccessoryId, bool>) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(records)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl StateStore for JsonFileStateStore {
    fn load(&self, identity: &AccessoryId) -> Result<Option<bool>, PersistenceError> {
        Ok(self.read_records()?.get(identity).copied())
    }

    fn save(&self, identity: &AccessoryId, value: bool) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock();

        let mut records = self.read_records()?;
        records.insert(identity.clone(), value);
        self.write_records(&records)?;

        tracing::trace!(path = %self.path.display(), %identity, value, "Saved switch state");
        Ok(())
    }
}
