// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `smart_switch` library.
//!
//! This module provides the error hierarchy for the switch engine:
//! configuration validation, command emission, state persistence and
//! reachability probing.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The accessory configuration is invalid.
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    /// The command emitter failed to send a payload.
    ///
    /// The state transition that triggered the emission has already been
    /// applied when this error is returned.
    #[error("emission failed: {0}")]
    Emission(#[from] EmitError),

    /// The state store failed to read or write a record.
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    /// The accessory has been shut down.
    #[error("accessory is closed")]
    Closed,
}

/// Errors raised while validating a [`SwitchConfig`](crate::SwitchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An on/off payload is required but not configured.
    ///
    /// Payloads may only be omitted when a ping target is configured.
    #[error("missing {state} payload and no ping target configured")]
    MissingPayload {
        /// The state whose payload is missing ("on" or "off").
        state: &'static str,
    },

    /// Persistence is enabled but the accessory identity is empty.
    #[error("accessory identity must not be empty when persistence is enabled")]
    EmptyIdentity,

    /// A duration field holds a negative, non-finite or zero value.
    #[error("invalid duration for {field}: {value}")]
    InvalidDuration {
        /// The offending configuration field.
        field: &'static str,
        /// The configured number of seconds.
        value: f64,
    },

    /// A switch state string is not one of the recognized spellings.
    #[error("invalid switch state: {0}")]
    InvalidState(String),

    /// Reachability monitoring was requested without a ping target.
    #[error("no ping target configured")]
    MissingPingTarget,

    /// The configuration document could not be parsed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by a [`CommandEmitter`](crate::CommandEmitter).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// The transport could not deliver the payload.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The transport refused the payload.
    #[error("payload rejected: {0}")]
    Rejected(String),
}

/// Errors reported by a [`StateStore`](crate::store::StateStore).
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the backing storage failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by a [`Probe`](crate::liveness::Probe).
///
/// Probe errors never leave the liveness monitor; they are read as
/// [`Reachability::Down`](crate::liveness::Reachability::Down).
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe did not complete in time.
    #[error("probe timed out after {0} ms")]
    Timeout(u64),

    /// The target address could not be parsed or resolved.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The probe failed with an I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
