// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch accessory configuration.
//!
//! [`SwitchConfig`] is deserialized from the host's accessory configuration,
//! which uses camelCase keys:
//!
//! ```
//! use smart_switch::SwitchConfig;
//!
//! let config = SwitchConfig::from_json(r#"{
//!     "data": { "on": "ON", "off": "OFF" },
//!     "persistState": false,
//!     "enableAutoOff": true,
//!     "onDuration": 30
//! }"#).unwrap();
//!
//! assert!(!config.persist_state);
//! assert_eq!(config.on_duration, 30.0);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::SwitchState;
use crate::types::Payload;

const DEFAULT_AUTO_DURATION_SECS: f64 = 60.0;
const DEFAULT_PING_FREQUENCY_SECS: f64 = 1.0;
const DEFAULT_RESEND_DELAY_SECS: f64 = 2.0;

/// On/off payloads of a switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandData {
    /// Payload sent when the switch turns on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<Payload>,
    /// Payload sent when the switch turns off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off: Option<Payload>,
}

/// Configuration of one switch accessory.
///
/// All durations are expressed in seconds, as in the host configuration.
///
/// # Examples
///
/// ```
/// use smart_switch::SwitchConfig;
///
/// let config = SwitchConfig::new("ON", "OFF")
///     .with_persist_state(false)
///     .with_auto_off(1.0)
///     .with_ping_target("192.168.1.1");
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitchConfig {
    /// The on/off payloads.
    pub data: CommandData,
    /// Restore the last state on construction and save every transition.
    pub persist_state: bool,
    /// Turn the switch off `on_duration` seconds after it turns on.
    pub enable_auto_off: bool,
    /// Seconds before the auto-off fires.
    pub on_duration: f64,
    /// Turn the switch on `off_duration` seconds after it turns off.
    pub enable_auto_on: bool,
    /// Seconds before the auto-on fires.
    pub off_duration: f64,
    /// Host whose reachability drives the switch state.
    #[serde(rename = "pingIPAddress", skip_serializing_if = "Option::is_none")]
    pub ping_ip_address: Option<String>,
    /// Mirror reachability into the state without sending commands.
    #[serde(rename = "pingIPAddressStateOnly")]
    pub ping_ip_address_state_only: bool,
    /// Seconds between two reachability probes.
    pub ping_frequency: f64,
    /// Re-send the payload for the restored state after a reload.
    pub resend_hex_after_reload: bool,
    /// Seconds to wait before re-sending after a reload.
    pub resend_data_after_reload_delay: f64,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            data: CommandData::default(),
            persist_state: true,
            enable_auto_off: false,
            on_duration: DEFAULT_AUTO_DURATION_SECS,
            enable_auto_on: false,
            off_duration: DEFAULT_AUTO_DURATION_SECS,
            ping_ip_address: None,
            ping_ip_address_state_only: false,
            ping_frequency: DEFAULT_PING_FREQUENCY_SECS,
            resend_hex_after_reload: false,
            resend_data_after_reload_delay: DEFAULT_RESEND_DELAY_SECS,
        }
    }
}

impl SwitchConfig {
    /// Creates a configuration with both payloads and default settings.
    #[must_use]
    pub fn new(on: impl Into<Payload>, off: impl Into<Payload>) -> Self {
        Self {
            data: CommandData {
                on: Some(on.into()),
                off: Some(off.into()),
            },
            ..Self::default()
        }
    }

    /// Creates a configuration for a reachability-only accessory.
    ///
    /// No payloads are configured, so transitions never emit.
    #[must_use]
    pub fn ping_only(target: impl Into<String>) -> Self {
        Self {
            ping_ip_address: Some(target.into()),
            ..Self::default()
        }
    }

    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the document is malformed, or any
    /// validation error from [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Enables or disables persistence.
    #[must_use]
    pub fn with_persist_state(mut self, persist: bool) -> Self {
        self.persist_state = persist;
        self
    }

    /// Enables auto-off after `seconds`.
    #[must_use]
    pub fn with_auto_off(mut self, seconds: f64) -> Self {
        self.enable_auto_off = true;
        self.on_duration = seconds;
        self
    }

    /// Enables auto-on after `seconds`.
    #[must_use]
    pub fn with_auto_on(mut self, seconds: f64) -> Self {
        self.enable_auto_on = true;
        self.off_duration = seconds;
        self
    }

    /// Sets the host used for reachability probing.
    #[must_use]
    pub fn with_ping_target(mut self, target: impl Into<String>) -> Self {
        self.ping_ip_address = Some(target.into());
        self
    }

    /// Mirrors reachability into the state without emitting commands.
    #[must_use]
    pub fn with_ping_state_only(mut self, state_only: bool) -> Self {
        self.ping_ip_address_state_only = state_only;
        self
    }

    /// Sets the probe interval in seconds.
    #[must_use]
    pub fn with_ping_frequency(mut self, seconds: f64) -> Self {
        self.ping_frequency = seconds;
        self
    }

    /// Re-sends the restored state's payload `delay` seconds after a reload.
    #[must_use]
    pub fn with_resend_after_reload(mut self, delay: f64) -> Self {
        self.resend_hex_after_reload = true;
        self.resend_data_after_reload_delay = delay;
        self
    }

    /// Checks the configuration for consistency.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingPayload` if no ping target is configured and
    ///   either payload is absent.
    /// - `ConfigError::InvalidDuration` if an enabled duration is negative or
    ///   not finite, or the ping frequency is not strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ping_ip_address.is_none() {
            if self.data.on.is_none() {
                return Err(ConfigError::MissingPayload { state: "on" });
            }
            if self.data.off.is_none() {
                return Err(ConfigError::MissingPayload { state: "off" });
            }
        }

        if self.enable_auto_off {
            check_seconds("onDuration", self.on_duration)?;
        }
        if self.enable_auto_on {
            check_seconds("offDuration", self.off_duration)?;
        }
        if self.resend_hex_after_reload {
            check_seconds(
                "resendDataAfterReloadDelay",
                self.resend_data_after_reload_delay,
            )?;
        }
        if self.ping_ip_address.is_some() {
            let interval = check_seconds("pingFrequency", self.ping_frequency)?;
            if interval.is_zero() {
                return Err(ConfigError::InvalidDuration {
                    field: "pingFrequency",
                    value: self.ping_frequency,
                });
            }
        }

        Ok(())
    }

    /// Returns the payload for the given state, if configured.
    #[must_use]
    pub fn payload_for(&self, state: SwitchState) -> Option<&Payload> {
        match state {
            SwitchState::On => self.data.on.as_ref(),
            SwitchState::Off => self.data.off.as_ref(),
            SwitchState::Unknown => None,
        }
    }

    /// Returns the auto-off delay when auto-off is enabled.
    #[must_use]
    pub fn auto_off_delay(&self) -> Option<Duration> {
        self.enable_auto_off
            .then(|| Duration::try_from_secs_f64(self.on_duration).ok())
            .flatten()
    }

    /// Returns the auto-on delay when auto-on is enabled.
    #[must_use]
    pub fn auto_on_delay(&self) -> Option<Duration> {
        self.enable_auto_on
            .then(|| Duration::try_from_secs_f64(self.off_duration).ok())
            .flatten()
    }

    /// Returns the resend delay when resend-after-reload is enabled.
    #[must_use]
    pub fn resend_delay(&self) -> Option<Duration> {
        self.resend_hex_after_reload
            .then(|| Duration::try_from_secs_f64(self.resend_data_after_reload_delay).ok())
            .flatten()
    }

    /// Returns the interval between two reachability probes.
    #[must_use]
    pub fn ping_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.ping_frequency)
            .unwrap_or(Duration::from_secs_f64(DEFAULT_PING_FREQUENCY_SECS))
    }
}

fn check_seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidDuration { field, value })
}
