// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch handle and builder.

use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use super::actor::{SwitchActor, Trigger};
use crate::config::SwitchConfig;
use crate::emitter::CommandEmitter;
use crate::error::{ConfigError, Error, Result};
use crate::event::{EventBus, SwitchEvent};
use crate::liveness::{LivenessMonitor, Probe};
use crate::machine::SwitchStateMachine;
use crate::state::{StateChange, SwitchState};
use crate::store::{MemoryStateStore, StateStore};
use crate::timer::TimerKind;
use crate::types::AccessoryId;

/// Builder for [`Switch`] accessories.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use smart_switch::{Switch, SwitchConfig};
/// use smart_switch::event::EventBus;
/// use smart_switch::store::JsonFileStateStore;
/// # use smart_switch::{CommandEmitter, error::EmitError, types::Payload};
/// # struct Blaster;
/// # impl CommandEmitter for Blaster {
/// #     async fn emit(&self, _: &Payload) -> Result<(), EmitError> { Ok(()) }
/// # }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> smart_switch::Result<()> {
/// let store = Arc::new(JsonFileStateStore::new("/var/lib/switches/state.json"));
/// let bus = EventBus::new();
///
/// let fan = Switch::builder("Fan", SwitchConfig::new("ON", "OFF"))
///     .store(Arc::clone(&store))
///     .event_bus(bus.clone())
///     .spawn(Blaster)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SwitchBuilder {
    identity: AccessoryId,
    config: SwitchConfig,
    store: Option<Arc<dyn StateStore>>,
    events: Option<EventBus>,
}

impl SwitchBuilder {
    /// Uses `store` to restore and persist the switch state.
    ///
    /// Defaults to a fresh [`MemoryStateStore`].
    #[must_use]
    pub fn store<S: StateStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Publishes events on `bus` instead of a private bus.
    #[must_use]
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Validates the configuration, restores the persisted state and starts
    /// the accessory.
    ///
    /// With persistence enabled the store is read once here. A restored
    /// state is adopted silently, unless resend-after-reload is enabled, in
    /// which case its payload is sent again after the configured delay. A
    /// failing read is logged and treated as "no record".
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn spawn<E: CommandEmitter>(self, emitter: E) -> Result<Switch> {
        let Self {
            identity,
            config,
            store,
            events,
        } = self;

        config.validate()?;
        if config.persist_state && identity.is_blank() {
            return Err(ConfigError::EmptyIdentity.into());
        }

        let store = store.unwrap_or_else(|| Arc::new(MemoryStateStore::new()));
        let events = events.unwrap_or_default();

        let restored = if config.persist_state {
            match store.load(&identity) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(%identity, error = %e, "Failed to restore switch state");
                    events.publish(SwitchEvent::PersistenceFailed {
                        identity: identity.clone(),
                        error: e.to_string(),
                    });
                    None
                }
            }
        } else {
            None
        };
        let initial = SwitchState::from(restored);
        let resend_delay = restored.and(config.resend_delay());

        let config = Arc::new(config);
        let machine = SwitchStateMachine::new((*config).clone(), initial);
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(initial);

        let mut actor = SwitchActor::new(
            identity.clone(),
            machine,
            emitter,
            store,
            tx.downgrade(),
            state_tx,
            events.clone(),
        );
        if let Some(delay) = resend_delay {
            actor.arm(TimerKind::Resend, delay);
        }

        tracing::info!(%identity, state = %initial, restored = restored.is_some(), "Switch accessory ready");
        tokio::spawn(actor.run(rx));

        Ok(Switch {
            identity,
            config,
            triggers: tx,
            state_rx,
            events,
        })
    }
}

/// Handle to a running switch accessory.
///
/// Handles are cheap to clone. The accessory stops when the last handle is
/// dropped or [`shutdown`](Self::shutdown) is called.
#[derive(Debug, Clone)]
pub struct Switch {
    identity: AccessoryId,
    config: Arc<SwitchConfig>,
    triggers: mpsc::UnboundedSender<Trigger>,
    state_rx: watch::Receiver<SwitchState>,
    events: EventBus,
}

impl Switch {
    /// Starts building an accessory.
    #[must_use]
    pub fn builder(identity: impl Into<AccessoryId>, config: SwitchConfig) -> SwitchBuilder {
        SwitchBuilder {
            identity: identity.into(),
            config,
            store: None,
            events: None,
        }
    }

    /// Returns the accessory identity.
    #[must_use]
    pub fn identity(&self) -> &AccessoryId {
        &self.identity
    }

    /// Returns the accessory configuration.
    #[must_use]
    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    /// Returns the current switch state.
    #[must_use]
    pub fn state(&self) -> SwitchState {
        *self.state_rx.borrow()
    }

    /// Returns a receiver notified on every state change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SwitchState> {
        self.state_rx.clone()
    }

    /// Subscribes to the accessory's events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SwitchEvent> {
        self.events.subscribe()
    }

    /// Requests the switch to become `value`.
    ///
    /// Returns the observed change, or `None` if the switch already was in
    /// that state, in which case nothing was sent or stored.
    ///
    /// # Errors
    ///
    /// - `Error::Emission` if the payload could not be sent. The state change
    ///   has been applied, persisted and its auto timer armed regardless.
    /// - `Error::Closed` if the accessory has been shut down.
    pub async fn set(&self, value: bool) -> Result<Option<StateChange>> {
        let (reply, response) = oneshot::channel();
        self.triggers
            .send(Trigger::Set { value, reply })
            .map_err(|_| Error::Closed)?;
        response.await.map_err(|_| Error::Closed)?
    }

    /// Turns the switch on.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub async fn turn_on(&self) -> Result<Option<StateChange>> {
        self.set(true).await
    }

    /// Turns the switch off.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub async fn turn_off(&self) -> Result<Option<StateChange>> {
        self.set(false).await
    }

    /// Starts driving the switch from the reachability of the configured
    /// ping target.
    ///
    /// Every up/down edge is processed like a set request, or mirrored into
    /// the state without emitting when `pingIPAddressStateOnly` is set.
    /// Calling this again replaces the running monitor.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingPingTarget` if no ping target is configured.
    /// - `Error::Closed` if the accessory has been shut down.
    pub fn watch_reachability<P: Probe>(&self, probe: P) -> Result<()> {
        let target = self
            .config
            .ping_ip_address
            .clone()
            .ok_or(ConfigError::MissingPingTarget)?;

        let triggers = self.triggers.downgrade();
        let handle = LivenessMonitor::spawn(
            target,
            self.config.ping_interval(),
            probe,
            move |reachability| match triggers.upgrade() {
                Some(tx) if tx.send(Trigger::Reachability(reachability)).is_ok() => {
                    ControlFlow::Continue(())
                }
                _ => ControlFlow::Break(()),
            },
        );

        // On failure the handle is dropped with the message, stopping it
        self.triggers
            .send(Trigger::AttachMonitor(handle))
            .map_err(|_| Error::Closed)
    }

    /// Stops the accessory, cancelling its timers and liveness monitor.
    ///
    /// Waits until the accessory has finished its current trigger. Does
    /// nothing if it already stopped.
    pub async fn shutdown(&self) {
        let (done, stopped) = oneshot::channel();
        if self.triggers.send(Trigger::Shutdown(done)).is_ok() {
            let _ = stopped.await;
        }
    }

    /// Returns true once the accessory has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.triggers.is_closed()
    }
}
