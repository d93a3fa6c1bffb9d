// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-accessory processing task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

use crate::emitter::CommandEmitter;
use crate::error::{Error, Result};
use crate::event::{EventBus, SwitchEvent};
use crate::liveness::{MonitorHandle, Reachability};
use crate::machine::{Emission, SwitchStateMachine, Transition};
use crate::state::{StateChange, SwitchState, TriggerSource};
use crate::store::StateStore;
use crate::timer::{TimerKind, TimerScheduler, TimerTicket};
use crate::types::{AccessoryId, Payload};

/// Inputs of an accessory, processed in arrival order.
#[derive(Debug)]
pub(crate) enum Trigger {
    /// Explicit set request from the host integration.
    Set {
        value: bool,
        reply: oneshot::Sender<Result<Option<StateChange>>>,
    },
    /// A scheduled timer expired.
    TimerFired(TimerTicket),
    /// The liveness monitor reported an edge.
    Reachability(Reachability),
    /// Hands a running liveness monitor over to the accessory.
    AttachMonitor(MonitorHandle),
    /// Stops the accessory.
    Shutdown(oneshot::Sender<()>),
}

/// State owned by the accessory task.
pub(crate) struct SwitchActor<E> {
    identity: AccessoryId,
    machine: SwitchStateMachine,
    emitter: E,
    store: Arc<dyn StateStore>,
    timers: TimerScheduler,
    monitor: Option<MonitorHandle>,
    // Weak so that pending timers do not keep the accessory alive.
    triggers: mpsc::WeakUnboundedSender<Trigger>,
    state_tx: watch::Sender<SwitchState>,
    events: EventBus,
}

impl<E: CommandEmitter> SwitchActor<E> {
    pub(crate) fn new(
        identity: AccessoryId,
        machine: SwitchStateMachine,
        emitter: E,
        store: Arc<dyn StateStore>,
        triggers: mpsc::WeakUnboundedSender<Trigger>,
        state_tx: watch::Sender<SwitchState>,
        events: EventBus,
    ) -> Self {
        Self {
            identity,
            machine,
            emitter,
            store,
            timers: TimerScheduler::new(),
            monitor: None,
            triggers,
            state_tx,
            events,
        }
    }

    /// Processes triggers until shutdown or until every handle is dropped.
    pub(crate) async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Trigger>) {
        tracing::debug!(identity = %self.identity, "Accessory started");

        while let Some(trigger) = rx.recv().await {
            match trigger {
                Trigger::Set { value, reply } => {
                    let result = self.apply(value, TriggerSource::Request).await;
                    // Caller may have given up waiting
                    let _ = reply.send(result);
                }
                Trigger::TimerFired(ticket) => self.on_timer(ticket).await,
                Trigger::Reachability(reachability) => self.on_reachability(reachability).await,
                Trigger::AttachMonitor(handle) => {
                    if let Some(previous) = self.monitor.replace(handle) {
                        previous.cancel();
                    }
                }
                Trigger::Shutdown(done) => {
                    self.stop();
                    rx.close();
                    let _ = done.send(());
                    return;
                }
            }
        }

        self.stop();
    }

    /// Arms a timer whose fire is queued back into this accessory.
    pub(crate) fn arm(&mut self, kind: TimerKind, delay: Duration) {
        let triggers = self.triggers.clone();
        self.timers.schedule(kind, delay, move |ticket| {
            if let Some(tx) = triggers.upgrade() {
                let _ = tx.send(Trigger::TimerFired(ticket));
            }
        });
    }

    async fn apply(&mut self, value: bool, source: TriggerSource) -> Result<Option<StateChange>> {
        let Some(transition) = self.machine.apply(value, source) else {
            tracing::debug!(
                identity = %self.identity,
                state = %self.machine.state(),
                %source,
                "Switch already in requested state"
            );
            return Ok(None);
        };

        let Transition {
            change,
            emission,
            persist,
            arm,
        } = transition;

        tracing::info!(
            identity = %self.identity,
            from = %change.previous,
            to = %change.current,
            %source,
            "Switch state changed"
        );
        self.state_tx.send_replace(change.current);
        // A pending resync would re-send the restored state, not this one
        self.timers.cancel(TimerKind::Resend);
        self.events.publish(SwitchEvent::StateChanged {
            identity: self.identity.clone(),
            change: change.clone(),
        });

        let emitted = match emission {
            Emission::Send(payload) => self.emit(change.current, payload).await,
            Emission::Unconfigured => {
                tracing::debug!(identity = %self.identity, state = %change.current, "No payload configured, nothing sent");
                Ok(())
            }
            Emission::Suppressed => Ok(()),
        };

        if persist {
            self.persist(change.current);
        }

        if let Some((kind, delay)) = arm {
            self.arm(kind, delay);
        }

        emitted?;
        Ok(Some(change))
    }

    async fn emit(&self, state: SwitchState, payload: Payload) -> Result<()> {
        match self.emitter.emit(&payload).await {
            Ok(()) => {
                tracing::debug!(identity = %self.identity, %state, %payload, "Command emitted");
                self.events.publish(SwitchEvent::CommandEmitted {
                    identity: self.identity.clone(),
                    state,
                    payload,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(identity = %self.identity, %state, error = %e, "Failed to emit command");
                self.events.publish(SwitchEvent::EmissionFailed {
                    identity: self.identity.clone(),
                    payload,
                    error: e.to_string(),
                });
                Err(Error::Emission(e))
            }
        }
    }

    fn persist(&self, state: SwitchState) {
        let Some(value) = state.as_bool() else {
            return;
        };

        if let Err(e) = self.store.save(&self.identity, value) {
            tracing::warn!(identity = %self.identity, error = %e, "Failed to persist switch state");
            self.events.publish(SwitchEvent::PersistenceFailed {
                identity: self.identity.clone(),
                error: e.to_string(),
            });
        }
    }

    async fn on_timer(&mut self, ticket: TimerTicket) {
        if !self.timers.claim(ticket) {
            tracing::debug!(identity = %self.identity, kind = %ticket.kind(), "Ignoring stale timer");
            return;
        }

        let result = match ticket.kind() {
            TimerKind::AutoOff => self.apply(false, TriggerSource::AutoOff).await.map(drop),
            TimerKind::AutoOn => self.apply(true, TriggerSource::AutoOn).await.map(drop),
            TimerKind::Resend => self.resend().await,
        };

        if let Err(e) = result {
            tracing::debug!(identity = %self.identity, kind = %ticket.kind(), error = %e, "Timer action failed");
        }
    }

    async fn resend(&self) -> Result<()> {
        let state = self.machine.state();
        let Some(payload) = self.machine.resync_payload().cloned() else {
            tracing::debug!(identity = %self.identity, %state, "Nothing to resend");
            return Ok(());
        };

        tracing::info!(identity = %self.identity, %state, "Resending restored state");
        self.emit(state, payload).await
    }

    async fn on_reachability(&mut self, reachability: Reachability) {
        self.events.publish(SwitchEvent::ReachabilityChanged {
            identity: self.identity.clone(),
            reachability,
        });

        if let Err(e) = self
            .apply(reachability.is_up(), TriggerSource::Reachability)
            .await
        {
            tracing::debug!(identity = %self.identity, %reachability, error = %e, "Reachability update failed");
        }
    }

    fn stop(&mut self) {
        self.timers.cancel_all();
        if let Some(monitor) = self.monitor.take() {
            monitor.cancel();
        }
        tracing::debug!(identity = %self.identity, "Accessory stopped");
    }
}
