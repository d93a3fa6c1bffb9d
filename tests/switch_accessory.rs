// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for switch accessories.
//!
//! Timer-driven behavior runs on a paused tokio clock, so sleeps complete
//! instantly while preserving ordering.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use smart_switch::error::{ConfigError, EmitError, Error, PersistenceError, ProbeError};
use smart_switch::liveness::{Probe, Reachability};
use smart_switch::state::{SwitchState, TriggerSource};
use smart_switch::store::{JsonFileStateStore, MemoryStateStore, StateStore};
use smart_switch::types::{AccessoryId, Payload};
use smart_switch::{CommandEmitter, EventBus, Switch, SwitchConfig, SwitchEvent};
use tokio::time::sleep;

// ============================================================================
// Test doubles
// ============================================================================

/// Records every payload it is asked to send.
#[derive(Debug, Clone, Default)]
struct RecordingEmitter {
    sent: Arc<Mutex<Vec<Payload>>>,
}

impl RecordingEmitter {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().iter().map(|p| p.as_str().to_string()).collect()
    }

    fn count(&self) -> usize {
        self.sent.lock().len()
    }

    fn has_sent(&self, payload: &str) -> bool {
        self.sent.lock().iter().any(|p| p.as_str() == payload)
    }
}

impl CommandEmitter for RecordingEmitter {
    async fn emit(&self, payload: &Payload) -> Result<(), EmitError> {
        self.sent.lock().push(payload.clone());
        Ok(())
    }
}

/// Fails every emission.
#[derive(Debug, Clone, Default)]
struct FailingEmitter {
    attempts: Arc<AtomicUsize>,
}

impl CommandEmitter for FailingEmitter {
    async fn emit(&self, _payload: &Payload) -> Result<(), EmitError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(EmitError::Transport("no route to blaster".to_string()))
    }
}

/// Reports a switchable reachability and counts probes.
#[derive(Debug, Clone)]
struct FakeProbe {
    up: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl FakeProbe {
    fn new(up: bool) -> Self {
        Self {
            up: Arc::new(AtomicBool::new(up)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Probe for FakeProbe {
    async fn probe(&self, _target: &str) -> Result<Reachability, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Reachability::from(self.up.load(Ordering::SeqCst)))
    }
}

/// Memory store counting reads and writes.
#[derive(Debug, Default)]
struct CountingStore {
    inner: MemoryStateStore,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl CountingStore {
    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl StateStore for CountingStore {
    fn load(&self, identity: &AccessoryId) -> Result<Option<bool>, PersistenceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(identity)
    }

    fn save(&self, identity: &AccessoryId, value: bool) -> Result<(), PersistenceError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(identity, value)
    }
}

/// Store whose writes always fail.
#[derive(Debug, Default)]
struct ReadOnlyStore;

impl StateStore for ReadOnlyStore {
    fn load(&self, _identity: &AccessoryId) -> Result<Option<bool>, PersistenceError> {
        Ok(None)
    }

    fn save(&self, _identity: &AccessoryId, _value: bool) -> Result<(), PersistenceError> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
    }
}

/// Store whose reads always fail.
#[derive(Debug, Default)]
struct UnreadableStore;

impl StateStore for UnreadableStore {
    fn load(&self, _identity: &AccessoryId) -> Result<Option<bool>, PersistenceError> {
        Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "truncated record").into())
    }

    fn save(&self, _identity: &AccessoryId, _value: bool) -> Result<(), PersistenceError> {
        Ok(())
    }
}

fn on_off() -> SwitchConfig {
    SwitchConfig::new("ON", "OFF")
}

// ============================================================================
// Explicit requests
// ============================================================================

mod explicit_requests {
    use super::*;

    #[tokio::test]
    async fn turns_on() {
        let emitter = RecordingEmitter::default();
        let switch = Switch::builder("Switch", on_off().with_persist_state(false))
            .spawn(emitter.clone())
            .unwrap();

        switch.set(true).await.unwrap();

        assert_eq!(switch.state(), SwitchState::On);
        assert!(emitter.has_sent("ON"));
        assert_eq!(emitter.count(), 1);
    }

    #[tokio::test]
    async fn turns_off() {
        let emitter = RecordingEmitter::default();
        let switch = Switch::builder("Switch", on_off().with_persist_state(false))
            .spawn(emitter.clone())
            .unwrap();

        switch.set(true).await.unwrap();
        assert_eq!(switch.state(), SwitchState::On);

        switch.set(false).await.unwrap();
        assert_eq!(switch.state(), SwitchState::Off);

        assert!(emitter.has_sent("OFF"));
        assert_eq!(emitter.count(), 2);
    }

    #[tokio::test]
    async fn on_off_off_scenario() {
        let emitter = RecordingEmitter::default();
        let switch = Switch::builder("Switch", on_off().with_persist_state(false))
            .spawn(emitter.clone())
            .unwrap();

        switch.set(true).await.unwrap();
        assert_eq!(emitter.sent(), ["ON"]);

        switch.set(false).await.unwrap();
        assert_eq!(emitter.sent(), ["ON", "OFF"]);

        let change = switch.set(false).await.unwrap();
        assert!(change.is_none());
        assert_eq!(emitter.sent(), ["ON", "OFF"]);
    }

    #[tokio::test]
    async fn identical_requests_emit_and_persist_once() {
        let emitter = RecordingEmitter::default();
        let store = Arc::new(CountingStore::default());
        let switch = Switch::builder("Switch", on_off())
            .store(Arc::clone(&store))
            .spawn(emitter.clone())
            .unwrap();

        let first = switch.set(true).await.unwrap();
        assert!(first.is_some());
        for _ in 0..5 {
            assert!(switch.set(true).await.unwrap().is_none());
        }

        assert_eq!(emitter.count(), 1);
        assert_eq!(store.saves(), 1);
    }

    #[tokio::test]
    async fn change_reports_previous_state_and_source() {
        let switch = Switch::builder("Switch", on_off().with_persist_state(false))
            .spawn(RecordingEmitter::default())
            .unwrap();

        let change = switch.turn_off().await.unwrap().unwrap();
        assert_eq!(change.previous, SwitchState::Unknown);
        assert_eq!(change.current, SwitchState::Off);
        assert_eq!(change.source, TriggerSource::Request);
    }

    #[tokio::test]
    async fn watch_sees_every_transition() {
        let switch = Switch::builder("Switch", on_off().with_persist_state(false))
            .spawn(RecordingEmitter::default())
            .unwrap();
        let mut state = switch.watch();

        switch.turn_on().await.unwrap();
        state.changed().await.unwrap();
        assert_eq!(*state.borrow_and_update(), SwitchState::On);
    }
}

// ============================================================================
// Auto timers
// ============================================================================

mod auto_timers {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn auto_off_after_on_duration() {
        let emitter = RecordingEmitter::default();
        let config = on_off().with_persist_state(false).with_auto_off(1.0);
        let switch = Switch::builder("Switch", config)
            .spawn(emitter.clone())
            .unwrap();

        switch.set(true).await.unwrap();
        assert_eq!(switch.state(), SwitchState::On);

        sleep(Duration::from_millis(400)).await;
        assert_eq!(switch.state(), SwitchState::On);

        sleep(Duration::from_millis(700)).await;
        assert_eq!(switch.state(), SwitchState::Off);
        assert_eq!(emitter.sent(), ["ON", "OFF"]);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_on_after_off_duration() {
        let emitter = RecordingEmitter::default();
        let config = on_off().with_persist_state(false).with_auto_on(1.0);
        let switch = Switch::builder("Switch", config)
            .spawn(emitter.clone())
            .unwrap();

        switch.set(true).await.unwrap();
        switch.set(false).await.unwrap();
        assert_eq!(switch.state(), SwitchState::Off);

        sleep(Duration::from_millis(400)).await;
        assert_eq!(switch.state(), SwitchState::Off);

        sleep(Duration::from_millis(700)).await;
        assert_eq!(switch.state(), SwitchState::On);
        assert_eq!(emitter.sent(), ["ON", "OFF", "ON"]);
    }

    #[tokio::test(start_paused = true)]
    async fn turning_on_again_restarts_auto_off() {
        let emitter = RecordingEmitter::default();
        let config = on_off().with_persist_state(false).with_auto_off(1.0);
        let switch = Switch::builder("Switch", config)
            .spawn(emitter.clone())
            .unwrap();

        switch.set(true).await.unwrap();
        sleep(Duration::from_millis(600)).await;
        switch.set(false).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        switch.set(true).await.unwrap();

        // The first timer would have fired at 1.0s
        sleep(Duration::from_millis(500)).await;
        assert_eq!(switch.state(), SwitchState::On);

        sleep(Duration::from_millis(600)).await;
        assert_eq!(switch.state(), SwitchState::Off);
        assert_eq!(emitter.sent(), ["ON", "OFF", "ON", "OFF"]);
    }

    #[tokio::test(start_paused = true)]
    async fn redundant_request_does_not_rearm() {
        let config = on_off().with_persist_state(false).with_auto_off(1.0);
        let switch = Switch::builder("Switch", config)
            .spawn(RecordingEmitter::default())
            .unwrap();

        switch.set(true).await.unwrap();
        sleep(Duration::from_millis(800)).await;
        switch.set(true).await.unwrap();

        sleep(Duration::from_millis(300)).await;
        assert_eq!(switch.state(), SwitchState::Off);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_off_change_is_attributed_to_timer() {
        let config = on_off().with_persist_state(false).with_auto_off(1.0);
        let switch = Switch::builder("Switch", config)
            .spawn(RecordingEmitter::default())
            .unwrap();
        let mut events = switch.subscribe();

        switch.set(true).await.unwrap();
        sleep(Duration::from_millis(1100)).await;

        let mut sources = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let SwitchEvent::StateChanged { change, .. } = event {
                sources.push(change.source);
            }
        }
        assert_eq!(sources, [TriggerSource::Request, TriggerSource::AutoOff]);
    }
}

// ============================================================================
// Persistence and reload
// ============================================================================

mod persistence {
    use super::*;

    #[tokio::test]
    async fn restores_state_in_new_instance() {
        let store = Arc::new(MemoryStateStore::new());
        let config = on_off();

        let first = Switch::builder("Unit Test Switch", config.clone())
            .store(Arc::clone(&store))
            .spawn(RecordingEmitter::default())
            .unwrap();
        first.set(true).await.unwrap();
        assert_eq!(first.state(), SwitchState::On);

        let emitter = RecordingEmitter::default();
        let second = Switch::builder("Unit Test Switch", config.clone())
            .store(Arc::clone(&store))
            .spawn(emitter.clone())
            .unwrap();
        assert_eq!(second.state(), SwitchState::On);
        assert_eq!(emitter.count(), 0);

        second.set(false).await.unwrap();
        assert_eq!(second.state(), SwitchState::Off);

        let third = Switch::builder("Unit Test Switch", config)
            .store(Arc::clone(&store))
            .spawn(RecordingEmitter::default())
            .unwrap();
        assert_eq!(third.state(), SwitchState::Off);
    }

    #[tokio::test]
    async fn disabled_persistence_starts_unknown_and_skips_store() {
        let store = Arc::new(CountingStore::default());
        store.inner.save(&AccessoryId::new("Unit Test Switch"), true).unwrap();
        let config = on_off().with_persist_state(false);

        let first = Switch::builder("Unit Test Switch", config.clone())
            .store(Arc::clone(&store))
            .spawn(RecordingEmitter::default())
            .unwrap();
        assert_eq!(first.state(), SwitchState::Unknown);
        first.set(true).await.unwrap();

        let second = Switch::builder("Unit Test Switch", config)
            .store(Arc::clone(&store))
            .spawn(RecordingEmitter::default())
            .unwrap();
        assert_eq!(second.state(), SwitchState::Unknown);

        assert_eq!(store.loads(), 0);
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn identities_do_not_share_state() {
        let store = Arc::new(MemoryStateStore::new());

        let fan = Switch::builder("Fan", on_off())
            .store(Arc::clone(&store))
            .spawn(RecordingEmitter::default())
            .unwrap();
        fan.set(true).await.unwrap();

        let lamp = Switch::builder("Lamp", on_off())
            .store(Arc::clone(&store))
            .spawn(RecordingEmitter::default())
            .unwrap();
        assert_eq!(lamp.state(), SwitchState::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn resend_after_reload_emits_once_after_delay() {
        let store = Arc::new(MemoryStateStore::new());
        let config = on_off().with_resend_after_reload(0.1);

        let first = Switch::builder("Switch", config.clone())
            .store(Arc::clone(&store))
            .spawn(RecordingEmitter::default())
            .unwrap();
        first.set(true).await.unwrap();

        let emitter = RecordingEmitter::default();
        let second = Switch::builder("Switch", config)
            .store(Arc::clone(&store))
            .spawn(emitter.clone())
            .unwrap();
        assert_eq!(second.state(), SwitchState::On);

        sleep(Duration::from_millis(50)).await;
        assert_eq!(emitter.count(), 0);

        sleep(Duration::from_millis(250)).await;
        assert!(emitter.has_sent("ON"));
        assert_eq!(emitter.count(), 1);
        assert_eq!(second.state(), SwitchState::On);
    }

    #[tokio::test(start_paused = true)]
    async fn no_resend_when_disabled() {
        let store = Arc::new(MemoryStateStore::new());
        let mut config = on_off();
        config.resend_hex_after_reload = false;
        config.resend_data_after_reload_delay = 0.1;

        let first = Switch::builder("Switch", config.clone())
            .store(Arc::clone(&store))
            .spawn(RecordingEmitter::default())
            .unwrap();
        first.set(true).await.unwrap();

        let emitter = RecordingEmitter::default();
        let second = Switch::builder("Switch", config)
            .store(Arc::clone(&store))
            .spawn(emitter.clone())
            .unwrap();
        assert_eq!(second.state(), SwitchState::On);

        sleep(Duration::from_millis(300)).await;
        assert!(!emitter.has_sent("ON"));
        assert_eq!(emitter.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn no_resend_without_restored_state() {
        let emitter = RecordingEmitter::default();
        let switch = Switch::builder("Fresh", on_off().with_resend_after_reload(0.1))
            .spawn(emitter.clone())
            .unwrap();

        sleep(Duration::from_millis(300)).await;
        assert_eq!(switch.state(), SwitchState::Unknown);
        assert_eq!(emitter.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transition_before_resend_cancels_it() {
        let store = Arc::new(MemoryStateStore::new());
        store.save(&AccessoryId::new("Switch"), true).unwrap();

        let emitter = RecordingEmitter::default();
        let switch = Switch::builder("Switch", on_off().with_resend_after_reload(1.0))
            .store(Arc::clone(&store))
            .spawn(emitter.clone())
            .unwrap();

        switch.set(false).await.unwrap();
        sleep(Duration::from_secs(2)).await;

        assert_eq!(emitter.sent(), ["OFF"]);
    }

    #[tokio::test]
    async fn json_file_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let config = on_off();

        let first = Switch::builder("Porch Light", config.clone())
            .store(JsonFileStateStore::new(&path))
            .spawn(RecordingEmitter::default())
            .unwrap();
        first.set(true).await.unwrap();
        first.shutdown().await;

        let second = Switch::builder("Porch Light", config)
            .store(JsonFileStateStore::new(&path))
            .spawn(RecordingEmitter::default())
            .unwrap();
        assert_eq!(second.state(), SwitchState::On);
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_record_starts_unknown() {
        let bus = EventBus::new();
        let mut events = bus.subscribe();
        let emitter = RecordingEmitter::default();

        let switch = Switch::builder("Switch", on_off().with_resend_after_reload(0.1))
            .store(UnreadableStore)
            .event_bus(bus)
            .spawn(emitter.clone())
            .unwrap();
        assert_eq!(switch.state(), SwitchState::Unknown);

        let event = events.try_recv().unwrap();
        assert!(matches!(
            event,
            SwitchEvent::PersistenceFailed { ref identity, .. } if identity.as_str() == "Switch"
        ));
        assert!(event.is_failure());

        // Nothing was restored, so nothing is resent
        sleep(Duration::from_secs(1)).await;
        assert_eq!(switch.state(), SwitchState::Unknown);
        assert_eq!(emitter.count(), 0);
    }

    #[tokio::test]
    async fn write_failure_is_not_fatal() {
        let emitter = RecordingEmitter::default();
        let switch = Switch::builder("Switch", on_off())
            .store(ReadOnlyStore)
            .spawn(emitter.clone())
            .unwrap();
        let mut events = switch.subscribe();

        let change = switch.set(true).await.unwrap();
        assert!(change.is_some());
        assert_eq!(switch.state(), SwitchState::On);
        assert_eq!(emitter.count(), 1);

        let mut saw_failure = false;
        while let Ok(event) = events.try_recv() {
            saw_failure |= matches!(event, SwitchEvent::PersistenceFailed { .. });
        }
        assert!(saw_failure);
    }
}

// ============================================================================
// Reachability
// ============================================================================

mod reachability {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn host_up_turns_on_and_emits() {
        let emitter = RecordingEmitter::default();
        let config = on_off()
            .with_persist_state(false)
            .with_ping_target("192.168.1.1");
        let switch = Switch::builder("Switch", config)
            .spawn(emitter.clone())
            .unwrap();
        assert_eq!(switch.state(), SwitchState::Unknown);

        switch.watch_reachability(FakeProbe::new(true)).unwrap();
        sleep(Duration::from_millis(300)).await;

        assert_eq!(switch.state(), SwitchState::On);
        assert_eq!(emitter.sent(), ["ON"]);
    }

    #[tokio::test(start_paused = true)]
    async fn host_down_without_payloads_turns_off_silently() {
        let emitter = RecordingEmitter::default();
        let config = SwitchConfig::ping_only("192.168.1.1").with_persist_state(false);
        let switch = Switch::builder("Switch", config)
            .spawn(emitter.clone())
            .unwrap();
        assert_eq!(switch.state(), SwitchState::Unknown);

        switch.watch_reachability(FakeProbe::new(false)).unwrap();
        sleep(Duration::from_millis(300)).await;

        assert_eq!(switch.state(), SwitchState::Off);
        assert_eq!(emitter.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn state_only_mirrors_without_emitting() {
        let emitter = RecordingEmitter::default();
        let config = on_off()
            .with_persist_state(false)
            .with_ping_target("192.168.1.1")
            .with_ping_state_only(true);
        let switch = Switch::builder("Switch", config)
            .spawn(emitter.clone())
            .unwrap();

        switch.watch_reachability(FakeProbe::new(true)).unwrap();
        sleep(Duration::from_millis(300)).await;

        assert_eq!(switch.state(), SwitchState::On);
        assert_eq!(emitter.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn follows_edges_over_time() {
        let emitter = RecordingEmitter::default();
        let config = on_off()
            .with_persist_state(false)
            .with_ping_target("192.168.1.1")
            .with_ping_frequency(1.0);
        let switch = Switch::builder("Switch", config)
            .spawn(emitter.clone())
            .unwrap();
        let probe = FakeProbe::new(true);

        switch.watch_reachability(probe.clone()).unwrap();
        sleep(Duration::from_millis(500)).await;
        assert_eq!(switch.state(), SwitchState::On);

        probe.set_up(false);
        sleep(Duration::from_secs(1)).await;
        assert_eq!(switch.state(), SwitchState::Off);

        // Steady readings are not edges
        sleep(Duration::from_secs(3)).await;
        assert_eq!(emitter.sent(), ["ON", "OFF"]);
    }

    #[tokio::test]
    async fn requires_ping_target() {
        let switch = Switch::builder("Switch", on_off().with_persist_state(false))
            .spawn(RecordingEmitter::default())
            .unwrap();

        let result = switch.watch_reachability(FakeProbe::new(true));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingPingTarget))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_switch_stops_probing() {
        let config = SwitchConfig::ping_only("192.168.1.1").with_persist_state(false);
        let switch = Switch::builder("Switch", config)
            .spawn(RecordingEmitter::default())
            .unwrap();
        let probe = FakeProbe::new(true);

        switch.watch_reachability(probe.clone()).unwrap();
        sleep(Duration::from_millis(2500)).await;
        assert!(probe.calls() >= 2);

        drop(switch);
        sleep(Duration::from_millis(100)).await;
        let seen = probe.calls();

        sleep(Duration::from_secs(5)).await;
        assert_eq!(probe.calls(), seen);
    }
}

// ============================================================================
// Errors and lifecycle
// ============================================================================

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn missing_payloads_rejected_at_construction() {
        let result = Switch::builder("Switch", SwitchConfig::default())
            .spawn(RecordingEmitter::default());
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingPayload { .. }))
        ));
    }

    #[tokio::test]
    async fn blank_identity_rejected_when_persisting() {
        let result = Switch::builder("  ", on_off()).spawn(RecordingEmitter::default());
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::EmptyIdentity))
        ));

        let result = Switch::builder("", on_off().with_persist_state(false))
            .spawn(RecordingEmitter::default());
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn emission_failure_keeps_state_change() {
        let emitter = FailingEmitter::default();
        let store = Arc::new(MemoryStateStore::new());
        let switch = Switch::builder("Switch", on_off())
            .store(Arc::clone(&store))
            .spawn(emitter.clone())
            .unwrap();

        let result = switch.set(true).await;
        assert!(matches!(result, Err(Error::Emission(EmitError::Transport(_)))));
        assert_eq!(switch.state(), SwitchState::On);
        assert_eq!(store.load(&AccessoryId::new("Switch")).unwrap(), Some(true));

        // Already on: no retry, no error
        assert!(switch.set(true).await.unwrap().is_none());
        assert_eq!(emitter.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn events_follow_transition_order() {
        let switch = Switch::builder("Switch", on_off().with_persist_state(false))
            .spawn(RecordingEmitter::default())
            .unwrap();
        let mut events = switch.subscribe();

        switch.set(true).await.unwrap();

        let first = events.recv().await.unwrap();
        assert!(first.is_state_change());
        let second = events.recv().await.unwrap();
        assert!(matches!(
            second,
            SwitchEvent::CommandEmitted { state: SwitchState::On, ref payload, .. } if payload.as_str() == "ON"
        ));
        assert_eq!(second.identity().as_str(), "Switch");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_timers() {
        let emitter = RecordingEmitter::default();
        let config = on_off().with_persist_state(false).with_auto_off(1.0);
        let switch = Switch::builder("Switch", config)
            .spawn(emitter.clone())
            .unwrap();

        switch.set(true).await.unwrap();
        switch.shutdown().await;
        assert!(switch.is_closed());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(switch.state(), SwitchState::On);
        assert_eq!(emitter.sent(), ["ON"]);

        assert!(matches!(switch.set(false).await, Err(Error::Closed)));
        switch.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn closed_as_soon_as_shutdown_returns() {
        for _ in 0..200 {
            let switch = Switch::builder("Switch", on_off().with_persist_state(false))
                .spawn(RecordingEmitter::default())
                .unwrap();

            switch.shutdown().await;
            assert!(switch.is_closed());
        }
    }

    #[tokio::test]
    async fn clones_share_one_accessory() {
        let emitter = RecordingEmitter::default();
        let switch = Switch::builder("Switch", on_off().with_persist_state(false))
            .spawn(emitter.clone())
            .unwrap();
        let other = switch.clone();

        switch.set(true).await.unwrap();
        assert!(other.set(true).await.unwrap().is_none());
        assert_eq!(other.state(), SwitchState::On);
        assert_eq!(emitter.count(), 1);
    }
}
