//! The outbound comms interface: comms is an interface, not a dependency.
//! The core depends only on this trait; a hardware radio bridge and the
//! in-process simulator (`drone-simulator::SimComms`) are both
//! implementations the coordinator never distinguishes between.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use drone_domain::{DroneId, SensorState};

use crate::wire::{DroneCommand, StatusFlags};

/// One telemetry update as delivered by the comms layer: drone id, sensor
/// state, its current numeric pattern id, and status flags.
#[derive(Debug, Clone)]
pub struct TelemetryEvent {
    pub drone_id: DroneId,
    pub sensor_state: SensorState,
    pub current_pattern_id: u16,
    pub status_flags: StatusFlags,
}

/// Narrow outbound interface the coordinator consumes. `send_command` is
/// fire-and-forget: failures are swallowed by the implementation itself,
/// never surfaced to the coordinator as a `Result`.
#[async_trait]
pub trait CommsInterface: Send + Sync {
    async fn connect(&self, drone_ids: &[DroneId]);
    async fn disconnect(&self);
    fn connected(&self) -> bool;
    async fn send_command(&self, drone_id: &DroneId, command: DroneCommand);

    /// Subscribe to the telemetry stream. Called once at `Coordinator::start`;
    /// every event on this channel is fed to `WorldModel::update_telemetry`.
    fn subscribe_telemetry(&self) -> broadcast::Receiver<TelemetryEvent>;
}

/// A comms implementation that talks to nothing: `connect`/`disconnect`
/// flip a flag, `send_command` only logs, and its telemetry channel never
/// produces an event. Useful as the coordinator binary's standalone
/// smoke-run target and as a baseline in tests that don't care about wire
/// traffic at all.
pub struct NullComms {
    connected: AtomicBool,
    telemetry_tx: broadcast::Sender<TelemetryEvent>,
}

impl NullComms {
    #[must_use]
    pub fn new() -> Self {
        let (telemetry_tx, _rx) = broadcast::channel(16);
        Self {
            connected: AtomicBool::new(false),
            telemetry_tx,
        }
    }
}

impl Default for NullComms {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommsInterface for NullComms {
    async fn connect(&self, drone_ids: &[DroneId]) {
        tracing::debug!(count = drone_ids.len(), "null comms: connect");
        self.connected.store(true, Ordering::SeqCst);
    }

    async fn disconnect(&self) {
        tracing::debug!("null comms: disconnect");
        self.connected.store(false, Ordering::SeqCst);
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_command(&self, drone_id: &DroneId, command: DroneCommand) {
        tracing::debug!(drone_id = %drone_id, pattern_id = command.pattern_id, "null comms: send_command (discarded)");
    }

    fn subscribe_telemetry(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.telemetry_tx.subscribe()
    }
}

/// A channel-backed comms implementation suitable for tests: holds on to a
/// sender so callers can inject telemetry and a log of sent commands so
/// assertions can inspect what the coordinator emitted.
#[derive(Clone)]
pub struct ChannelComms {
    connected: Arc<AtomicBool>,
    telemetry_tx: broadcast::Sender<TelemetryEvent>,
    sent: Arc<std::sync::Mutex<Vec<(DroneId, DroneCommand)>>>,
}

impl ChannelComms {
    #[must_use]
    pub fn new() -> Self {
        let (telemetry_tx, _rx) = broadcast::channel(256);
        Self {
            connected: Arc::new(AtomicBool::new(false)),
            telemetry_tx,
            sent: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Push a telemetry event as if it arrived over the radio.
    pub fn inject_telemetry(&self, event: TelemetryEvent) {
        let _ = self.telemetry_tx.send(event);
    }

    #[must_use]
    pub fn sent_commands(&self) -> Vec<(DroneId, DroneCommand)> {
        self.sent.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }
}

impl Default for ChannelComms {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommsInterface for ChannelComms {
    async fn connect(&self, _drone_ids: &[DroneId]) {
        self.connected.store(true, Ordering::SeqCst);
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_command(&self, drone_id: &DroneId, command: DroneCommand) {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((drone_id.clone(), command));
    }

    fn subscribe_telemetry(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.telemetry_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_comms_tracks_connected_state() {
        let comms = NullComms::new();
        assert!(!comms.connected());
        comms.connect(&["d0".to_string()]).await;
        assert!(comms.connected());
        comms.disconnect().await;
        assert!(!comms.connected());
    }

    #[tokio::test]
    async fn channel_comms_records_sent_commands() {
        let comms = ChannelComms::new();
        let command = DroneCommand {
            pattern_id: 1,
            target_pos: (0.0, 0.0, 0.0),
            target_vel: (0.0, 0.0, 0.0),
            flags: crate::wire::CommandFlags(0),
        };
        comms.send_command(&"d0".to_string(), command).await;
        assert_eq!(comms.sent_commands().len(), 1);
    }
}
