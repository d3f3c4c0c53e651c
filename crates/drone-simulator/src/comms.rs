//! `SimComms`: an in-process, actively-simulating [`CommsInterface`]. Where
//! `ChannelComms` (in `drone-coordinator`) is a passive double for unit
//! tests, this one drives real per-drone physics on a background tick task
//! and reacts to commanded targets the way hardware would.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use drone_coordinator::{CommsInterface, DroneCommand, StatusFlags, TelemetryEvent};
use drone_domain::DroneId;

use crate::motion::DroneMotionModel;
use crate::scenario::DroneSpec;

/// Per-drone physics plus the wire-facing state the telemetry loop reads
/// each tick: the last numeric pattern id commanded, so status flags and
/// the outbound `TelemetryEvent` can reflect it.
struct SimulatedDrone {
    motion: DroneMotionModel,
    current_pattern_id: u16,
}

/// In-process comms substrate. Integrates every registered drone's motion
/// model on a fixed tick and publishes the results on a broadcast channel;
/// commanded targets from `send_command` steer the next integration.
pub struct SimComms {
    connected: Arc<AtomicBool>,
    telemetry_tx: broadcast::Sender<TelemetryEvent>,
    drones: Arc<Mutex<HashMap<DroneId, SimulatedDrone>>>,
    tick_interval_ms: u64,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

impl SimComms {
    #[must_use]
    pub fn new(specs: &[DroneSpec], tick_interval_ms: u64) -> Self {
        let drones = specs
            .iter()
            .map(|spec| {
                let motion = DroneMotionModel::new(spec.initial_position, spec.initial_battery_pct);
                (spec.id.clone(), SimulatedDrone { motion, current_pattern_id: 0 })
            })
            .collect();

        let (telemetry_tx, _rx) = broadcast::channel(256);
        Self {
            connected: Arc::new(AtomicBool::new(false)),
            telemetry_tx,
            drones: Arc::new(Mutex::new(drones)),
            tick_interval_ms,
            tick_task: Mutex::new(None),
        }
    }
}

fn status_flags_for(sensor: &drone_domain::SensorState) -> StatusFlags {
    let mut flags = StatusFlags(0);
    if sensor.position.z > 0.1 {
        flags = flags | StatusFlags::AIRBORNE;
    }
    if sensor.battery.percentage < 0.15 {
        flags = flags | StatusFlags::LOW_BATTERY;
    }
    flags = flags | StatusFlags::PATTERN_ACTIVE;
    flags
}

#[async_trait]
impl CommsInterface for SimComms {
    async fn connect(&self, drone_ids: &[DroneId]) {
        tracing::info!(count = drone_ids.len(), "sim comms: connect");
        self.connected.store(true, Ordering::SeqCst);

        let drones = Arc::clone(&self.drones);
        let telemetry_tx = self.telemetry_tx.clone();
        let tick_interval_ms = self.tick_interval_ms;
        let connected = Arc::clone(&self.connected);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(tick_interval_ms));
            let dt_s = tick_interval_ms as f64 / 1000.0;
            loop {
                interval.tick().await;
                if !connected.load(Ordering::SeqCst) {
                    break;
                }
                let mut drones = drones.lock().await;
                for (id, drone) in drones.iter_mut() {
                    let sensor_state = drone.motion.step(dt_s);
                    let status_flags = status_flags_for(&sensor_state);
                    let event = TelemetryEvent {
                        drone_id: id.clone(),
                        sensor_state,
                        current_pattern_id: drone.current_pattern_id,
                        status_flags,
                    };
                    if telemetry_tx.send(event).is_err() {
                        tracing::debug!("sim comms: no telemetry subscribers");
                    }
                }
            }
        });

        *self.tick_task.lock().await = Some(task);
    }

    async fn disconnect(&self) {
        tracing::info!("sim comms: disconnect");
        self.connected.store(false, Ordering::SeqCst);
        if let Some(task) = self.tick_task.lock().await.take() {
            task.abort();
        }
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_command(&self, drone_id: &DroneId, command: DroneCommand) {
        let mut drones = self.drones.lock().await;
        let Some(drone) = drones.get_mut(drone_id) else {
            tracing::warn!(drone_id = %drone_id, "sim comms: command for unknown drone, discarded");
            return;
        };
        drone.current_pattern_id = command.pattern_id;
        drone.motion.set_target(command.target_pos, command.target_vel);
    }

    fn subscribe_telemetry(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.telemetry_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drone_domain::Vec3;

    fn spec(id: &str) -> DroneSpec {
        DroneSpec {
            id: id.to_string(),
            initial_position: Vec3::new(0.0, 0.0, 0.0),
            initial_battery_pct: 1.0,
        }
    }

    #[tokio::test]
    async fn connect_flips_connected_and_starts_publishing_telemetry() {
        let comms = SimComms::new(&[spec("d0")], 10);
        assert!(!comms.connected());
        let mut rx = comms.subscribe_telemetry();

        comms.connect(&["d0".to_string()]).await;
        assert!(comms.connected());

        let event = tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("telemetry should arrive within the timeout")
            .expect("channel should not be closed");
        assert_eq!(event.drone_id, "d0");

        comms.disconnect().await;
        assert!(!comms.connected());
    }

    #[tokio::test]
    async fn send_command_updates_the_target_used_by_the_next_tick() {
        let comms = SimComms::new(&[spec("d0")], 10);
        comms
            .send_command(
                &"d0".to_string(),
                DroneCommand {
                    pattern_id: 3,
                    target_pos: (5.0, 0.0, 1.0),
                    target_vel: (0.0, 0.0, 0.0),
                    flags: drone_coordinator::CommandFlags(0),
                },
            )
            .await;
        let drones = comms.drones.lock().await;
        assert_eq!(drones.get("d0").unwrap().current_pattern_id, 3);
    }

    #[tokio::test]
    async fn unknown_drone_command_is_discarded_without_panicking() {
        let comms = SimComms::new(&[spec("d0")], 10);
        comms
            .send_command(
                &"ghost".to_string(),
                DroneCommand {
                    pattern_id: 1,
                    target_pos: (0.0, 0.0, 0.0),
                    target_vel: (0.0, 0.0, 0.0),
                    flags: drone_coordinator::CommandFlags(0),
                },
            )
            .await;
    }
}
