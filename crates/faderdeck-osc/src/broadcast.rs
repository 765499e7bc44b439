//! Periodic state fan-out to registered subscribers.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{select, Sender};
use faderdeck_engine::{DpmState, Mixer};
use serde::{Deserialize, Serialize};

use crate::registry::ClientRegistry;

/// Tick interval of the broadcast worker, independent of the audio period.
pub const BROADCAST_RATE: Duration = Duration::from_millis(100);

/// One strip's state as pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelUpdate {
    pub index: usize,
    pub level: f32,
    pub balance: f32,
    pub mute: bool,
    pub solo: bool,
    pub mono: bool,
    pub phase: bool,
    pub routed: bool,
    pub dpm: DpmState,
}

/// Snapshot of the whole desk: every input channel plus the master bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixerUpdate {
    pub channels: Vec<ChannelUpdate>,
    pub master: ChannelUpdate,
}

/// Wire seam: encodes and delivers one update to one subscriber. The OSC
/// framing and socket handling live behind this trait, outside this crate.
pub trait UpdateTransport: Send + Sync {
    fn send(&self, client: &str, update: &MixerUpdate) -> anyhow::Result<()>;
}

fn channel_update(mixer: &Mixer, index: usize) -> ChannelUpdate {
    ChannelUpdate {
        index,
        level: mixer.level(index),
        balance: mixer.balance(index),
        mute: mixer.mute(index),
        solo: mixer.solo(index),
        mono: mixer.mono(index),
        phase: mixer.phase(index),
        routed: mixer.is_channel_routed(index),
        dpm: mixer.dpm_state(index),
    }
}

/// Builds the full-desk snapshot a broadcast tick sends out.
pub fn snapshot_update(mixer: &Mixer) -> MixerUpdate {
    let channels = (0..mixer.max_channels())
        .map(|index| channel_update(mixer, index))
        .collect();
    MixerUpdate {
        channels,
        master: channel_update(mixer, mixer.max_channels()),
    }
}

/// Background worker that snapshots the mixer on a fixed tick and pushes the
/// update to every registered client. Never runs on the audio path.
pub struct Broadcaster {
    stop_tx: Sender<()>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl Broadcaster {
    pub fn spawn(
        mixer: Arc<Mixer>,
        registry: Arc<ClientRegistry>,
        transport: Arc<dyn UpdateTransport>,
    ) -> Self {
        Self::spawn_with_interval(mixer, registry, transport, BROADCAST_RATE)
    }

    /// As [`Broadcaster::spawn`] with an explicit tick interval.
    pub fn spawn_with_interval(
        mixer: Arc<Mixer>,
        registry: Arc<ClientRegistry>,
        transport: Arc<dyn UpdateTransport>,
        interval: Duration,
    ) -> Self {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let worker = std::thread::Builder::new()
            .name("faderdeck-osc-broadcast".to_string())
            .spawn(move || {
                tracing::debug!(?interval, "broadcast worker started");
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        default(interval) => {}
                    }

                    let clients = registry.clients();
                    if clients.is_empty() {
                        continue;
                    }
                    let update = snapshot_update(&mixer);
                    for client in &clients {
                        if let Err(err) = transport.send(client, &update) {
                            // Send failures are the subscriber's problem;
                            // never retried here.
                            tracing::warn!(%client, error = %err, "dropping mixer update");
                        }
                    }
                }
                tracing::debug!("broadcast worker stopped");
            })
            .expect("failed to spawn broadcast worker");

        Broadcaster {
            stop_tx,
            worker: Some(worker),
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.stop_tx.send(());
            let _ = worker.join();
        }
    }
}

impl Drop for Broadcaster {
    fn drop(&mut self) {
        self.shutdown();
    }
}
