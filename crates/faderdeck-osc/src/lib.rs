//! Subscriber registry and state broadcaster for the Faderdeck mixer.
//!
//! Control surfaces register an address once and then receive periodic
//! snapshots of every strip's fader state and meters. The actual wire
//! encoding and socket handling live behind [`UpdateTransport`]; this crate
//! owns only the bounded client table and the broadcast worker. None of it
//! ever runs on the audio callback path, so ordinary mutual exclusion is
//! fine here.

pub mod broadcast;
pub mod registry;

pub use broadcast::{snapshot_update, Broadcaster, ChannelUpdate, MixerUpdate, UpdateTransport};
pub use registry::{ClientRegistry, RegistryError};
