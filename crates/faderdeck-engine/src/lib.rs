//! Faderdeck Engine
//! ================
//! Real-time stereo summing mixer core for the Faderdeck hardware music
//! workstation. A fixed set of input channels plus one master bus, each with
//! level, balance, mute, solo, mono-sum, and phase control, per-leg digital
//! peak metering, and a lock-free boundary between the control plane and the
//! audio-period callback.

pub mod backend;
pub mod channel;
pub mod engine;
pub mod meter;
pub mod mixer;
pub mod session;

pub use backend::{AudioBackend, ChannelFeed, MasterOut, PeriodProcessor};
pub use engine::MixerRt;
pub use meter::{DpmState, Leg};
pub use mixer::{Mixer, MixerConfig};
pub use session::{MixerSession, SessionError};
