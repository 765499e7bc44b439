//! The owned mixer state object and its control-plane API.
//!
//! All channel and meter slots are allocated once in [`Mixer::new`] and never
//! resized, which is what keeps the audio path free of any operation that
//! could block. Control calls are non-failing by design: numeric input is
//! clamped and any index at or above the channel capacity addresses the
//! master slot.

use serde::{Deserialize, Serialize};

use crate::channel::ChannelStrip;
use crate::meter::{DpmState, Leg};

/// Static configuration fixed at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixerConfig {
    /// Input channel capacity. The master bus is one extra slot on top.
    pub channels: usize,
    /// Periods the held peak sits before it starts to release.
    pub dpm_hold_periods: u32,
    /// Per-period exponential release factor for the held peak, in (0, 1).
    pub dpm_decay: f32,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            channels: 16,
            dpm_hold_periods: 48,
            dpm_decay: 0.9,
        }
    }
}

/// Summing mixer state: a fixed array of input strips plus one master strip.
///
/// The control plane mutates and queries strips through this object while the
/// audio engine reads the same strips each period; every shared field is an
/// independently observable atomic, so neither side ever takes a lock.
#[derive(Debug)]
pub struct Mixer {
    strips: Vec<ChannelStrip>,
    config: MixerConfig,
}

impl Mixer {
    pub fn new(config: MixerConfig) -> Self {
        let channels = config.channels.max(1);
        let config = MixerConfig {
            channels,
            dpm_decay: config.dpm_decay.clamp(f32::EPSILON, 1.0 - f32::EPSILON),
            ..config
        };
        let strips = (0..=channels).map(|_| ChannelStrip::new()).collect();
        Self { strips, config }
    }

    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// Fixed input channel capacity. Any index at or above this value
    /// (the boundary index included) addresses the master strip.
    pub fn max_channels(&self) -> usize {
        self.config.channels
    }

    /// Resolves a channel index to its strip, aliasing everything at or
    /// above the capacity to the master slot.
    fn strip(&self, channel: usize) -> &ChannelStrip {
        let index = channel.min(self.config.channels);
        &self.strips[index]
    }

    pub(crate) fn master_strip(&self) -> &ChannelStrip {
        &self.strips[self.config.channels]
    }

    pub(crate) fn channel_strip(&self, channel: usize) -> &ChannelStrip {
        debug_assert!(channel < self.config.channels);
        &self.strips[channel]
    }

    /// True when any non-master strip is soloed, which implicitly gates every
    /// other non-master, non-solo strip out of the mix.
    pub(crate) fn any_solo(&self) -> bool {
        self.strips[..self.config.channels].iter().any(|s| s.solo())
    }

    pub fn set_level(&self, channel: usize, level: f32) {
        self.strip(channel).set_level(level);
    }

    pub fn level(&self, channel: usize) -> f32 {
        self.strip(channel).level()
    }

    pub fn set_balance(&self, channel: usize, balance: f32) {
        self.strip(channel).set_balance(balance);
    }

    pub fn balance(&self, channel: usize) -> f32 {
        self.strip(channel).balance()
    }

    pub fn set_mute(&self, channel: usize, mute: bool) {
        self.strip(channel).set_mute(mute);
    }

    pub fn mute(&self, channel: usize) -> bool {
        self.strip(channel).mute()
    }

    /// Flips the stored mute flag and returns the new state.
    pub fn toggle_mute(&self, channel: usize) -> bool {
        self.strip(channel).toggle_mute()
    }

    pub fn set_solo(&self, channel: usize, solo: bool) {
        self.strip(channel).set_solo(solo);
        if solo && channel < self.config.channels {
            tracing::debug!(channel, "solo engaged");
        }
    }

    pub fn solo(&self, channel: usize) -> bool {
        self.strip(channel).solo()
    }

    pub fn set_mono(&self, channel: usize, mono: bool) {
        self.strip(channel).set_mono(mono);
    }

    pub fn mono(&self, channel: usize) -> bool {
        self.strip(channel).mono()
    }

    pub fn set_phase(&self, channel: usize, phase: bool) {
        self.strip(channel).set_phase(phase);
    }

    pub fn phase(&self, channel: usize) -> bool {
        self.strip(channel).phase()
    }

    /// Restores one strip's fader parameters to the documented defaults
    /// (level 0.8, balance centered, all switches off) without touching any
    /// other strip, the meters, or the DPM enable gate.
    pub fn reset(&self, channel: usize) {
        self.strip(channel).reset();
    }

    /// Derived routing state: true when the backend reported at least one
    /// upstream connection for this channel in the last processed period.
    pub fn is_channel_routed(&self, channel: usize) -> bool {
        self.strip(channel).routed()
    }

    pub fn enable_dpm(&self, channel: usize, enable: bool) {
        self.strip(channel).set_dpm_enabled(enable);
    }

    pub fn dpm_enabled(&self, channel: usize) -> bool {
        self.strip(channel).dpm_enabled()
    }

    /// Instantaneous peak of the most recent period for one leg.
    pub fn dpm(&self, channel: usize, leg: Leg) -> f32 {
        self.strip(channel).meter().peak(leg)
    }

    /// Held peak for one leg.
    pub fn dpm_hold(&self, channel: usize, leg: Leg) -> f32 {
        self.strip(channel).meter().held(leg)
    }

    /// Bulk meter state for one channel.
    pub fn dpm_state(&self, channel: usize) -> DpmState {
        let strip = self.strip(channel);
        let meter = strip.meter();
        DpmState {
            peak: [meter.peak(Leg::A), meter.peak(Leg::B)],
            held: [meter.held(Leg::A), meter.held(Leg::B)],
            mono: strip.mono(),
        }
    }

    /// Fills `out` with one [`DpmState`] per channel of the inclusive range
    /// `start..=end`, in ascending index order, and returns how many records
    /// were written. The range is clamped to the master index and to the
    /// capacity of `out` rather than faulting.
    pub fn dpm_states(&self, start: usize, end: usize, out: &mut [DpmState]) -> usize {
        let master = self.config.channels;
        let start = start.min(master);
        let end = end.min(master);
        if end < start {
            return 0;
        }
        let count = (end - start + 1).min(out.len());
        for (slot, channel) in out.iter_mut().zip(start..start + count) {
            *slot = self.dpm_state(channel);
        }
        count
    }

    /// Clears every strip's meter state.
    pub fn reset_meters(&self) {
        for strip in &self.strips {
            strip.meter().reset();
        }
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(MixerConfig::default())
    }
}
