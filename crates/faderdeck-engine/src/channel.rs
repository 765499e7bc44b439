//! Per-channel parameter store.
//!
//! Every field is an independently observable atomic scalar. The control
//! plane is the only writer of the fader parameters and the audio period is
//! the only writer of `routed` and the meters, so no field ever needs a lock
//! and the audio context is never exposed to priority inversion.

use std::sync::atomic::{AtomicBool, Ordering};

use atomic_float::AtomicF32;

use crate::meter::DpmPair;

pub const DEFAULT_LEVEL: f32 = 0.8;
pub const DEFAULT_BALANCE: f32 = 0.0;

/// One-shot read of the fader parameters, taken by the engine at the top of
/// each period so a strip is processed with a consistent view.
#[derive(Debug, Clone, Copy)]
pub struct StripParams {
    pub level: f32,
    pub balance: f32,
    pub mute: bool,
    pub solo: bool,
    pub mono: bool,
    pub phase: bool,
}

#[derive(Debug)]
pub struct ChannelStrip {
    level: AtomicF32,
    balance: AtomicF32,
    mute: AtomicBool,
    solo: AtomicBool,
    mono: AtomicBool,
    phase: AtomicBool,
    routed: AtomicBool,
    dpm_enabled: AtomicBool,
    meter: DpmPair,
}

impl ChannelStrip {
    pub(crate) fn new() -> Self {
        Self {
            level: AtomicF32::new(DEFAULT_LEVEL),
            balance: AtomicF32::new(DEFAULT_BALANCE),
            mute: AtomicBool::new(false),
            solo: AtomicBool::new(false),
            mono: AtomicBool::new(false),
            phase: AtomicBool::new(false),
            routed: AtomicBool::new(false),
            dpm_enabled: AtomicBool::new(true),
            meter: DpmPair::new(),
        }
    }

    pub fn set_level(&self, level: f32) {
        self.level.store(level.clamp(0.0, 1.0), Ordering::Relaxed);
    }

    pub fn level(&self) -> f32 {
        self.level.load(Ordering::Relaxed)
    }

    pub fn set_balance(&self, balance: f32) {
        self.balance
            .store(balance.clamp(-1.0, 1.0), Ordering::Relaxed);
    }

    pub fn balance(&self) -> f32 {
        self.balance.load(Ordering::Relaxed)
    }

    pub fn set_mute(&self, mute: bool) {
        self.mute.store(mute, Ordering::Relaxed);
    }

    pub fn mute(&self) -> bool {
        self.mute.load(Ordering::Relaxed)
    }

    /// Flips the stored mute flag and returns the new state.
    pub fn toggle_mute(&self) -> bool {
        !self.mute.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn set_solo(&self, solo: bool) {
        self.solo.store(solo, Ordering::Relaxed);
    }

    pub fn solo(&self) -> bool {
        self.solo.load(Ordering::Relaxed)
    }

    pub fn set_mono(&self, mono: bool) {
        self.mono.store(mono, Ordering::Relaxed);
    }

    pub fn mono(&self) -> bool {
        self.mono.load(Ordering::Relaxed)
    }

    pub fn set_phase(&self, phase: bool) {
        self.phase.store(phase, Ordering::Relaxed);
    }

    pub fn phase(&self) -> bool {
        self.phase.load(Ordering::Relaxed)
    }

    pub fn routed(&self) -> bool {
        self.routed.load(Ordering::Relaxed)
    }

    /// Audio-side only: recomputed each period from the backend's upstream
    /// connection count.
    pub(crate) fn set_routed(&self, routed: bool) {
        self.routed.store(routed, Ordering::Relaxed);
    }

    pub fn set_dpm_enabled(&self, enabled: bool) {
        self.dpm_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn dpm_enabled(&self) -> bool {
        self.dpm_enabled.load(Ordering::Relaxed)
    }

    pub fn meter(&self) -> &DpmPair {
        &self.meter
    }

    /// Restores the fader parameters to their defaults. Metering state and
    /// the DPM enable flag are left alone.
    pub fn reset(&self) {
        self.set_level(DEFAULT_LEVEL);
        self.set_balance(DEFAULT_BALANCE);
        self.set_mute(false);
        self.set_solo(false);
        self.set_mono(false);
        self.set_phase(false);
    }

    pub(crate) fn params(&self) -> StripParams {
        StripParams {
            level: self.level(),
            balance: self.balance(),
            mute: self.mute(),
            solo: self.solo(),
            mono: self.mono(),
            phase: self.phase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_clamp_instead_of_failing() {
        let strip = ChannelStrip::new();
        strip.set_level(3.5);
        assert_eq!(strip.level(), 1.0);
        strip.set_level(-0.2);
        assert_eq!(strip.level(), 0.0);
        strip.set_balance(-7.0);
        assert_eq!(strip.balance(), -1.0);
    }

    #[test]
    fn toggle_mute_flips_and_reports() {
        let strip = ChannelStrip::new();
        assert!(strip.toggle_mute());
        assert!(strip.mute());
        assert!(!strip.toggle_mute());
        assert!(!strip.mute());
    }

    #[test]
    fn reset_restores_defaults_but_keeps_dpm_gate() {
        let strip = ChannelStrip::new();
        strip.set_level(0.1);
        strip.set_balance(0.9);
        strip.set_mute(true);
        strip.set_solo(true);
        strip.set_mono(true);
        strip.set_phase(true);
        strip.set_dpm_enabled(false);

        strip.reset();

        assert_eq!(strip.level(), DEFAULT_LEVEL);
        assert_eq!(strip.balance(), DEFAULT_BALANCE);
        assert!(!strip.mute());
        assert!(!strip.solo());
        assert!(!strip.mono());
        assert!(!strip.phase());
        assert!(!strip.dpm_enabled());
    }
}
