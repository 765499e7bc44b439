//! Digital peak programme metering (DPM).
//!
//! Every strip carries one meter per stereo leg. The audio side writes one
//! instantaneous peak per period; a held peak jumps up with the signal, sits
//! for a configurable number of periods, then releases exponentially. The
//! control side reads both values over plain atomics, so metering never
//! crosses a lock.

use std::sync::atomic::{AtomicU32, Ordering};

use atomic_float::AtomicF32;
use serde::{Deserialize, Serialize};

/// Held peaks below this are snapped to silence once decay has done its work.
const HELD_FLOOR: f32 = 1e-4;

/// One leg of a stereo pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Leg {
    /// Left.
    A,
    /// Right.
    B,
}

/// Fixed-width bulk-query record for one channel.
///
/// Field layout is a serialization contract relied on by positional readers:
/// `peak` and `held` are ordered leg A then leg B, followed by the channel's
/// mono flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DpmState {
    pub peak: [f32; 2],
    pub held: [f32; 2],
    pub mono: bool,
}

#[derive(Debug)]
struct DpmLeg {
    peak: AtomicF32,
    held: AtomicF32,
    hold: AtomicU32,
}

impl DpmLeg {
    fn new() -> Self {
        Self {
            peak: AtomicF32::new(0.0),
            held: AtomicF32::new(0.0),
            hold: AtomicU32::new(0),
        }
    }

    /// Audio-side update with the period's peak. The instantaneous value is
    /// replaced outright; the held value jumps up immediately, waits out the
    /// hold countdown, then releases by `decay` per period until it lands
    /// back on the live peak.
    fn update(&self, period_peak: f32, hold_periods: u32, decay: f32) {
        self.peak.store(period_peak, Ordering::Relaxed);

        let held = self.held.load(Ordering::Relaxed);
        if period_peak > held {
            self.held.store(period_peak, Ordering::Relaxed);
            self.hold.store(hold_periods, Ordering::Relaxed);
            return;
        }

        let remaining = self.hold.load(Ordering::Relaxed);
        if remaining > 0 {
            self.hold.store(remaining - 1, Ordering::Relaxed);
            return;
        }

        let mut released = (held * decay).max(period_peak);
        if released < HELD_FLOOR {
            released = 0.0;
        }
        self.held.store(released, Ordering::Relaxed);
    }

    fn reset(&self) {
        self.peak.store(0.0, Ordering::Relaxed);
        self.held.store(0.0, Ordering::Relaxed);
        self.hold.store(0, Ordering::Relaxed);
    }
}

/// Peak meter pair for one strip, legs A and B.
#[derive(Debug)]
pub struct DpmPair {
    legs: [DpmLeg; 2],
}

impl DpmPair {
    pub(crate) fn new() -> Self {
        Self {
            legs: [DpmLeg::new(), DpmLeg::new()],
        }
    }

    pub(crate) fn update(&self, peaks: [f32; 2], hold_periods: u32, decay: f32) {
        self.legs[0].update(peaks[0], hold_periods, decay);
        self.legs[1].update(peaks[1], hold_periods, decay);
    }

    pub(crate) fn reset(&self) {
        self.legs[0].reset();
        self.legs[1].reset();
    }

    pub fn peak(&self, leg: Leg) -> f32 {
        self.legs[leg as usize].peak.load(Ordering::Relaxed)
    }

    pub fn held(&self, leg: Leg) -> f32 {
        self.legs[leg as usize].held.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: u32 = 4;
    const DECAY: f32 = 0.5;

    #[test]
    fn peak_is_replaced_every_period() {
        let pair = DpmPair::new();
        pair.update([0.8, 0.8], HOLD, DECAY);
        assert_eq!(pair.peak(Leg::A), 0.8);
        pair.update([0.0, 0.0], HOLD, DECAY);
        assert_eq!(pair.peak(Leg::A), 0.0);
    }

    #[test]
    fn held_waits_out_hold_then_releases() {
        let pair = DpmPair::new();
        pair.update([1.0, 1.0], HOLD, DECAY);
        assert_eq!(pair.held(Leg::A), 1.0);

        for _ in 0..HOLD {
            pair.update([0.0, 0.0], HOLD, DECAY);
            assert_eq!(pair.held(Leg::A), 1.0);
        }

        let mut previous = pair.held(Leg::A);
        for _ in 0..16 {
            pair.update([0.0, 0.0], HOLD, DECAY);
            let held = pair.held(Leg::A);
            assert!(held <= previous);
            previous = held;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn higher_peak_restarts_the_hold() {
        let pair = DpmPair::new();
        pair.update([0.5, 0.5], HOLD, DECAY);
        pair.update([0.0, 0.0], HOLD, DECAY);
        pair.update([0.9, 0.9], HOLD, DECAY);
        assert_eq!(pair.held(Leg::B), 0.9);
        pair.update([0.0, 0.0], HOLD, DECAY);
        assert_eq!(pair.held(Leg::B), 0.9, "hold countdown should restart");
    }

    #[test]
    fn release_never_undershoots_the_live_peak() {
        let pair = DpmPair::new();
        pair.update([1.0, 1.0], 0, DECAY);
        for _ in 0..32 {
            pair.update([0.4, 0.4], 0, DECAY);
        }
        assert_eq!(pair.held(Leg::A), 0.4);
    }
}
