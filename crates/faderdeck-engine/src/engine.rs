//! The audio-period mixing engine.
//!
//! [`MixerRt`] is the object handed to the audio backend. Its period callback
//! is a pure pass over borrowed slices: read each strip's parameters once,
//! transform and sum the channel feeds into the master accumulator, run the
//! master's own chain, and publish peak meters. Nothing here allocates,
//! blocks, or touches a lock; every shared read and write is a relaxed
//! atomic on an independently owned scalar.

use std::sync::Arc;

use faderdeck_dsp::balance_gains;

use crate::backend::{ChannelFeed, MasterOut, PeriodProcessor};
use crate::channel::StripParams;
use crate::mixer::Mixer;

/// Real-time face of a [`Mixer`]: implements the backend's period callback.
pub struct MixerRt {
    mixer: Arc<Mixer>,
}

impl MixerRt {
    pub fn new(mixer: Arc<Mixer>) -> Self {
        Self { mixer }
    }
}

impl PeriodProcessor for MixerRt {
    fn process_period(&mut self, inputs: &[ChannelFeed<'_>], outputs: MasterOut<'_>) {
        let mixer = &self.mixer;
        let MasterOut {
            legs: [out_a, out_b],
        } = outputs;
        let frames = out_a.len().min(out_b.len());
        out_a.fill(0.0);
        out_b.fill(0.0);

        let hold = mixer.config().dpm_hold_periods;
        let decay = mixer.config().dpm_decay;
        let any_solo = mixer.any_solo();

        for channel in 0..mixer.max_channels() {
            let feed = inputs
                .get(channel)
                .copied()
                .unwrap_or_else(ChannelFeed::silent);
            let strip = mixer.channel_strip(channel);
            strip.set_routed(feed.sources > 0);

            let params = strip.params();
            // Solo anywhere gates every non-solo channel out of the bus; the
            // stored mute flag is left untouched.
            let gated = params.mute || (any_solo && !params.solo);

            let [in_a, in_b] = feed.legs;
            let span = frames.min(in_a.len()).min(in_b.len());
            let chain = StripChain::new(&params);

            let mut peak_a = 0.0f32;
            let mut peak_b = 0.0f32;
            for i in 0..span {
                let (a, b) = chain.apply(in_a[i], in_b[i]);
                peak_a = peak_a.max(a.abs());
                peak_b = peak_b.max(b.abs());
                // Metering taps the fader-applied signal before the gate, so
                // a muted channel still shows its incoming level.
                if !gated {
                    out_a[i] += a;
                    out_b[i] += b;
                }
            }

            if strip.dpm_enabled() {
                strip.meter().update([peak_a, peak_b], hold, decay);
            }
        }

        // The master bus runs the same chain as any strip over the summed
        // signal, in place.
        let master = mixer.master_strip();
        let params = master.params();
        let chain = StripChain::new(&params);
        let mut peak_a = 0.0f32;
        let mut peak_b = 0.0f32;
        for i in 0..frames {
            let (a, b) = chain.apply(out_a[i], out_b[i]);
            peak_a = peak_a.max(a.abs());
            peak_b = peak_b.max(b.abs());
            if params.mute {
                out_a[i] = 0.0;
                out_b[i] = 0.0;
            } else {
                out_a[i] = a;
                out_b[i] = b;
            }
        }

        if master.dpm_enabled() {
            master.meter().update([peak_a, peak_b], hold, decay);
        }
    }
}

/// Per-strip sample transform, parameters folded into leg gains up front.
#[derive(Clone, Copy)]
struct StripChain {
    gain_a: f32,
    gain_b: f32,
    mono: bool,
}

impl StripChain {
    #[inline]
    fn new(params: &StripParams) -> Self {
        let (pan_a, pan_b) = balance_gains(params.balance);
        let sign = if params.phase { -1.0 } else { 1.0 };
        Self {
            gain_a: pan_a * params.level * sign,
            gain_b: pan_b * params.level * sign,
            mono: params.mono,
        }
    }

    #[inline(always)]
    fn apply(&self, a: f32, b: f32) -> (f32, f32) {
        let (a, b) = if self.mono {
            let folded = 0.5 * (a + b);
            (folded, folded)
        } else {
            (a, b)
        };
        (a * self.gain_a, b * self.gain_b)
    }
}
