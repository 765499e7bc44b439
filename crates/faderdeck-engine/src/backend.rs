//! The narrow seam between the mixer core and the external audio host.
//!
//! The host owns port registration, buffer allocation, and callback
//! scheduling. It hands the engine borrowed sample slices once per period;
//! the engine never learns anything else about the backend.

use anyhow::Result;

/// Borrowed input view for one channel over one period.
///
/// `legs` are the A/B sample slices for the period. A mono source is wired by
/// passing the same slice for both legs; an unrouted channel passes empty
/// slices. `sources` is the upstream connection count the backend currently
/// sees for this channel, from which the engine derives the `routed` flag.
#[derive(Clone, Copy)]
pub struct ChannelFeed<'a> {
    pub legs: [&'a [f32]; 2],
    pub sources: u32,
}

impl<'a> ChannelFeed<'a> {
    pub fn stereo(a: &'a [f32], b: &'a [f32]) -> Self {
        Self {
            legs: [a, b],
            sources: 2,
        }
    }

    pub fn mono(samples: &'a [f32]) -> Self {
        Self {
            legs: [samples, samples],
            sources: 1,
        }
    }

    pub fn silent() -> Self {
        Self {
            legs: [&[], &[]],
            sources: 0,
        }
    }
}

/// Borrowed output legs for the master bus over one period.
pub struct MasterOut<'a> {
    pub legs: [&'a mut [f32]; 2],
}

/// The per-period entry point the backend invokes under its real-time
/// deadline. Implementations must not allocate, block, or perform I/O.
pub trait PeriodProcessor: Send {
    fn process_period(&mut self, inputs: &[ChannelFeed<'_>], outputs: MasterOut<'_>);
}

/// Lifecycle contract of the external audio host.
pub trait AudioBackend {
    /// Registers the processor and starts periodic invocation. An error here
    /// is fatal to the session being built.
    fn start(&mut self, processor: Box<dyn PeriodProcessor>) -> Result<()>;

    /// Stops periodic invocation and releases the host connection.
    fn stop(&mut self);
}
