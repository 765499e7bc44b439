//! Session lifecycle: connecting the mixer core to an audio backend and
//! tearing the connection down again.

use std::sync::Arc;

use thiserror::Error;

use crate::backend::AudioBackend;
use crate::engine::MixerRt;
use crate::mixer::Mixer;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend could not be started. Fatal: the caller must not use the
    /// mixer API through a session that failed to connect.
    #[error("audio backend unavailable: {0}")]
    Backend(anyhow::Error),
}

/// A running mixer: the backend is invoking [`MixerRt`] once per period
/// until the session is closed or dropped.
pub struct MixerSession {
    mixer: Arc<Mixer>,
    backend: Box<dyn AudioBackend>,
    running: bool,
}

impl MixerSession {
    /// Starts the backend with the mixer's real-time processor. On failure
    /// the backend's error is returned and no session exists.
    pub fn connect(
        mixer: Arc<Mixer>,
        mut backend: Box<dyn AudioBackend>,
    ) -> Result<Self, SessionError> {
        backend
            .start(Box::new(MixerRt::new(Arc::clone(&mixer))))
            .map_err(SessionError::Backend)?;
        tracing::info!(channels = mixer.max_channels(), "mixer session connected");
        Ok(Self {
            mixer,
            backend,
            running: true,
        })
    }

    pub fn mixer(&self) -> &Arc<Mixer> {
        &self.mixer
    }

    /// Stops the backend and consumes the session.
    pub fn close(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.running {
            self.backend.stop();
            self.running = false;
            tracing::info!("mixer session closed");
        }
    }
}

impl Drop for MixerSession {
    fn drop(&mut self) {
        self.stop();
    }
}
