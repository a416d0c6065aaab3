//! Ctrl-C tracking across a whole run.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::traits::EngineError;

/// Remembers a Ctrl-C received at any point of a run.
///
/// [`crate::process::run`] only reacts while a subprocess is alive. This
/// covers the stretches in between (staging, relocation, merging), which
/// check it at their boundaries.
#[derive(Debug)]
pub struct InterruptWatch {
    flag: Arc<AtomicBool>,
    listener: Option<JoinHandle<()>>,
}

impl InterruptWatch {
    /// Start listening for Ctrl-C. Must be called inside a tokio runtime.
    pub fn listen() -> Self {
        let flag = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&flag);
        let listener = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping after the current step");
                seen.store(true, Ordering::SeqCst);
            }
        });

        Self {
            flag,
            listener: Some(listener),
        }
    }

    /// A watch with no signal listener, tripped only through [`InterruptWatch::trip`].
    pub fn detached() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            listener: None,
        }
    }

    /// Mark the run as interrupted.
    pub fn trip(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fail with [`EngineError::Interrupted`] if an interrupt arrived.
    pub fn check(&self, during: impl fmt::Display) -> Result<(), EngineError> {
        if self.is_interrupted() {
            return Err(EngineError::Interrupted(during.to_string()));
        }
        Ok(())
    }
}

impl Drop for InterruptWatch {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}
