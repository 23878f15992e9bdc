//! Resource gate — blocks screen mounting until display resources settle.
//!
//! The gate attempts every registered loader, logs failures, and always
//! resolves `Ready`; a missing font must never strand the user on the
//! splash. The splash dismissal fires exactly once per process lifetime,
//! after the load attempt settles, success or failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GateError;

/// Gate status. `Ready` is reached exactly once and never reverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Pending,
    Ready,
}

/// A display resource the gate loads before any screen renders.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    /// Name used in log lines when the load fails.
    fn name(&self) -> &str;

    async fn load(&self) -> Result<(), GateError>;
}

/// Handle to the startup splash indicator.
pub trait SplashHandle: Send + Sync {
    fn dismiss(&self);
}

/// Splash handle for hosts without a real splash surface.
pub struct NoSplash;

impl SplashHandle for NoSplash {
    fn dismiss(&self) {}
}

/// The startup resource gate.
pub struct ResourceGate {
    loaders: Vec<Arc<dyn ResourceLoader>>,
    splash: Arc<dyn SplashHandle>,
    load_timeout: Option<Duration>,
    ready: AtomicBool,
    dismissed: AtomicBool,
}

impl ResourceGate {
    pub fn new(splash: Arc<dyn SplashHandle>) -> Self {
        Self {
            loaders: Vec::new(),
            splash,
            load_timeout: None,
            ready: AtomicBool::new(false),
            dismissed: AtomicBool::new(false),
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.loaders.push(loader);
        self
    }

    /// Bound each loader's run time. A loader that exceeds the timeout is
    /// treated exactly like a failed loader: logged, flow continues.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = Some(timeout);
        self
    }

    pub fn status(&self) -> GateStatus {
        if self.ready.load(Ordering::Acquire) {
            GateStatus::Ready
        } else {
            GateStatus::Pending
        }
    }

    /// Attempt every loader, then release the splash. Always resolves
    /// `Ready`. Calling again after the gate has settled is a no-op; the
    /// splash is not dismissed a second time.
    pub async fn load(&self) -> GateStatus {
        if self.ready.load(Ordering::Acquire) {
            return GateStatus::Ready;
        }

        for loader in &self.loaders {
            let result = match self.load_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, loader.load()).await {
                    Ok(result) => result,
                    Err(_) => Err(GateError::TimedOut {
                        name: loader.name().to_string(),
                        timeout,
                    }),
                },
                None => loader.load().await,
            };
            if let Err(e) = result {
                tracing::warn!(resource = loader.name(), "Resource load failed: {e}");
            }
        }

        self.ready.store(true, Ordering::Release);
        if !self.dismissed.swap(true, Ordering::AcqRel) {
            self.splash.dismiss();
            tracing::debug!("Splash dismissed");
        }
        GateStatus::Ready
    }
}
