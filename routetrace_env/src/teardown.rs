//! Teardown signalling between a view and its running animation.
//!
//! Tearing down the animating view must stop every scheduled tick or frame
//! callback so that no state is mutated after disposal. The view keeps a
//! [`Teardown`] handle; the driver owns a [`TeardownListener`] and checks it
//! before every step.

use crate::error::EnvError;
use std::sync::Arc;
use tokio::sync::watch;

/// Handle held by the owner of a running animation.
#[derive(Debug, Clone)]
pub struct Teardown {
    tx: Arc<watch::Sender<bool>>,
}

/// Receiving side of a [`Teardown`] handle, owned by the driver.
#[derive(Debug, Clone)]
pub struct TeardownListener {
    rx: watch::Receiver<bool>,
}

impl Teardown {
    /// Creates a new handle together with its first listener.
    pub fn new() -> (Self, TeardownListener) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, TeardownListener { rx })
    }

    /// Returns another listener bound to this handle.
    pub fn listener(&self) -> TeardownListener {
        TeardownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Signals teardown. Idempotent.
    ///
    /// The flag is latched even when no listener is alive; the error only
    /// reports that nothing was running to observe it.
    pub fn signal(&self) -> Result<(), EnvError> {
        self.tx.send_replace(true);
        if self.tx.receiver_count() == 0 {
            return Err(EnvError::TeardownClosed(
                "no running animation is listening".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns true once `signal()` has been called.
    pub fn is_signalled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl TeardownListener {
    /// Completes once teardown has been signalled.
    ///
    /// If the handle is dropped without signalling, this never completes.
    pub async fn wait(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Non-blocking check of the teardown flag.
    pub fn is_signalled(&self) -> bool {
        *self.rx.borrow()
    }
}
