//! Cancellation signal for in-flight pipeline runs

use std::sync::Arc;

use tokio::sync::watch;

/// Fires the cancellation signal for the tokens it issued
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel every linked token; idempotent
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Issue another token linked to this handle
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
            _keepalive: None,
        }
    }
}

/// Observer side of the cancellation signal
///
/// Cancellation is level-triggered: once fired it stays fired. A token
/// whose handle was dropped without firing never cancels.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
    /// Keeps the channel of a `never` token open so it stays pending
    _keepalive: Option<Arc<watch::Sender<bool>>>,
}

impl CancelToken {
    /// A linked handle/token pair
    pub fn new() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (
            CancelHandle { tx },
            CancelToken {
                rx,
                _keepalive: None,
            },
        )
    }

    /// A token that never fires
    pub fn never() -> CancelToken {
        let (tx, rx) = watch::channel(false);
        CancelToken {
            rx,
            _keepalive: Some(Arc::new(tx)),
        }
    }

    /// Whether the signal has fired
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when the signal fires; pending forever if it never does
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                // Sender gone without firing: this token can never cancel
                std::future::pending::<()>().await;
            }
        }
    }
}
