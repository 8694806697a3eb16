//! Stop signal for a running proxy.
//!
//! `main` owns one [`Shutdown`] and hands a receiver to `HttpServer::run`.
//! Triggering it stops the accept loop; in-flight forwards finish first.

use tokio::sync::broadcast;

/// Owner side of the stop signal.
///
/// Each `HttpServer::run` call holds one receiver. Integration tests start
/// one proxy per `Shutdown`.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to pass to `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every running server to stop.
    ///
    /// Returns false when no server was listening, e.g. because it already
    /// exited on a bind or accept error.
    pub fn trigger(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
