use std::future::Future;
use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::files::resolver::DocumentRoot;
use crate::http::connection::Connection;
use crate::logging::AccessLog;

/// Accepts connections and runs each one on its own task.
pub struct Server {
    listener: TcpListener,
    root: DocumentRoot,
    log: AccessLog,
}

impl Server {
    pub async fn bind(addr: &str, root: DocumentRoot, log: AccessLog) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Could not listen on {addr}"))?;

        Ok(Self {
            listener,
            root,
            log,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop forever. A failed accept is logged and skipped.
    pub async fn run(self) {
        if let Ok(addr) = self.local_addr() {
            info!("Listening on {}", addr);
        }

        loop {
            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::error!(error = %e, "Accept failed");
                    self.log.error(&format!("Accept error: {e}"));
                    continue;
                }
            };
            tracing::debug!("Accepted connection from {}", peer);

            let mut conn = Connection::new(
                socket,
                peer.to_string(),
                self.root.clone(),
                self.log.clone(),
            );
            tokio::spawn(async move {
                conn.run().await;
            });
        }
    }

    /// Serves until `shutdown` resolves with `Ok`.
    ///
    /// If waiting for the signal itself fails, the error is traced and the
    /// server keeps running rather than shutting down.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = std::io::Result<()>>,
    {
        let serving = self.run();
        tokio::pin!(serving);

        tokio::select! {
            _ = &mut serving => {}

            res = shutdown => match res {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => {
                    tracing::error!(error = %e, "Could not listen for shutdown signal");
                    serving.await;
                }
            }
        }
    }
}
