use crate::error::BridgeError;
use crate::router::{WebhookState, webhook_router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Webhook responder running as a supervised background task.
pub struct WebhookServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<Result<(), BridgeError>>,
}

impl WebhookServer {
    /// Bind `addr` and start serving. Port 0 picks an ephemeral port.
    pub async fn start(addr: SocketAddr, state: WebhookState) -> Result<Self, BridgeError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let app = webhook_router(state);

        let signal = shutdown.clone().cancelled_owned();
        let task = tokio::spawn(async move {
            info!(%local_addr, "webhook server listening");
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(signal)
                .await;
            if let Err(e) = &served {
                error!(error = %e, "webhook server stopped with error");
            } else {
                info!("webhook server stopped");
            }
            served.map_err(BridgeError::from)
        });

        Ok(Self {
            local_addr,
            shutdown,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Signal graceful shutdown and wait for the serve loop to exit.
    pub async fn shutdown(self) -> Result<(), BridgeError> {
        self.shutdown.cancel();
        self.task.await?
    }
}
