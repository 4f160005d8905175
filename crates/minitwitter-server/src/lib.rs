//! MiniTwitter server.
//!
//! Accepts TCP connections and serves `SendMessage` / `GetMessages` requests
//! against one shared message log.
//!
//! ## Architecture
//!
//! ```text
//! minitwitter-server
//!   ├─ Server              (bind, accept loop, shutdown)
//!   ├─ worker permits      (at most `max_workers` requests handled at once)
//!   ├─ handle_connection   (frame in -> service -> frame out)
//!   └─ MiniTwitterService  (shared MessageLog)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod error;
mod logging;

use std::{net::SocketAddr, sync::Arc};

pub use error::ServerError;
pub use logging::{init_tracing, open_log_file};
use minitwitter_core::MiniTwitterService;
use minitwitter_proto::{DEFAULT_MAX_PAYLOAD_SIZE, FrameCodec};
use tokio::{net::TcpListener, sync::Semaphore, task::JoinSet};

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ServerRuntimeConfig {
    /// Address to bind to (e.g., "[::]:50051")
    pub bind_address: String,
    /// Maximum requests handled concurrently
    pub max_workers: usize,
    /// Maximum frame payload size in bytes
    pub max_frame_size: u32,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self {
            bind_address: "[::]:50051".to_string(),
            max_workers: 10,
            max_frame_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}

/// Production MiniTwitter server.
pub struct Server {
    listener: TcpListener,
    service: MiniTwitterService,
    codec: FrameCodec,
    workers: Arc<Semaphore>,
}

impl Server {
    /// Create and bind a new server over a fresh log.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `max_workers` is zero
    /// - Binding to the address fails
    pub async fn bind(config: ServerRuntimeConfig) -> Result<Self, ServerError> {
        Self::bind_with_service(config, MiniTwitterService::new()).await
    }

    /// Create and bind a new server over an existing service.
    pub async fn bind_with_service(
        config: ServerRuntimeConfig,
        service: MiniTwitterService,
    ) -> Result<Self, ServerError> {
        if config.max_workers == 0 {
            return Err(ServerError::Config("max_workers must be at least 1".to_string()));
        }
        if config.max_workers > Semaphore::MAX_PERMITS {
            return Err(ServerError::Config(format!(
                "max_workers must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }

        let listener = TcpListener::bind(&config.bind_address).await?;

        Ok(Self {
            listener,
            service,
            codec: FrameCodec::new(config.max_frame_size),
            workers: Arc::new(Semaphore::new(config.max_workers)),
        })
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// The service every connection shares.
    pub fn service(&self) -> &MiniTwitterService {
        &self.service
    }

    /// Run the server until the process exits.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server until `shutdown` resolves.
    ///
    /// On shutdown the listener stops accepting and open connections are
    /// cancelled at their next I/O wait. A request already handed to the
    /// service completes, since service calls never await.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut connections = JoinSet::new();

        tracing::info!("MiniTwitter server started on {}", self.local_addr()?);

        loop {
            let (stream, peer) = tokio::select! {
                () = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::error!("Accept error: {}", e);
                        continue;
                    },
                },
            };

            tracing::debug!("New connection: {}", peer);

            let service = self.service.clone();
            let codec = self.codec;
            let workers = Arc::clone(&self.workers);
            connections.spawn(async move {
                match connection::handle_connection(stream, service, codec, workers).await {
                    Ok(()) => tracing::debug!("Connection closed: {}", peer),
                    Err(e) => tracing::warn!("Connection error from {}: {}", peer, e),
                }
            });

            while connections.try_join_next().is_some() {}
        }

        tracing::info!("Shutting down, closing {} connections", connections.len());
        connections.shutdown().await;

        Ok(())
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("local_addr", &self.listener.local_addr().ok())
            .field("codec", &self.codec)
            .field("available_workers", &self.workers.available_permits())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback() -> ServerRuntimeConfig {
        ServerRuntimeConfig { bind_address: "127.0.0.1:0".to_string(), ..Default::default() }
    }

    #[test]
    fn default_config_matches_service_defaults() {
        let config = ServerRuntimeConfig::default();
        assert_eq!(config.bind_address, "[::]:50051");
        assert_eq!(config.max_workers, 10);
        assert_eq!(config.max_frame_size, DEFAULT_MAX_PAYLOAD_SIZE);
    }

    #[tokio::test]
    async fn rejects_zero_workers() {
        let config = ServerRuntimeConfig { max_workers: 0, ..loopback() };
        let result = Server::bind(config).await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[tokio::test]
    async fn binds_ephemeral_port() {
        let server = Server::bind(loopback()).await.unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn run_until_returns_on_shutdown() {
        let server = Server::bind(loopback()).await.unwrap();
        server.run_until(async {}).await.unwrap();
    }
}
