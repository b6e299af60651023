use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use pkgpaths::IndexStore;

pub mod error;
mod paths;

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    serve_task: Option<JoinHandle<()>>,
}

impl Server {
    /// Binds `addr` and starts serving queries against `store`.
    pub async fn bind(addr: impl ToSocketAddrs, store: Arc<IndexStore>) -> io::Result<Self> {
        let state = Arc::new(ServerState { store });
        let app = router(state);
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let serve_task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(error) = result {
                log::error!("http server stopped: {error}");
            }
        });

        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
            serve_task: Some(serve_task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&mut self) -> Result<(), String> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| "failed to send server shutdown signal".to_string())
        } else {
            Ok(())
        }
    }

    /// Waits for the serve loop to finish after [`shutdown`](Self::shutdown).
    pub async fn stopped(mut self) {
        if let Some(task) = self.serve_task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/imports/*path", get(paths::imports))
        .route("/dirs/*path", get(paths::dirs))
        .route("/update", get(paths::update))
        .route("/status", get(paths::status))
        .fallback(paths::fallback)
        .with_state(state)
}

pub(crate) struct ServerState {
    pub(crate) store: Arc<IndexStore>,
}
