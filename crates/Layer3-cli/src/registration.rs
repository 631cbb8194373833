//! Worker registration listener
//!
//! The worker inside the test container registers by opening a TCP
//! connection to the probe. The first accepted connection flips the flag.
//!
//! Connections are not authenticated: any peer that can reach the listen
//! address counts as the worker. The default `0.0.0.0` bind is reachable
//! from the test container's network; narrow it with `--listen` when other
//! hosts share that network.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub struct RegistrationListener {
    registered: Arc<AtomicBool>,
    local_addr: SocketAddr,
    accept_task: JoinHandle<()>,
}

impl RegistrationListener {
    pub async fn bind(addr: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Waiting for worker registration on {}", local_addr);

        let registered = Arc::new(AtomicBool::new(false));
        let flag = registered.clone();
        let accept_task = tokio::spawn(async move {
            match listener.accept().await {
                Ok((_stream, peer)) => {
                    info!("Worker registered from {}", peer);
                    flag.store(true, Ordering::SeqCst);
                }
                Err(e) => warn!("Registration listener failed: {}", e),
            }
        });

        Ok(Self {
            registered,
            local_addr,
            accept_task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Shared flag, set once a worker has connected
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.registered.clone()
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }
}

impl Drop for RegistrationListener {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}
