//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, TrySendError};
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{write_response, Response};
use crate::store::Store;

use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for one store
pub struct Server {
    config: Config,
    store: Arc<Mutex<Store>>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

/// Cloneable handle that stops a running server
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl Server {
    /// Bind the listener at `config.listen_addr`
    ///
    /// Port 0 picks a free port; read it back with `local_addr`.
    pub fn bind(config: Config, store: Store) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            store: Arc::new(Mutex::new(store)),
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared handle on the store being served
    pub fn store(&self) -> Arc<Mutex<Store>> {
        Arc::clone(&self.store)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Signal the server to shut down gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Serve until `shutdown` is called (blocking)
    ///
    /// Connections still open at shutdown are served until the client
    /// disconnects or the read timeout fires.
    pub fn run(&self) -> Result<()> {
        let (tx, rx) = channel::bounded::<TcpStream>(self.config.max_connections);
        let workers = self.spawn_workers(rx)?;

        tracing::info!(
            addr = %self.local_addr()?,
            workers = self.config.worker_threads,
            "server listening"
        );

        while !self.shutdown.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    tracing::trace!(%peer, "accepted connection");
                    match tx.try_send(stream) {
                        Ok(()) => {}
                        Err(TrySendError::Full(mut stream)) => {
                            tracing::warn!(%peer, "connection limit reached, rejecting");
                            let _ = stream.set_nonblocking(false);
                            let _ = write_response(&mut stream, &Response::error("server busy"));
                        }
                        Err(TrySendError::Disconnected(_)) => break,
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("accept failed: {}", e);
                }
            }
        }

        tracing::info!("server shutting down");
        drop(tx);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("connection worker panicked");
            }
        }

        Ok(())
    }

    fn spawn_workers(&self, rx: Receiver<TcpStream>) -> Result<Vec<JoinHandle<()>>> {
        let workers = (0..self.config.worker_threads)
            .map(|id| {
                let rx = rx.clone();
                let store = Arc::clone(&self.store);
                let (read_ms, write_ms) =
                    (self.config.read_timeout_ms, self.config.write_timeout_ms);

                thread::Builder::new()
                    .name(format!("driftkv-worker-{}", id))
                    .spawn(move || {
                        for stream in rx.iter() {
                            serve(stream, Arc::clone(&store), read_ms, write_ms);
                        }
                    })
            })
            .collect::<std::io::Result<Vec<_>>>()?;

        Ok(workers)
    }
}

/// Run one connection to completion, logging instead of propagating errors
fn serve(stream: TcpStream, store: Arc<Mutex<Store>>, read_ms: u64, write_ms: u64) {
    // Accepted sockets may inherit the listener's non-blocking mode
    if let Err(e) = stream.set_nonblocking(false) {
        tracing::warn!("failed to configure connection: {}", e);
        return;
    }

    let result = Connection::new(stream, store).and_then(|mut conn| {
        conn.set_timeouts(read_ms, write_ms)?;
        conn.handle()
    });

    if let Err(e) = result {
        tracing::warn!("connection ended with error: {}", e);
    }
}
