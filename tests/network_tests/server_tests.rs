//! Tests for the TCP server and client
//!
//! These tests verify:
//! - GET/PUT/PING over a real socket
//! - NotFound travels as its own status
//! - Connection limit rejection
//! - Graceful shutdown leaves the store usable

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use driftkv::config::Config;
use driftkv::network::{Client, Connection, Server};
use driftkv::protocol::{read_response, Status};
use driftkv::{DriftError, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

type RunningServer = (TempDir, Arc<Server>, SocketAddr, JoinHandle<()>);

fn start_server(max_connections: usize, workers: usize) -> RunningServer {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_path(temp_dir.path().join("server.log"))
        .listen_addr("127.0.0.1:0")
        .max_connections(max_connections)
        .worker_threads(workers)
        .build();

    let store = Store::open(config.clone()).unwrap();
    let server = Arc::new(Server::bind(config, store).unwrap());
    let addr = server.local_addr().unwrap();

    let runner = Arc::clone(&server);
    let handle = thread::spawn(move || runner.run().unwrap());

    (temp_dir, server, addr, handle)
}

// =============================================================================
// Request Tests
// =============================================================================

#[test]
fn test_put_get_ping() {
    let (_temp, server, addr, handle) = start_server(16, 2);

    let mut client = Client::connect(addr).unwrap();
    client.ping().unwrap();
    client.put(b"hello", b"world").unwrap();
    assert_eq!(client.get(b"hello").unwrap(), b"world");

    client.put(b"hello", b"there").unwrap();
    assert_eq!(client.get(b"hello").unwrap(), b"there");

    drop(client);
    server.shutdown();
    handle.join().unwrap();
}

#[test]
fn test_missing_key_is_not_found() {
    let (_temp, server, addr, handle) = start_server(16, 2);

    let mut client = Client::connect(addr).unwrap();
    assert!(matches!(client.get(b"nope"), Err(DriftError::KeyNotFound)));
    // The connection survives a NotFound
    client.ping().unwrap();

    drop(client);
    server.shutdown();
    handle.join().unwrap();
}

#[test]
fn test_empty_value_round_trip() {
    let (_temp, server, addr, handle) = start_server(16, 1);

    let mut client = Client::connect(addr).unwrap();
    client.put(b"empty", b"").unwrap();
    assert_eq!(client.get(b"empty").unwrap(), b"");

    drop(client);
    server.shutdown();
    handle.join().unwrap();
}

#[test]
fn test_clients_share_one_store() {
    let (_temp, server, addr, handle) = start_server(16, 4);

    let writers: Vec<_> = (0..4)
        .map(|t| {
            thread::spawn(move || {
                let mut client = Client::connect(addr).unwrap();
                for i in 0..25 {
                    let key = format!("t{}-k{}", t, i);
                    client.put(key.as_bytes(), key.as_bytes()).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let mut client = Client::connect(addr).unwrap();
    for t in 0..4 {
        for i in 0..25 {
            let key = format!("t{}-k{}", t, i);
            assert_eq!(client.get(key.as_bytes()).unwrap(), key.as_bytes());
        }
    }

    drop(client);
    server.shutdown();
    handle.join().unwrap();
}

#[test]
fn test_connection_limit_rejects_with_busy() {
    let (_temp, server, addr, handle) = start_server(1, 1);

    // Occupies the only worker
    let mut first = Client::connect(addr).unwrap();
    first.ping().unwrap();
    // Fills the only queue slot
    let second = TcpStream::connect(addr).unwrap();
    // Nowhere to go
    let mut third = TcpStream::connect(addr).unwrap();

    let response = read_response(&mut third).unwrap();
    assert_eq!(response.status, Status::Error);
    assert_eq!(response.payload.as_deref(), Some(&b"server busy"[..]));

    drop(third);
    drop(second);
    drop(first);
    server.shutdown();
    handle.join().unwrap();
}

#[test]
fn test_store_readable_after_shutdown() {
    let (_temp, server, addr, handle) = start_server(16, 2);

    let mut client = Client::connect(addr).unwrap();
    client.put(b"kept", b"value").unwrap();
    drop(client);

    // Stop through a cloned handle, as an embedding application would
    let stopper = server.shutdown_handle();
    thread::spawn(move || stopper.shutdown()).join().unwrap();
    handle.join().unwrap();

    let store = server.store();
    let mut store = store.lock();
    assert_eq!(store.get(b"kept").unwrap(), b"value");
}

// =============================================================================
// Connection Tests
// =============================================================================

#[test]
fn test_connection_records_peer_addr() {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open_path(temp_dir.path().join("conn.log")).unwrap();
    let store = Arc::new(parking_lot::Mutex::new(store));

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
    let (accepted, _) = listener.accept().unwrap();

    let connection = Connection::new(accepted, store).unwrap();
    assert_eq!(connection.peer_addr(), client.local_addr().unwrap().to_string());
}
