//! DriftKV Server Binary
//!
//! Opens a log file and serves it over TCP.

use clap::{Parser, ValueEnum};
use driftkv::network::Server;
use driftkv::{Config, Store, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SyncMode {
    /// fsync after every put
    EveryWrite,
    /// fsync after every N puts (see --sync-every)
    EveryN,
    /// never fsync; durability is left to the OS
    Manual,
}

/// DriftKV Server
#[derive(Parser, Debug)]
#[command(name = "driftkv-server")]
#[command(about = "Append-only log key-value store server")]
#[command(version)]
struct Args {
    /// Log file path
    #[arg(short, long, default_value = "./driftkv.log")]
    data_path: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    listen: String,

    /// Maximum queued connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Connection worker threads
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// When to fsync the log
    #[arg(long, value_enum, default_value = "every-n")]
    sync: SyncMode,

    /// Puts between fsyncs with --sync every-n
    #[arg(long, default_value = "100")]
    sync_every: usize,

    /// Connection read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Connection write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,driftkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("DriftKV Server v{}", driftkv::VERSION);
    tracing::info!("Log file: {}", args.data_path);
    tracing::info!("Listen address: {}", args.listen);

    let sync_strategy = match args.sync {
        SyncMode::EveryWrite => SyncStrategy::EveryWrite,
        SyncMode::EveryN => SyncStrategy::EveryNWrites {
            count: args.sync_every,
        },
        SyncMode::Manual => SyncStrategy::Manual,
    };

    let config = Config::builder()
        .data_path(&args.data_path)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .worker_threads(args.workers)
        .sync_strategy(sync_strategy)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let store = match Store::open(config.clone()) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, store) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
