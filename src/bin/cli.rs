//! DriftKV CLI Client
//!
//! Command-line interface for talking to a running `driftkv-server`.

use clap::{Parser, Subcommand};
use driftkv::network::Client;
use driftkv::DriftError;

/// DriftKV CLI
#[derive(Parser, Debug)]
#[command(name = "driftkv-cli")]
#[command(about = "CLI for the DriftKV key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Ping the server
    Ping,
}

fn run(args: Args) -> driftkv::Result<()> {
    let mut client = Client::connect(&args.server)?;

    match args.command {
        Commands::Get { key } => {
            let value = client.get(key.as_bytes())?;
            println!("{}", String::from_utf8_lossy(&value));
        }
        Commands::Set { key, value } => {
            client.put(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(()) => {}
        Err(DriftError::KeyNotFound) => {
            eprintln!("(not found)");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}
