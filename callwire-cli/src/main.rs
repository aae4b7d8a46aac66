mod peer;

use anyhow::Result;
use callwire_client::{ChannelConfig, ConnectionRole, TransportConfig};
use callwire_relay::RelayConfig;
use clap::{Parser, Subcommand};
use colored::*;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "callwire")]
#[command(about = "One-to-one video call signalling over a WebSocket relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the rendezvous relay.
    Relay {
        #[arg(long, env = "CALLWIRE_BIND", default_value = "0.0.0.0:8080")]
        bind: SocketAddr,

        #[arg(long, env = "CALLWIRE_PATH", default_value = "/connect")]
        path: String,
    },
    /// Join the relay and place the call.
    Call(PeerArgs),
    /// Join the relay and wait for an offer.
    Answer(PeerArgs),
}

#[derive(clap::Args)]
struct PeerArgs {
    #[arg(long, env = "CALLWIRE_HOST", default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, env = "CALLWIRE_PORT", default_value_t = 8080)]
    port: u16,

    #[arg(long, env = "CALLWIRE_PATH", default_value = "/connect")]
    path: String,

    /// STUN/TURN URL, repeatable. Defaults to Google's public STUN server.
    #[arg(long = "ice-server")]
    ice_servers: Vec<String>,
}

impl PeerArgs {
    fn into_configs(self) -> (ChannelConfig, TransportConfig) {
        let channel = ChannelConfig {
            host: self.host,
            port: self.port,
            path: self.path,
        };
        let transport = if self.ice_servers.is_empty() {
            TransportConfig::default()
        } else {
            TransportConfig {
                ice_servers: self.ice_servers,
            }
        };
        (channel, transport)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Relay { bind, path } => {
            println!("{} ws://{}{}", "📡 Relay on".green().bold(), bind, path);
            callwire_relay::serve(RelayConfig { bind, path }).await?;
        }
        Commands::Call(args) => {
            let (channel, transport) = args.into_configs();
            peer::run(ConnectionRole::Caller, channel, transport).await?;
        }
        Commands::Answer(args) => {
            let (channel, transport) = args.into_configs();
            peer::run(ConnectionRole::Callee, channel, transport).await?;
        }
    }

    Ok(())
}
