use anyhow::{Context, Result};
use callwire_client::{
    ChannelConfig, ConnectionRole, PeerConnectionMedia, Session, SessionNotice,
    SignallingChannel, TransportConfig,
};
use colored::*;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Runs one end of a call until it ends or Ctrl-C.
pub async fn run(role: ConnectionRole, channel: ChannelConfig, transport: TransportConfig) -> Result<()> {
    let (media, media_events) = PeerConnectionMedia::new(transport)
        .await
        .context("Failed to set up media")?;

    println!("{} {} as {}", "🔌 Connecting to".cyan(), channel.url(), role);
    let mut session = Session::start(
        role,
        |listener| SignallingChannel::open(channel, listener),
        Arc::new(media),
        media_events,
    );

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut ready_to_call = false;

    loop {
        tokio::select! {
            notice = session.next_notice() => {
                let Some(notice) = notice else { break };
                match notice {
                    SessionNotice::Established if role == ConnectionRole::Caller => {
                        println!("{}", "✅ Relay connected. Press Enter to call.".green());
                        ready_to_call = true;
                    }
                    SessionNotice::Established => {
                        println!("{}", "✅ Relay connected. Waiting for a call...".green());
                    }
                    SessionNotice::Stable => {
                        println!("{}", "🤝 Negotiation complete".green().bold());
                    }
                    SessionNotice::RemoteStreamAdded { stream_id, track_id } => {
                        println!("{} {}/{}", "🎥 Remote stream".cyan(), stream_id, track_id);
                    }
                    SessionNotice::MediaState(state) => {
                        println!("{} {}", "   media:".dimmed(), state);
                    }
                    SessionNotice::Ended(_) => break,
                }
            }

            line = stdin.next_line(), if ready_to_call => {
                match line {
                    Ok(Some(_)) => {
                        ready_to_call = false;
                        println!("{}", "📞 Calling...".cyan());
                        session.call().await?;
                    }
                    Ok(None) => ready_to_call = false,
                    Err(e) => {
                        debug!("stdin unreadable: {}", e);
                        ready_to_call = false;
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                println!("{}", "👋 Hanging up".yellow());
                break;
            }
        }
    }

    match session.hang_up().await {
        Ok(()) => {
            println!("{}", "Call ended".green());
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "❌ Call failed:".red().bold(), e);
            Err(e.into())
        }
    }
}
