use crate::media::{MediaEngine, MediaEvent, TransportConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use callwire_core::{IceCandidate, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine as CodecRegistry;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_remote::TrackRemote;

const EVENT_QUEUE: usize = 256;

/// [`MediaEngine`] backed by a webrtc-rs peer connection.
pub struct PeerConnectionMedia {
    peer_connection: Arc<RTCPeerConnection>,
}

impl PeerConnectionMedia {
    /// Builds the peer connection and wires its callbacks into the returned event queue.
    pub async fn new(config: TransportConfig) -> Result<(Self, mpsc::Receiver<MediaEvent>)> {
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE);

        let mut codecs = CodecRegistry::default();
        codecs.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut codecs)?;

        let api = APIBuilder::new()
            .with_media_engine(codecs)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers.clone(),
                ..Default::default()
            }]
        };

        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        // Ask for the peer's video even though nothing is captured locally.
        peer_connection
            .add_transceiver_from_kind(RTPCodecType::Video, None)
            .await
            .context("Failed to add video transceiver")?;

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else {
                    debug!("ICE gathering complete");
                    return;
                };
                let init = match candidate.to_json() {
                    Ok(init) => init,
                    Err(e) => {
                        warn!("Failed to serialise local candidate: {:?}", e);
                        return;
                    }
                };
                let local = IceCandidate::new(
                    init.sdp_mid.unwrap_or_default(),
                    init.sdp_mline_index.unwrap_or_default(),
                    init.candidate,
                );
                let _ = tx.send(MediaEvent::LocalCandidate(local)).await;
            })
        }));

        let track_tx = event_tx.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();

                Box::pin(async move {
                    let event = MediaEvent::RemoteStreamAdded {
                        stream_id: track.stream_id().to_string(),
                        track_id: track.id().to_string(),
                    };
                    info!("Remote stream added: {:?}", event);
                    let _ = tx.send(event).await;
                })
            },
        ));

        let state_tx = event_tx;
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer connection state changed: {}", s);
                    let _ = tx.send(MediaEvent::ConnectionStateChanged(s.to_string())).await;
                })
            },
        ));

        Ok((Self { peer_connection }, event_rx))
    }
}

fn to_rtc(description: SessionDescription) -> Result<RTCSessionDescription> {
    let kind = description.kind();
    let sdp = description.into_sdp();
    let rtc = match kind {
        SdpKind::Offer => RTCSessionDescription::offer(sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(sdp)?,
    };
    Ok(rtc)
}

#[async_trait]
impl MediaEngine for PeerConnectionMedia {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, description: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_local_description(to_rtc(description)?)
            .await
            .context("Failed to set local description")?;
        Ok(())
    }

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_remote_description(to_rtc(description)?)
            .await
            .context("Failed to set remote description")?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: Some(candidate.sdp_mid),
            sdp_mline_index: Some(candidate.sdp_m_line_index),
            ..Default::default()
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
