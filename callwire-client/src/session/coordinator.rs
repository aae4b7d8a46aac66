use crate::error::SessionError;
use crate::media::{MediaEngine, MediaEvent};
use crate::negotiation::{ConnectionRole, NegotiationEngine, NegotiationState};
use crate::session::events::{SessionCommand, SessionNotice, SignalEvent};
use crate::signalling::SignallingChannel;
use callwire_core::SignallingMessage;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Everything the coordinator waits on.
pub(crate) struct CoordinatorInputs {
    pub(crate) signal_rx: mpsc::UnboundedReceiver<SignalEvent>,
    pub(crate) command_rx: mpsc::Receiver<SessionCommand>,
    pub(crate) media_rx: mpsc::Receiver<MediaEvent>,
}

/// Joins the signalling channel to the negotiation engine for one call.
///
/// It owns both and is the only writer of the negotiation state. Inbound signalling,
/// application commands and media events are handled one at a time on its task, so
/// the offer -> answer sequence can never interleave with another inbound message.
pub(crate) struct SessionCoordinator {
    engine: NegotiationEngine,
    channel: SignallingChannel,
    media: Arc<dyn MediaEngine>,
    signal_rx: mpsc::UnboundedReceiver<SignalEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
    media_rx: mpsc::Receiver<MediaEvent>,
    notice_tx: mpsc::UnboundedSender<SessionNotice>,
    state_tx: watch::Sender<NegotiationState>,
}

impl SessionCoordinator {
    pub(crate) fn new(
        role: ConnectionRole,
        channel: SignallingChannel,
        media: Arc<dyn MediaEngine>,
        inputs: CoordinatorInputs,
        notice_tx: mpsc::UnboundedSender<SessionNotice>,
        state_tx: watch::Sender<NegotiationState>,
    ) -> Self {
        Self {
            engine: NegotiationEngine::new(role, media.clone()),
            channel,
            media,
            signal_rx: inputs.signal_rx,
            command_rx: inputs.command_rx,
            media_rx: inputs.media_rx,
            notice_tx,
            state_tx,
        }
    }

    pub(crate) async fn run(mut self) -> Result<(), SessionError> {
        info!("Session started as {}", self.engine.role());

        let result = loop {
            tokio::select! {
                Some(event) = self.signal_rx.recv() => {
                    if let Err(e) = self.handle_signal(event).await {
                        break Err(e);
                    }
                }

                cmd = self.command_rx.recv() => match cmd {
                    Some(SessionCommand::Call) => {
                        if let Err(e) = self.handle_call().await {
                            break Err(e);
                        }
                    }
                    Some(SessionCommand::HangUp) | None => {
                        info!("Hanging up");
                        break Ok(());
                    }
                },

                Some(event) = self.media_rx.recv() => {
                    if let Err(e) = self.handle_media_event(event) {
                        break Err(e);
                    }
                }
            }
        };

        self.teardown(&result).await;
        result
    }

    async fn handle_signal(&mut self, event: SignalEvent) -> Result<(), SessionError> {
        match event {
            SignalEvent::Established => {
                info!("Relay reachable, ready to negotiate");
                self.notify(SessionNotice::Established);
            }

            SignalEvent::Offer(offer) => {
                info!("Offer received, answering");
                self.engine.apply_remote_description(offer).await?;
                self.publish_state();

                let answer = self.engine.create_initial_description().await?;
                self.engine.set_local_description(answer.clone()).await?;
                self.publish_state();

                self.channel.send(answer.into())?;
            }

            SignalEvent::Answer(answer) => {
                info!("Answer received");
                self.engine.apply_remote_description(answer).await?;
                self.publish_state();
            }

            SignalEvent::Candidate(candidate) => {
                if let Err(e) = self.engine.add_remote_candidate(candidate).await {
                    warn!("Media engine rejected remote candidate: {:#}", e);
                }
            }

            SignalEvent::TransportFailed(e) => {
                error!("Lost the relay: {}", e);
                return Err(e.into());
            }
        }

        Ok(())
    }

    async fn handle_call(&mut self) -> Result<(), SessionError> {
        info!("Placing call");
        let offer = self.engine.create_initial_description().await?;
        self.engine.set_local_description(offer.clone()).await?;
        self.publish_state();

        self.channel.send(offer.into())?;
        Ok(())
    }

    fn handle_media_event(&mut self, event: MediaEvent) -> Result<(), SessionError> {
        match event {
            MediaEvent::LocalCandidate(candidate) => {
                debug!("Sending local candidate: {}", candidate.candidate);
                self.channel.send(SignallingMessage::Candidate(candidate))?;
            }
            MediaEvent::RemoteStreamAdded {
                stream_id,
                track_id,
            } => self.notify(SessionNotice::RemoteStreamAdded {
                stream_id,
                track_id,
            }),
            MediaEvent::ConnectionStateChanged(state) => {
                self.notify(SessionNotice::MediaState(state))
            }
        }
        Ok(())
    }

    fn publish_state(&mut self) {
        let state = self.engine.state();
        let previous = self.state_tx.send_replace(state);
        if state.is_stable() && !previous.is_stable() {
            info!("Negotiation stable");
            self.notify(SessionNotice::Stable);
        }
    }

    fn notify(&self, notice: SessionNotice) {
        if self.notice_tx.send(notice).is_err() {
            debug!("Nobody is listening for session notices");
        }
    }

    async fn teardown(&mut self, result: &Result<(), SessionError>) {
        if let Err(e) = result {
            error!("Session failed: {}", e);
        }

        self.channel.destroy().await;
        if let Err(e) = self.media.close().await {
            warn!("Failed to close media engine: {:#}", e);
        }

        self.notify(SessionNotice::Ended(result.clone().err()));
        info!(
            "Session ended in {:?} after {} remote candidate(s)",
            self.engine.state(),
            self.engine.candidates_forwarded()
        );
    }
}
