mod coordinator;
mod events;

use coordinator::{CoordinatorInputs, SessionCoordinator};
pub use events::SessionNotice;

use crate::error::SessionError;
use crate::media::{MediaEngine, MediaEvent};
use crate::negotiation::{ConnectionRole, NegotiationState};
use crate::signalling::{SignallingChannel, SignallingListener};
use events::{SessionCommand, SessionEvents};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::error;

/// Handle to a running call. Dropping it hangs up.
pub struct Session {
    role: ConnectionRole,
    command_tx: mpsc::Sender<SessionCommand>,
    notice_rx: mpsc::UnboundedReceiver<SessionNotice>,
    state_rx: watch::Receiver<NegotiationState>,
    task: JoinHandle<Result<(), SessionError>>,
}

impl Session {
    /// Spawns the coordinator. `open_channel` receives the coordinator's listener and
    /// returns the signalling channel to drive, e.g.
    /// `|listener| SignallingChannel::open(config, listener)`.
    pub fn start<C>(
        role: ConnectionRole,
        open_channel: C,
        media: Arc<dyn MediaEngine>,
        media_events: mpsc::Receiver<MediaEvent>,
    ) -> Self
    where
        C: FnOnce(Arc<dyn SignallingListener>) -> SignallingChannel,
    {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(16);
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(NegotiationState::Idle);

        let channel = open_channel(Arc::new(SessionEvents::new(signal_tx)));
        let coordinator = SessionCoordinator::new(
            role,
            channel,
            media,
            CoordinatorInputs {
                signal_rx,
                command_rx,
                media_rx: media_events,
            },
            notice_tx,
            state_tx,
        );

        Self {
            role,
            command_tx,
            notice_rx,
            state_rx,
            task: tokio::spawn(coordinator.run()),
        }
    }

    pub fn role(&self) -> ConnectionRole {
        self.role
    }

    /// Starts the offer. Only meaningful for the caller.
    pub async fn call(&self) -> Result<(), SessionError> {
        self.command_tx
            .send(SessionCommand::Call)
            .await
            .map_err(|_| SessionError::Closed)
    }

    pub fn state(&self) -> watch::Receiver<NegotiationState> {
        self.state_rx.clone()
    }

    pub async fn next_notice(&mut self) -> Option<SessionNotice> {
        self.notice_rx.recv().await
    }

    /// Ends the call and returns how the session finished.
    pub async fn hang_up(self) -> Result<(), SessionError> {
        let _ = self.command_tx.send(SessionCommand::HangUp).await;
        Self::finish(self.task).await
    }

    /// Waits for the session to end on its own.
    pub async fn join(self) -> Result<(), SessionError> {
        let Session {
            command_tx, task, ..
        } = self;
        // Keep the command queue open; dropping it would hang up.
        let result = Self::finish(task).await;
        drop(command_tx);
        result
    }

    async fn finish(task: JoinHandle<Result<(), SessionError>>) -> Result<(), SessionError> {
        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!("Session coordinator crashed: {:?}", e);
                Err(SessionError::Closed)
            }
        }
    }
}
