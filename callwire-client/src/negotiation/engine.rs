use crate::error::NegotiationError;
use crate::media::MediaEngine;
use crate::negotiation::{ConnectionRole, NegotiationState};
use callwire_core::{IceCandidate, SessionDescription};
use std::sync::Arc;
use tracing::{debug, info};

/// Offer/answer state machine for one call.
///
/// Owned by a single task; every method takes `&mut self`, so the phase can only move
/// through one writer. A finished or failed negotiation is never rewound: a new call
/// needs a new engine.
pub struct NegotiationEngine {
    role: ConnectionRole,
    state: NegotiationState,
    media: Arc<dyn MediaEngine>,
    created_local: Option<SessionDescription>,
    local: Option<SessionDescription>,
    remote: Option<SessionDescription>,
    candidates_forwarded: u64,
}

impl NegotiationEngine {
    pub fn new(role: ConnectionRole, media: Arc<dyn MediaEngine>) -> Self {
        Self {
            role,
            state: NegotiationState::Idle,
            media,
            created_local: None,
            local: None,
            remote: None,
            candidates_forwarded: 0,
        }
    }

    pub fn role(&self) -> ConnectionRole {
        self.role
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn local_description(&self) -> Option<&SessionDescription> {
        self.local.as_ref()
    }

    pub fn remote_description(&self) -> Option<&SessionDescription> {
        self.remote.as_ref()
    }

    pub fn candidates_forwarded(&self) -> u64 {
        self.candidates_forwarded
    }

    /// Asks the media engine for this role's description: an offer for the caller,
    /// an answer for the callee once the remote offer is in.
    pub async fn create_initial_description(
        &mut self,
    ) -> Result<SessionDescription, NegotiationError> {
        let next = match (self.role, self.state) {
            (ConnectionRole::Caller, NegotiationState::Idle) => NegotiationState::LocalOfferCreated,
            (ConnectionRole::Callee, NegotiationState::RemoteOfferReceived) => {
                NegotiationState::LocalAnswerCreated
            }
            (_, state) => {
                return Err(NegotiationError::InvalidPhase {
                    operation: "create_initial_description",
                    state,
                });
            }
        };

        let created = match self.role {
            ConnectionRole::Caller => self.media.create_offer().await,
            ConnectionRole::Callee => self.media.create_answer().await,
        }
        .map_err(NegotiationError::media)?;

        let expected = self.role.local_kind();
        if created.kind() != expected {
            return Err(NegotiationError::UnexpectedDescriptionKind {
                expected,
                actual: created.kind(),
            });
        }

        debug!("Created local {} ({} bytes)", created.kind(), created.sdp().len());
        self.created_local = Some(created.clone());
        self.advance(next);

        Ok(created)
    }

    /// Commits the description returned by [`Self::create_initial_description`].
    pub async fn set_local_description(
        &mut self,
        description: SessionDescription,
    ) -> Result<(), NegotiationError> {
        if self.local.is_some() {
            return Err(NegotiationError::AlreadySet("local"));
        }

        let Some(created) = self.created_local.as_ref() else {
            return Err(NegotiationError::InvalidPhase {
                operation: "set_local_description",
                state: self.state,
            });
        };

        if created.kind() != description.kind() {
            return Err(NegotiationError::UnexpectedDescriptionKind {
                expected: created.kind(),
                actual: description.kind(),
            });
        }
        if created != &description {
            return Err(NegotiationError::LocalMismatch(description.kind()));
        }

        self.media
            .set_local_description(description.clone())
            .await
            .map_err(NegotiationError::media)?;

        info!("Local {} committed ({})", description.kind(), self.role);
        self.local = Some(description);
        self.created_local = None;
        self.settle();

        Ok(())
    }

    pub async fn apply_remote_description(
        &mut self,
        description: SessionDescription,
    ) -> Result<(), NegotiationError> {
        if self.remote.is_some() {
            return Err(NegotiationError::AlreadySet("remote"));
        }

        let expected = self.role.remote_kind();
        if description.kind() != expected {
            return Err(NegotiationError::UnexpectedDescriptionKind {
                expected,
                actual: description.kind(),
            });
        }

        let next = match (self.role, self.state) {
            (ConnectionRole::Caller, NegotiationState::LocalOfferCreated) => {
                NegotiationState::RemoteDescriptionSet
            }
            (ConnectionRole::Callee, NegotiationState::Idle) => {
                NegotiationState::RemoteOfferReceived
            }
            (_, state) => {
                return Err(NegotiationError::InvalidPhase {
                    operation: "apply_remote_description",
                    state,
                });
            }
        };

        self.media
            .set_remote_description(description.clone())
            .await
            .map_err(NegotiationError::media)?;

        info!("Remote {} applied ({})", description.kind(), self.role);
        self.remote = Some(description);
        self.advance(next);
        self.settle();

        Ok(())
    }

    /// Hands a peer candidate to the media engine whatever the phase.
    ///
    /// The returned error is the media engine's verdict on the candidate itself; the
    /// negotiation state is never affected.
    pub async fn add_remote_candidate(&mut self, candidate: IceCandidate) -> anyhow::Result<()> {
        self.candidates_forwarded += 1;
        debug!(
            "Forwarding remote candidate #{} in {:?}: {}",
            self.candidates_forwarded, self.state, candidate.candidate
        );
        self.media.add_ice_candidate(candidate).await
    }

    fn settle(&mut self) {
        if self.local.is_some() && self.remote.is_some() {
            self.advance(NegotiationState::Stable);
        }
    }

    fn advance(&mut self, next: NegotiationState) {
        debug_assert!(
            next.rank() > self.state.rank(),
            "negotiation must move forward: {:?} -> {:?}",
            self.state,
            next
        );
        info!("Negotiation {:?} -> {:?} ({})", self.state, next, self.role);
        self.state = next;
    }
}
