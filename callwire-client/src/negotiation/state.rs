/// Phase of the offer/answer exchange.
///
/// Caller: `Idle -> LocalOfferCreated -> RemoteDescriptionSet -> Stable`.
/// Callee: `Idle -> RemoteOfferReceived -> LocalAnswerCreated -> Stable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NegotiationState {
    #[default]
    Idle,
    LocalOfferCreated,
    RemoteDescriptionSet,
    RemoteOfferReceived,
    LocalAnswerCreated,
    Stable,
}

impl NegotiationState {
    /// Position along either path. Transitions only ever increase it.
    pub(crate) fn rank(self) -> u8 {
        match self {
            NegotiationState::Idle => 0,
            NegotiationState::LocalOfferCreated | NegotiationState::RemoteOfferReceived => 1,
            NegotiationState::RemoteDescriptionSet | NegotiationState::LocalAnswerCreated => 2,
            NegotiationState::Stable => 3,
        }
    }

    pub fn is_stable(self) -> bool {
        self == NegotiationState::Stable
    }
}
