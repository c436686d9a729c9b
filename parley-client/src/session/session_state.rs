use std::fmt;

/// Which side of the offer/answer exchange the local client plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Already present when the peer's `joined` arrived; sends the offer.
    Initiator,
    /// Learned about the peer from its offer; answers.
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    OfferSent,
    AnswerPending,
    OfferReceived,
    AnswerSent,
    Connected,
    Closed,
}

impl SessionState {
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        match (self, next) {
            (Closed, _) => false,
            (_, Closed) => true,
            (Idle, OfferSent) | (OfferSent, AnswerPending) | (AnswerPending, Connected) => true,
            (Idle, OfferReceived) | (OfferReceived, AnswerSent) | (AnswerSent, Connected) => true,
            _ => false,
        }
    }

    /// True while the remote description is not yet known, so remote ICE
    /// candidates have nothing to attach to.
    pub fn awaits_remote_description(self) -> bool {
        matches!(
            self,
            SessionState::Idle | SessionState::OfferSent | SessionState::AnswerPending
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::OfferSent => "offer-sent",
            SessionState::AnswerPending => "answer-pending",
            SessionState::OfferReceived => "offer-received",
            SessionState::AnswerSent => "answer-sent",
            SessionState::Connected => "connected",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
