use imap_codec::imap_types::core::Tag;

/// Which dispatch policy applies to a continuation request arriving from the
/// server. See `SPEC_FULL.md` §4.4.
///
/// This is distinct from the outbound queue's transient "head has a pending
/// literal chunk" bit: that's a property of the queue (§4.2), not of the
/// mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// No continuation dialogue is open. A `+` is either the ack for a
    /// queued literal, or a protocol error.
    ExpectingResponses,

    /// An IDLE or AUTHENTICATE command has finished emitting. Continuation
    /// requests are forwarded upstream verbatim instead of being consumed to
    /// advance a literal. Carries the tag of the AUTHENTICATE command that
    /// opened the dialogue, if any (`None` while idling).
    ExpectingContinuations { authenticate_tag: Option<Tag<'static>> },
}

impl Mode {
    pub fn is_expecting_continuations(&self) -> bool {
        matches!(self, Mode::ExpectingContinuations { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(
            self,
            Mode::ExpectingContinuations {
                authenticate_tag: None
            }
        )
    }

    pub fn is_authenticating(&self) -> bool {
        matches!(
            self,
            Mode::ExpectingContinuations {
                authenticate_tag: Some(_)
            }
        )
    }
}

/// A mode change a queue entry causes once its last chunk has been released.
///
/// See `SPEC_FULL.md` §4.2: "the mode transition is scheduled to take effect
/// *after* the command's chunks finish emitting".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingModeChange {
    EnterIdle,
    EnterAuthenticate { tag: Tag<'static> },
    ExitContinuations,
}
