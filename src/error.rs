use thiserror::Error;

/// Everything that can go wrong while driving a [`crate::ClientFlow`].
///
/// See `SPEC_FULL.md` §7 for the propagation policy: only
/// [`FlowError::UnexpectedContinuationRequest`] is recoverable without tearing
/// down the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// A `+` continuation request arrived while none was expected: the mode
    /// was [`crate::Mode::ExpectingResponses`] and the outbound queue head (if
    /// any) had no pending literal chunk.
    #[error("unexpected continuation request")]
    UnexpectedContinuationRequest,

    /// A command item was submitted while the flow was in
    /// [`crate::Mode::ExpectingContinuations`], and the item was not
    /// `IdleDone` or `ContinuationResponse`.
    #[error("a regular command cannot be submitted while a continuation dialogue is open")]
    InvalidSubmission,

    /// The external grammar parser rejected bytes from the server.
    #[error("failed to parse a response from the server")]
    ParseFailure,

    /// The external grammar encoder rejected a command (`SPEC_FULL.md` §7,
    /// kind `encode-failure`).
    ///
    /// `imap-codec`'s `CommandCodec::encode` is infallible (it returns
    /// `Encoded`, not a `Result`), so nothing in this crate can construct
    /// this variant today. It is kept so the five-kind taxonomy stays
    /// complete and the completion signal's error type does not need to
    /// change if a future grammar version (or a different `Encoder`
    /// implementation) makes encoding fallible.
    #[error("failed to encode a command")]
    EncodeFailure,

    /// The connection is no longer usable; all pending completions are
    /// failed with this kind.
    #[error("the connection was closed")]
    ConnectionClosed,
}
