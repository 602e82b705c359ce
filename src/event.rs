use imap_codec::imap_types::response::{Continue, Response};

use crate::error::FlowError;

/// An item delivered upstream by [`crate::ClientFlow::on_bytes`].
///
/// See `SPEC_FULL.md` §6: the two structural variants are `response(r)` and
/// `continuation-request(c)`; [`FlowEvent::Error`] carries the recoverable
/// [`FlowError::UnexpectedContinuationRequest`] case, which §7 specifies is
/// "surfaced as an inbound error event" without closing the connection.
#[derive(Debug)]
pub enum FlowEvent {
    /// Any tagged, untagged, or fatal (`BYE`) response. Always forwarded
    /// upstream regardless of mode.
    Response(Response<'static>),

    /// A `+` continuation request that was not consumed internally to
    /// advance a queued literal, because the flow is in
    /// [`crate::Mode::ExpectingContinuations`].
    ContinuationRequested(Continue<'static>),

    /// A recoverable protocol error. The flow remains usable.
    Error(FlowError),
}
