//! The duplex handler facade: `SPEC_FULL.md` §2 and §6.

use imap_codec::imap_types::{command::CommandBody, response::Response, IntoStatic};
use log::{debug, error, trace, warn};

use crate::{
    chunk::{chunk_command, chunk_continuation_response, chunk_idle_done, Chunk},
    command::CommandItem,
    error::FlowError,
    event::FlowEvent,
    framing::{Framing, ParsedItem},
    mode::{Mode, PendingModeChange},
    queue::{CompletionReceiver, OutboundQueue, QueueEntry, Released},
};

/// Options for [`ClientFlow::new`].
#[derive(Debug, Clone, Copy)]
pub struct ClientFlowOptions {
    /// Literals larger than this make `on_bytes` fail with
    /// [`FlowError::ParseFailure`], mirroring the guard the grammar crate's
    /// own tokio framing code applies.
    pub max_literal_length: u32,
}

impl Default for ClientFlowOptions {
    fn default() -> Self {
        Self {
            max_literal_length: 1024 * 1024,
        }
    }
}

/// The client-side IMAP protocol core described in `SPEC_FULL.md`.
///
/// Sans-IO: this type never touches a socket. The caller drains
/// [`ClientFlow::submit`] and [`ClientFlow::on_bytes`] for bytes to write and
/// events to deliver, and is responsible for actually performing the I/O.
#[derive(Debug)]
pub struct ClientFlow {
    mode: Mode,
    queue: OutboundQueue,
    framing: Framing,
    closed: bool,
}

impl ClientFlow {
    pub fn new(options: ClientFlowOptions) -> Self {
        Self {
            mode: Mode::ExpectingResponses,
            queue: OutboundQueue::default(),
            framing: Framing::new(options.max_literal_length),
            closed: false,
        }
    }

    /// The flow's current mode. Mostly useful for tests and for an embedder
    /// deciding whether a regular command can be submitted right now.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Submit a command item for transmission.
    ///
    /// Returns the chunks that can be written immediately (in order — write
    /// each one as its own message, per `SPEC_FULL.md` §6) and a receiver
    /// that resolves once the item's last chunk has been handed off.
    ///
    /// Fails synchronously, without touching the queue, if the flow is
    /// closed or if a regular command is submitted while
    /// [`Mode::ExpectingContinuations`] is active (`SPEC_FULL.md` §7, kind
    /// `invalid-submission`).
    pub fn submit(
        &mut self,
        item: CommandItem<'_>,
    ) -> Result<(Vec<Chunk>, CompletionReceiver), FlowError> {
        if self.closed {
            return Err(FlowError::ConnectionClosed);
        }

        if self.mode.is_expecting_continuations() {
            if let CommandItem::Tagged(_) = item {
                return Err(FlowError::InvalidSubmission);
            }
        }

        let (chunks, mode_change) = match &item {
            CommandItem::Tagged(command) => {
                let chunks = chunk_command(command);
                let mode_change = match &command.body {
                    CommandBody::Idle => Some(PendingModeChange::EnterIdle),
                    CommandBody::Authenticate { .. } => Some(PendingModeChange::EnterAuthenticate {
                        tag: command.tag.clone().into_static(),
                    }),
                    _ => None,
                };
                (chunks, mode_change)
            }
            CommandItem::IdleDone => (
                vec![chunk_idle_done()],
                Some(PendingModeChange::ExitContinuations),
            ),
            CommandItem::ContinuationResponse(payload) => {
                (vec![chunk_continuation_response(payload)], None)
            }
        };

        let (tx, rx) = tokio::sync::oneshot::channel();
        let entry = QueueEntry::new(chunks, Some(tx), mode_change);
        let released = self.queue.push(entry);
        let chunks = self.apply_released(released);

        Ok((chunks, rx))
    }

    /// Feed bytes read from the server. Returns chunks newly unblocked by a
    /// consumed literal ack, plus the events to deliver upstream, in the
    /// order they occurred.
    pub fn on_bytes(&mut self, bytes: &[u8]) -> Result<(Vec<Chunk>, Vec<FlowEvent>), FlowError> {
        if self.closed {
            return Err(FlowError::ConnectionClosed);
        }

        self.framing.feed(bytes);

        let parsed = match self.framing.poll() {
            Ok(items) => items,
            Err(err) => {
                error!("parse failure, connection is no longer usable: {err}");
                self.fail_all(err.clone());
                self.closed = true;
                return Err(err);
            }
        };

        let mut out_chunks = Vec::new();
        let mut out_events = Vec::new();

        for item in parsed {
            match item {
                ParsedItem::Response(response) => {
                    self.maybe_exit_authenticate(&response);
                    out_events.push(FlowEvent::Response(response));
                }
                ParsedItem::Continuation(continuation) => match &self.mode {
                    Mode::ExpectingContinuations { .. } => {
                        out_events.push(FlowEvent::ContinuationRequested(continuation));
                    }
                    Mode::ExpectingResponses => {
                        if self.queue.head_awaits_literal() {
                            trace!("continuation request consumed as a literal ack");
                            let released = self.queue.advance_literal();
                            out_chunks.extend(self.apply_released(released));
                        } else {
                            warn!("unexpected continuation request, no literal is pending");
                            out_events.push(FlowEvent::Error(
                                FlowError::UnexpectedContinuationRequest,
                            ));
                        }
                    }
                },
            }
        }

        Ok((out_chunks, out_events))
    }

    /// Fail every outstanding completion signal with
    /// [`FlowError::ConnectionClosed`] and make the flow unusable. Use this
    /// when the transport closes or a higher layer times the connection out.
    pub fn shutdown(&mut self) {
        self.fail_all(FlowError::ConnectionClosed);
        self.closed = true;
    }

    fn fail_all(&mut self, err: FlowError) {
        for completion in self.queue.drain_completions() {
            let _ = completion.send(Err(err.clone()));
        }
    }

    /// Apply the side effects of a batch of queue releases: resolve
    /// completions and apply any mode change that became due, in order.
    fn apply_released(&mut self, released: Released) -> Vec<Chunk> {
        for completion in released.completions {
            let _ = completion.send(Ok(()));
        }

        for mode_change in released.mode_changes {
            match mode_change {
                PendingModeChange::EnterIdle => {
                    debug!("mode -> expecting-continuations (IDLE)");
                    self.mode = Mode::ExpectingContinuations {
                        authenticate_tag: None,
                    };
                }
                PendingModeChange::EnterAuthenticate { tag } => {
                    debug!("mode -> expecting-continuations (AUTHENTICATE {tag:?})");
                    self.mode = Mode::ExpectingContinuations {
                        authenticate_tag: Some(tag),
                    };
                }
                PendingModeChange::ExitContinuations => {
                    debug!("mode -> expecting-responses");
                    self.mode = Mode::ExpectingResponses;
                }
            }
        }

        released.chunks
    }

    /// AUTHENTICATE's mode exit is triggered by an *inbound* tagged response
    /// matching the tag that opened the dialogue (`SPEC_FULL.md` §4.4),
    /// unlike IDLE's, which is triggered by outbound `DONE` emission.
    fn maybe_exit_authenticate(&mut self, response: &Response<'static>) {
        let Mode::ExpectingContinuations {
            authenticate_tag: Some(expected),
        } = &self.mode
        else {
            return;
        };

        if let Response::Status(status) = response {
            if status.tag() == Some(expected) {
                debug!("mode -> expecting-responses (AUTHENTICATE completed)");
                self.mode = Mode::ExpectingResponses;
            }
        }
    }
}
