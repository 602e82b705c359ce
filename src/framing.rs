//! Turning arbitrarily-split server bytes into parse events.
//!
//! Adapted from the line/literal framing state machine the grammar crate
//! itself uses in its tokio demo codec (`ImapClientCodec`): a line is read up
//! to and including `\r\n` unless the parser stops at a literal
//! announcement, in which case the required number of literal bytes is
//! accumulated before resuming line framing.

use imap_codec::{
    decode::{Decoder, ResponseDecodeError},
    imap_types::{
        response::{Continue, Response},
        IntoStatic,
    },
    ResponseCodec,
};

use crate::error::FlowError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum FramingState {
    ReadLine { to_consume_acc: usize },
    ReadLiteral { to_consume_acc: usize, length: u32 },
}

impl Default for FramingState {
    fn default() -> Self {
        FramingState::ReadLine { to_consume_acc: 0 }
    }
}

/// One parse event from the inbound byte stream: either a structured
/// response, or a continuation request (`+`) that `flow` must dispatch.
#[derive(Debug)]
pub(crate) enum ParsedItem {
    Response(Response<'static>),
    Continuation(Continue<'static>),
}

#[derive(Debug)]
pub(crate) struct Framing {
    state: FramingState,
    buffer: Vec<u8>,
    max_literal_length: u32,
}

impl Framing {
    pub(crate) fn new(max_literal_length: u32) -> Self {
        Self {
            state: FramingState::default(),
            buffer: Vec::new(),
            max_literal_length,
        }
    }

    pub(crate) fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Parse as many complete items as the buffer currently allows.
    pub(crate) fn poll(&mut self) -> Result<Vec<ParsedItem>, FlowError> {
        let mut items = Vec::new();

        loop {
            match self.state {
                FramingState::ReadLine {
                    ref mut to_consume_acc,
                } => match find_crlf_inclusive(*to_consume_acc, &self.buffer) {
                    Some(to_consume) => {
                        *to_consume_acc += to_consume;
                        let line = &self.buffer[..*to_consume_acc];

                        match ResponseCodec::default().decode(line) {
                            Ok((remaining, response)) => {
                                debug_assert!(remaining.is_empty());

                                let consumed = *to_consume_acc;
                                self.buffer.drain(..consumed);
                                self.state = FramingState::ReadLine { to_consume_acc: 0 };

                                items.push(to_parsed_item(response.into_static()));
                            }
                            Err(ResponseDecodeError::Incomplete) => {
                                // A line without a dangling literal is always
                                // complete; this should not happen.
                                return Err(FlowError::ParseFailure);
                            }
                            Err(ResponseDecodeError::LiteralFound { length }) => {
                                if length > self.max_literal_length {
                                    return Err(FlowError::ParseFailure);
                                }

                                self.state = FramingState::ReadLiteral {
                                    to_consume_acc: *to_consume_acc,
                                    length,
                                };
                            }
                            Err(ResponseDecodeError::Failed) => {
                                return Err(FlowError::ParseFailure);
                            }
                        }
                    }
                    None => break,
                },
                FramingState::ReadLiteral {
                    to_consume_acc,
                    length,
                } => {
                    if to_consume_acc + length as usize <= self.buffer.len() {
                        self.state = FramingState::ReadLine {
                            to_consume_acc: to_consume_acc + length as usize,
                        };
                    } else {
                        break;
                    }
                }
            }
        }

        Ok(items)
    }
}

fn to_parsed_item(response: Response<'static>) -> ParsedItem {
    match response {
        Response::Continue(c) => ParsedItem::Continuation(c),
        other => ParsedItem::Response(other),
    }
}

/// Skip the first `skip` bytes and return how many more are needed to cover
/// the next `\r\n` (inclusive), or `None` if no full line is buffered yet.
fn find_crlf_inclusive(skip: usize, buf: &[u8]) -> Option<usize> {
    buf.iter()
        .skip(skip)
        .position(|b| *b == b'\n')
        .map(|position| position + 1)
}
