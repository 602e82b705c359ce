//! A sans-IO protocol engine for the client side of IMAP (RFC 3501).
//!
//! This crate implements the part of an IMAP client that has to be stateful:
//! serialising commands onto the wire while honouring the synchronising
//! literal rule (RFC 3501 §4.3), and switching dispatch policy for
//! continuation requests during IDLE (RFC 2177) and AUTHENTICATE (RFC 3501
//! §6.2.2). Grammar encoding/decoding, the transport, TLS, SASL mechanisms,
//! command construction, and connection lifecycle (greeting, LOGOUT) are all
//! external collaborators — see the `imap-codec` crate for the grammar, and
//! bring your own transport.
//!
//! The handler never performs I/O itself. [`ClientFlow::submit`] and
//! [`ClientFlow::on_bytes`] return the bytes that became sendable and the
//! events to deliver upstream; driving an actual socket is the caller's job.

mod chunk;
mod command;
mod error;
mod event;
mod flow;
mod framing;
mod mode;
mod queue;

pub use command::CommandItem;
pub use error::FlowError;
pub use event::FlowEvent;
pub use flow::{ClientFlow, ClientFlowOptions};
pub use mode::Mode;
pub use queue::CompletionReceiver;

// Re-exported so downstream crates can build `Command`s and inspect
// `Response`s without an independent `imap-codec` dependency of their own.
pub use imap_codec::imap_types;
