use imap_codec::imap_types::command::Command;

/// An element the application submits outbound.
///
/// See `SPEC_FULL.md` §3. Command construction itself (building a valid
/// [`Command`]) stays the caller's concern; this type only distinguishes the
/// three wire shapes that need different chunking treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandItem<'a> {
    /// A normal IMAP command, already tagged by the caller.
    Tagged(Command<'a>),

    /// The sentinel that ends an IDLE session. Wire form: `DONE\r\n`.
    IdleDone,

    /// An opaque client payload sent during an AUTHENTICATE exchange. Wire
    /// form: the bytes followed by `\r\n`. Already base64-encoded (or
    /// whatever the SASL mechanism requires) by the caller.
    ContinuationResponse(Vec<u8>),
}
