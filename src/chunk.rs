//! Turning an encoded command into the chunks of `SPEC_FULL.md` §4.1.

use imap_codec::{
    encode::{Encoder, Fragment},
    imap_types::command::Command,
    CommandCodec,
};

/// A contiguous outbound byte run. Chunk `i` (for `i > 0`) may not be written
/// until the server has sent a continuation request following chunk `i - 1`.
pub type Chunk = Vec<u8>;

/// Encode a tagged command and group its fragments into chunks.
///
/// A chunk boundary is introduced immediately before every
/// [`Fragment::Literal`] (every literal is treated as synchronising — see
/// `SPEC_FULL.md` §4.1's baseline assumption). All other fragment bytes are
/// concatenated into the current chunk. A command with `K` literals produces
/// exactly `K + 1` chunks.
pub fn chunk_command(command: &Command<'_>) -> Vec<Chunk> {
    let encoded = CommandCodec::default().encode(command);

    let mut chunks = Vec::new();
    let mut current = Vec::new();

    for fragment in encoded {
        match fragment {
            Fragment::Line { mut data } => current.append(&mut data),
            Fragment::Literal { mut data, .. } => {
                chunks.push(std::mem::take(&mut current));
                current.append(&mut data);
            }
        }
    }
    chunks.push(current);

    chunks
}

/// The single chunk for the `DONE\r\n` sentinel that ends an IDLE session.
pub fn chunk_idle_done() -> Chunk {
    b"DONE\r\n".to_vec()
}

/// The single chunk for an opaque AUTHENTICATE continuation payload.
pub fn chunk_continuation_response(payload: &[u8]) -> Chunk {
    let mut chunk = Vec::with_capacity(payload.len() + 2);
    chunk.extend_from_slice(payload);
    chunk.extend_from_slice(b"\r\n");
    chunk
}

#[cfg(test)]
mod tests {
    use imap_codec::imap_types::command::{Command, CommandBody};

    use super::*;

    #[test]
    fn no_literal_produces_one_chunk() {
        let cmd = Command::new("a", CommandBody::login("foo", "bar").unwrap()).unwrap();
        let chunks = chunk_command(&cmd);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], b"a LOGIN \"foo\" \"bar\"\r\n".to_vec());
    }

    #[test]
    fn one_literal_produces_two_chunks() {
        let cmd = Command::new("x", CommandBody::rename("\n", "to").unwrap()).unwrap();
        let chunks = chunk_command(&cmd);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], b"x RENAME {1}\r\n".to_vec());
        assert_eq!(chunks[1], b"\n \"to\"\r\n".to_vec());
    }

    #[test]
    fn two_literals_produce_three_chunks() {
        let cmd = Command::new("x", CommandBody::rename("\n", "\r").unwrap()).unwrap();
        let chunks = chunk_command(&cmd);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], b"x RENAME {1}\r\n".to_vec());
        assert_eq!(chunks[1], b"\n {1}\r\n".to_vec());
        assert_eq!(chunks[2], b"\r\r\n".to_vec());
    }

    #[test]
    fn idle_done_is_a_single_chunk() {
        assert_eq!(chunk_idle_done(), b"DONE\r\n".to_vec());
    }

    #[test]
    fn continuation_response_appends_crlf() {
        assert_eq!(
            chunk_continuation_response(b"dGVzdA=="),
            b"dGVzdA==\r\n".to_vec()
        );
    }
}
