//! The outbound FIFO of `SPEC_FULL.md` §4.2.

use std::collections::VecDeque;

use tokio::sync::oneshot;

use crate::{chunk::Chunk, error::FlowError, mode::PendingModeChange};

/// Resolved once every chunk of a submitted command has been handed to the
/// transport. Failed with [`FlowError::ConnectionClosed`] if the flow is torn
/// down first.
pub type Completion = oneshot::Sender<Result<(), FlowError>>;

/// Receiving half of [`Completion`], returned to the caller of `submit`.
pub type CompletionReceiver = oneshot::Receiver<Result<(), FlowError>>;

#[derive(Debug)]
pub(crate) struct QueueEntry {
    /// Chunks not yet released, in order. The front element is the next one
    /// to hand to the transport.
    pub(crate) chunks: VecDeque<Chunk>,
    pub(crate) completion: Option<Completion>,
    pub(crate) mode_change: Option<PendingModeChange>,
}

impl QueueEntry {
    pub(crate) fn new(
        chunks: Vec<Chunk>,
        completion: Option<Completion>,
        mode_change: Option<PendingModeChange>,
    ) -> Self {
        Self {
            chunks: chunks.into(),
            completion,
            mode_change,
        }
    }
}

/// What releasing chunks produced: bytes to write (in order, one chunk per
/// write per §6), completions to resolve, and mode changes to apply — all in
/// the order the underlying queue entries finished.
#[derive(Debug, Default)]
pub(crate) struct Released {
    pub(crate) chunks: Vec<Chunk>,
    pub(crate) completions: Vec<Completion>,
    pub(crate) mode_changes: Vec<PendingModeChange>,
}

#[derive(Debug, Default)]
pub(crate) struct OutboundQueue {
    entries: VecDeque<QueueEntry>,
}

impl OutboundQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if the head entry has chunks remaining beyond the one currently
    /// "in flight" awaiting a continuation, i.e. the next continuation
    /// request the server sends should be consumed to advance a literal.
    pub(crate) fn head_awaits_literal(&self) -> bool {
        self.entries.front().is_some_and(|e| !e.chunks.is_empty())
    }

    /// Enqueue a new entry. If the queue was empty, releases as many chunks
    /// as immediately possible (the entry's first chunk, and a cascade into
    /// further entries if this one has no literals to wait for).
    pub(crate) fn push(&mut self, entry: QueueEntry) -> Released {
        let was_empty = self.entries.is_empty();
        self.entries.push_back(entry);

        if was_empty {
            self.cascade()
        } else {
            Released::default()
        }
    }

    /// Called when a `+` is interpreted as the ack for the head's next
    /// literal: releases that chunk, and cascades into subsequent entries if
    /// this empties the head.
    pub(crate) fn advance_literal(&mut self) -> Released {
        self.cascade()
    }

    fn cascade(&mut self) -> Released {
        let mut released = Released::default();

        loop {
            let Some(head) = self.entries.front_mut() else {
                break;
            };

            match head.chunks.pop_front() {
                Some(chunk) => released.chunks.push(chunk),
                None => break,
            }

            if self.entries.front().expect("just matched").chunks.is_empty() {
                let entry = self.entries.pop_front().expect("just matched");
                if let Some(completion) = entry.completion {
                    released.completions.push(completion);
                }
                if let Some(mode_change) = entry.mode_change {
                    released.mode_changes.push(mode_change);
                }
                // Keep cascading: the new head (if any) can release its
                // first chunk right away.
                continue;
            }

            // Head still has chunks gated behind a literal ack.
            break;
        }

        released
    }

    /// Drain every entry, returning their completions so the caller can fail
    /// them all with the same error.
    pub(crate) fn drain_completions(&mut self) -> Vec<Completion> {
        self.entries
            .drain(..)
            .filter_map(|entry| entry.completion)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(chunks: &[&[u8]]) -> (QueueEntry, CompletionReceiver) {
        let (tx, rx) = oneshot::channel();
        (
            QueueEntry::new(
                chunks.iter().map(|c| c.to_vec()).collect(),
                Some(tx),
                None,
            ),
            rx,
        )
    }

    #[test]
    fn single_chunk_entry_releases_immediately_and_completes() {
        let mut queue = OutboundQueue::default();
        let (e, mut rx) = entry(&[b"a LOGIN x y\r\n"]);

        let released = queue.push(e);
        assert_eq!(released.chunks, vec![b"a LOGIN x y\r\n".to_vec()]);
        assert_eq!(released.completions.len(), 1);
        assert!(queue.is_empty());
        assert!(!queue.head_awaits_literal());

        released.completions.into_iter().for_each(|c| {
            c.send(Ok(())).unwrap();
        });
        assert_eq!(rx.try_recv().unwrap(), Ok(()));
    }

    #[test]
    fn literal_entry_waits_for_advance() {
        let mut queue = OutboundQueue::default();
        let (e, _rx) = entry(&[b"x RENAME {1}\r\n", b"\n \"to\"\r\n"]);

        let released = queue.push(e);
        assert_eq!(released.chunks, vec![b"x RENAME {1}\r\n".to_vec()]);
        assert!(released.completions.is_empty());
        assert!(!queue.is_empty());
        assert!(queue.head_awaits_literal());

        let released = queue.advance_literal();
        assert_eq!(released.chunks, vec![b"\n \"to\"\r\n".to_vec()]);
        assert_eq!(released.completions.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn second_command_begins_as_soon_as_first_finishes() {
        let mut queue = OutboundQueue::default();
        let (e1, _rx1) = entry(&[b"x RENAME {1}\r\n", b"\n \"to\"\r\n"]);
        let (e2, _rx2) = entry(&[b"y RENAME \"from\" {1}\r\n", b"\n\r\n"]);

        queue.push(e1);
        let released = queue.push(e2);
        assert!(released.chunks.is_empty(), "e2 must wait for e1 to finish");

        let released = queue.advance_literal();
        assert_eq!(
            released.chunks,
            vec![
                b"\n \"to\"\r\n".to_vec(),
                b"y RENAME \"from\" {1}\r\n".to_vec(),
            ]
        );
        assert_eq!(released.completions.len(), 1);
        assert!(queue.head_awaits_literal());
    }
}
