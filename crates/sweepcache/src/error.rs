use thiserror::Error;

/// Errors returned by the public [`crate::Cache`] façade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The cache has already been closed.
    #[error("cache is closed")]
    Closed,
    /// The key is not present (or has already expired) in its shard.
    #[error("entry not found")]
    NotFound,
    /// The value is larger than the configured `max_entry_size`.
    #[error("entry is too large to store (max_entry_size exceeded)")]
    EntryTooLarge,
    /// A shard could not grow its queue past `max_shard_size`.
    #[error("shard reached its configured max size and could not grow")]
    MaxSizeReached,
}

/// Internal codec errors. These indicate a logic bug if ever observed outside
/// of tests — see `SPEC_FULL.md` §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum CodecError {
    /// `encode` was given a destination buffer shorter than the frame it
    /// needs to write.
    #[error("destination buffer too short to encode frame")]
    ShortBuffer,
    /// `decode` was given a source slice shorter than its own `frame_len`.
    #[error("source slice shorter than its declared frame_len")]
    ShortFrame,
}

/// Internal bip-buffer / queue errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum BufferError {
    /// `peek_at` was asked for a range outside both committed regions.
    #[error("offset/size does not lie within a committed region")]
    InvalidIndex,
    /// The queue is empty (`front`/`pop` on an empty queue).
    #[error("queue is empty")]
    Empty,
    /// `reserve` could not find a large-enough contiguous run.
    #[error("no contiguous space available for reservation")]
    SpaceUnavailable,
    /// `grow` was refused because it would exceed `max_size`.
    #[error("growing the queue would exceed its configured max size")]
    MaxSizeReached,
}
