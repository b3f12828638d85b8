use thiserror::Error;

/// Failure of a percent-encoding transform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input could not be percent-encoded (unpaired surrogate)
    #[error("Failed to encode text: {0}")]
    Encoding(String),
    /// Input was rejected by every decoding strategy; carries the strict strategy's message
    #[error("Failed to decode text: {0}")]
    Decoding(String),
}

/// Failure while materializing an EditSet against a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Document changed since the EditSet was computed
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    /// Two regions of the same EditSet cover the same characters
    #[error("Overlapping regions {first_start}..{first_end} and {second_start}..{second_end}")]
    Overlapping {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },
}

/// Region literal could not be parsed from `START..END`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRegionError {
    #[error("expected START..END, got '{0}'")]
    MissingSeparator(String),
    #[error("invalid offset '{0}'")]
    InvalidOffset(String),
}

/// Failure of a host command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Edit(#[from] EditError),
    /// The host could not read or write text (clipboard, editor transaction)
    #[error("{0}")]
    Host(String),
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
