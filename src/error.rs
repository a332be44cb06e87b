//! # Error Types
//!
//! This module defines the status values returned by the sentence parser and
//! serializer, together with the policy applied to programmer-contract violations.

use thiserror::Error;

/// Represents every non-success status of parsing or serializing a sentence.
///
/// Each variant is terminal: nothing is retried inside this crate. Stream
/// resynchronization is left to the caller, who can resume after the end index
/// carried by a [`Failure`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Storage for the output could not be obtained.
    #[error("allocation failed")]
    AllocationError,

    /// The checksum of the sentence was corrupt or incorrect.
    ///
    /// Contains both the checksum computed over the sentence content and the
    /// value declared after `*` ([`None`] when no hex digits followed it).
    #[error("checksum mismatch: computed {expected:02X}, declared {found:?}")]
    ChecksumError {
        /// The checksum calculated from the sentence content
        expected: u8,
        /// The checksum found in the sentence
        found: Option<u32>,
    },

    /// The input holds an AIS (`!`) sentence, which is not handled.
    #[error("unsupported message family")]
    UnsupportedMessage,

    /// No `$` (or `!`) was found in the input.
    #[error("begin delimiter not found")]
    BeginDelimiterNotFound,

    /// No `\r` or `\n` follows the begin delimiter.
    #[error("end delimiter not found")]
    EndDelimiterNotFound,

    /// Strict mode only: the sentence body exceeds
    /// [`MAX_SENTENCE_LENGTH`](crate::MAX_SENTENCE_LENGTH).
    #[error("sentence longer than maximum length")]
    LongerThanMaxLength,

    /// Strict mode only: the checksum is not exactly two hex digits.
    #[error("incorrect checksum length")]
    IncorrectChecksumLength,

    /// Strict mode only: an `RM?` sentence arrived without a checksum.
    #[error("checksum expected")]
    ChecksumExpected,

    /// An internal invariant or a caller contract was broken.
    ///
    /// This signals misuse of the API or a bug, never malformed input alone.
    #[error("implementation error")]
    ImplementationError,

    /// The sentence id before the first `,` is not exactly five characters.
    #[error("message id length incorrect")]
    MessageIdLengthIncorrect,

    /// A proprietary (`P`-prefixed) sentence arrived and no vendor handler is registered.
    #[error("unhandled vendor extension message")]
    UnhandledVendorExtMessage,

    /// A talker id, type code or field value holds a byte that delimits sentences
    /// on the wire: `*`, `,`, `\r`, `\n` or NUL.
    #[error("reserved delimiter byte 0x{0:02X}")]
    ReservedByte(u8),

    /// A vendor handler rejected a proprietary sentence for the given reason.
    #[error("vendor extension rejected: {0}")]
    Vendor(&'static str),
}

/// The error side of a parse.
///
/// `end_index` is the byte offset one past the line terminator of the sentence
/// that failed. It is present for every failure detected after the terminator was
/// located, which lets the caller skip the broken sentence and carry on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{error}")]
pub struct Failure {
    /// What went wrong.
    #[source]
    pub error: Error,
    /// Offset of the first byte after the rejected sentence, if known.
    pub end_index: Option<usize>,
}

impl Failure {
    pub(crate) fn before_end(error: Error) -> Self {
        Failure {
            error,
            end_index: None,
        }
    }

    pub(crate) fn at(error: Error, end_index: usize) -> Self {
        Failure {
            error,
            end_index: Some(end_index),
        }
    }
}

/// Decides what happens when a caller breaks an API contract.
///
/// Malformed input is always reported as an [`Error`]. Contract violations are a
/// stricter class, such as a vendor handler reporting an end index outside the
/// buffer.
///
/// The default is resolved at compile time: [`ContractPolicy::Panic`] when
/// `debug_assertions` are on, [`ContractPolicy::Report`] otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractPolicy {
    /// Abort through `panic!`.
    Panic,

    /// Return [`Error::ImplementationError`].
    ///
    /// Use this on targets that cannot unwind or abort.
    Report,
}

impl ContractPolicy {
    pub(crate) fn violated(self, what: &str) -> Error {
        match self {
            ContractPolicy::Panic => panic!("contract violation: {what}"),
            ContractPolicy::Report => Error::ImplementationError,
        }
    }
}

impl Default for ContractPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ContractPolicy::Panic
        } else {
            ContractPolicy::Report
        }
    }
}
