//! Error types and utilities to do with configuring, building, and publishing
//! type trait tables.

use thiserror::Error;

/// The result type for use in the registry.
pub type Result<T> = std::result::Result<T, Error>;

/// This error type is for use during the construction of a type trait table
/// and at the boundaries where raw data is converted into registry types.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// Emitted when a segment of a target description string cannot be
    /// parsed.
    ///
    /// The fields are, in order: the whole description, the offending
    /// segment, and the byte offset of that segment in the description.
    #[error("`{_0}` with invalid segment `{_1}` could not be parsed as a target description")]
    InvalidTargetSpecification(String, String, usize),

    /// Emitted when a segment of a target description contradicts a segment
    /// of the same kind that appeared earlier in the description.
    ///
    /// The fields are as for [`Self::InvalidTargetSpecification`].
    #[error("`{_0}` with segment `{_1}` contradicts an earlier segment of the target description")]
    ContradictorySegment(String, String, usize),

    /// Emitted when the requested word size is not one that any supported
    /// target uses.
    #[error("Targets with a {_0}-bit word size are not supported")]
    UnsupportedWordSize(usize),

    /// Emitted when the requested word size does not match the architecture
    /// it was requested for.
    #[error("The {_0} architecture cannot be configured with a {_1}-bit word size")]
    ContradictoryWordSize(String, usize),

    /// Emitted when vector types are requested for an architecture that has no
    /// vector support.
    #[error("Vector types were requested but the {_0} architecture does not support them")]
    VectorsUnsupported(String),

    /// Emitted when the rows produced for a target break one of the table's
    /// invariants.
    ///
    /// The fields are the name of the offending type and a description of
    /// the broken invariant.
    #[error("The entry for `{_0}` is inconsistent: {_1}")]
    InconsistentTable(String, String),

    /// Emitted when a raw identifier does not correspond to any type in the
    /// enumeration.
    #[error("{_0} is not a known type identifier")]
    UnknownTypeIdentifier(u8),

    /// Emitted when a type name does not correspond to any type in the
    /// enumeration.
    #[error("`{_0}` is not a known type name")]
    UnknownTypeName(String),

    /// Emitted when a process-wide table has already been published for a
    /// different target.
    ///
    /// The fields are the installed target and the requested target.
    #[error("A type trait table for `{_0}` is already installed, so one for `{_1}` cannot be")]
    TableAlreadyInstalled(String, String),
}

impl Error {
    /// Gets the range of characters in the input that this error refers to,
    /// if it refers to a specific portion of some textual input.
    ///
    /// The range counts characters rather than bytes, so it can be handed
    /// straight to a diagnostic renderer.
    #[must_use]
    pub fn span(&self) -> Option<std::ops::Range<usize>> {
        match self {
            Self::InvalidTargetSpecification(description, segment, offset)
            | Self::ContradictorySegment(description, segment, offset) => {
                let start = description.get(..*offset).map_or(*offset, |s| s.chars().count());
                Some(start..start + segment.chars().count().max(1))
            }
            _ => None,
        }
    }
}
