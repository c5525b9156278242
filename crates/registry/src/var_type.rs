//! The enumeration of type identifiers shared by every phase of the compiler.
//!
//! Identifiers are persisted in long-lived IR structures, so their numeric
//! values are part of the external contract of this crate and must never be
//! renumbered. They also do not depend on the target: the vector identifiers
//! exist on every target, even those on which the type trait table has no
//! entry for them.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use tyreg_errors::registry::Error;

/// The identifier of a primitive value type known to the compiler backend.
///
/// The declaration order is the total order of identifiers, and consumers may
/// rely on it (e.g. for range checks).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum VarType {
    /// The type of a value whose type is not yet known.
    Undef = 0,

    /// The absence of a value.
    Void = 1,

    /// A one-byte boolean.
    Bool = 2,

    /// A signed 8-bit integer.
    Byte = 3,

    /// An unsigned 8-bit integer.
    UByte = 4,

    /// A signed 16-bit integer.
    Short = 5,

    /// An unsigned 16-bit integer.
    UShort = 6,

    /// A signed 32-bit integer.
    Int = 7,

    /// An unsigned 32-bit integer, only used as the target of casts.
    UInt = 8,

    /// A signed 64-bit integer.
    Long = 9,

    /// An unsigned 64-bit integer, only used as the target of casts.
    ULong = 10,

    /// An IEEE-754 `binary32` floating-point number.
    Float = 11,

    /// An IEEE-754 `binary64` floating-point number.
    Double = 12,

    /// A reference to a managed object that the garbage collector must be
    /// told about.
    Ref = 13,

    /// An interior pointer into a managed object or to a local, which the
    /// garbage collector must relocate but which is not itself an object.
    ByRef = 14,

    /// A value type with no single scalar representation.
    Struct = 15,

    /// An opaque blob of memory.
    Blk = 16,

    /// Memory preallocated for the local variable space.
    LclBlk = 17,

    /// An 8-byte SIMD vector.
    Simd8 = 18,

    /// A 12-byte SIMD vector.
    Simd12 = 19,

    /// A 16-byte SIMD vector.
    Simd16 = 20,

    /// A 32-byte SIMD vector.
    Simd32 = 21,

    /// The type of a value for which inference has given up.
    Unknown = 22,
}

impl VarType {
    /// Every identifier, in identifier order.
    pub const ALL: [VarType; 23] = [
        Self::Undef,
        Self::Void,
        Self::Bool,
        Self::Byte,
        Self::UByte,
        Self::Short,
        Self::UShort,
        Self::Int,
        Self::UInt,
        Self::Long,
        Self::ULong,
        Self::Float,
        Self::Double,
        Self::Ref,
        Self::ByRef,
        Self::Struct,
        Self::Blk,
        Self::LclBlk,
        Self::Simd8,
        Self::Simd12,
        Self::Simd16,
        Self::Simd32,
        Self::Unknown,
    ];

    /// The number of identifiers in the enumeration.
    pub const COUNT: usize = Self::ALL.len();

    /// Gets the dense index of this identifier, suitable for indexing tables
    /// of [`Self::COUNT`] elements.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Gets the raw, persistable value of this identifier.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Converts a raw identifier that is already known to be valid back into
    /// a [`VarType`].
    ///
    /// Use [`TryFrom`] instead when the raw value comes from an untrusted
    /// source.
    ///
    /// # Panics
    ///
    /// If `raw` is not a valid identifier. This can only occur if the caller
    /// is holding corrupted data, and continuing would risk miscompilation.
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match Self::try_from(raw) {
            Ok(ty) => ty,
            Err(_) => panic!("Internal consistency failure: {raw} is not a valid type identifier"),
        }
    }

    /// Gets the human-readable name used for this type in diagnostics.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Undef => "<UNDEF>",
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::UByte => "ubyte",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::Float => "float",
            Self::Double => "double",
            Self::Ref => "ref",
            Self::ByRef => "byref",
            Self::Struct => "struct",
            Self::Blk => "blk",
            Self::LclBlk => "lclBlk",
            Self::Simd8 => "simd8",
            Self::Simd12 => "simd12",
            Self::Simd16 => "simd16",
            Self::Simd32 => "simd32",
            Self::Unknown => "unknown",
        }
    }

    /// Gets the upper-case symbolic name of this identifier (e.g. `BYREF`).
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Undef => "UNDEF",
            Self::Void => "VOID",
            Self::Bool => "BOOL",
            Self::Byte => "BYTE",
            Self::UByte => "UBYTE",
            Self::Short => "SHORT",
            Self::UShort => "USHORT",
            Self::Int => "INT",
            Self::UInt => "UINT",
            Self::Long => "LONG",
            Self::ULong => "ULONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Ref => "REF",
            Self::ByRef => "BYREF",
            Self::Struct => "STRUCT",
            Self::Blk => "BLK",
            Self::LclBlk => "LCLBLK",
            Self::Simd8 => "SIMD8",
            Self::Simd12 => "SIMD12",
            Self::Simd16 => "SIMD16",
            Self::Simd32 => "SIMD32",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns `true` if `self` names one of the SIMD vector types, and
    /// `false` otherwise.
    ///
    /// This says nothing about whether a given target has an entry for the
    /// type.
    #[must_use]
    pub const fn is_vector_identifier(self) -> bool {
        matches!(
            self,
            Self::Simd8 | Self::Simd12 | Self::Simd16 | Self::Simd32
        )
    }

    /// Returns `true` if `self` names a vector type that only exists on
    /// targets with 32-byte vector registers, and `false` otherwise.
    #[must_use]
    pub const fn is_wide_vector_identifier(self) -> bool {
        matches!(self, Self::Simd32)
    }

    /// Returns `true` if `self` is one of the identifiers that has no fixed
    /// in-memory layout, and `false` otherwise.
    #[must_use]
    pub const fn is_layout_placeholder(self) -> bool {
        matches!(
            self,
            Self::Undef | Self::Void | Self::Struct | Self::Blk | Self::LclBlk | Self::Unknown
        )
    }
}

impl Display for VarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.display_name())
    }
}

/// Conversion from a persisted raw identifier.
impl TryFrom<u8> for VarType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(Error::UnknownTypeIdentifier(value))
    }
}

impl From<VarType> for u8 {
    fn from(value: VarType) -> Self {
        value.raw()
    }
}

/// Accepts either the display name (case-insensitively) or the symbolic name.
impl FromStr for VarType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.display_name().eq_ignore_ascii_case(s) || ty.symbol() == s)
            .ok_or_else(|| Error::UnknownTypeName(s.to_string()))
    }
}
