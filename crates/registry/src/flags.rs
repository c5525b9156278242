//! The classification flags carried by every entry in the type trait table.
//!
//! Flags compose freely with one exception: the collector-tracked flags
//! ([`TypeFlags::GC_REFERENCE`] and [`TypeFlags::BY_REFERENCE`]) never appear
//! alongside the value-category flags. Consumers are expected to ask questions
//! through the predicate methods rather than by testing bits.

use std::fmt::{Display, Formatter};

use bitflags::bitflags;
use itertools::Itertools;

bitflags! {
    /// The set of classification flags for a type.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct TypeFlags: u8 {
        /// An integral type.
        const INTEGER = 1 << 0;
        /// An integral type that is zero-extended rather than sign-extended.
        const UNSIGNED = 1 << 1;
        /// An IEEE-754 floating-point type.
        const FLOATING = 1 << 2;
        /// A managed object reference.
        const GC_REFERENCE = 1 << 3;
        /// An interior pointer.
        const BY_REFERENCE = 1 << 4;
        /// An aggregate with no single scalar representation.
        const STRUCT_LIKE = 1 << 5;
        /// A SIMD vector.
        const VECTOR = 1 << 6;
        /// As wide as a pointer on the current target.
        const NATIVE_INT = 1 << 7;
    }
}

impl TypeFlags {
    /// The flags that describe how a value is tracked by the garbage collector.
    pub const GC_TRACKED: Self = Self::GC_REFERENCE.union(Self::BY_REFERENCE);

    /// The flags that describe a category of plain value, and hence may never
    /// be combined with [`Self::GC_TRACKED`].
    pub const VALUE_CATEGORY: Self = Self::INTEGER
        .union(Self::FLOATING)
        .union(Self::STRUCT_LIKE)
        .union(Self::VECTOR);

    /// Returns `true` if the type is integral.
    #[inline]
    #[must_use]
    pub const fn is_integral(self) -> bool {
        self.contains(Self::INTEGER)
    }

    /// Returns `true` if the type is an unsigned integral type.
    ///
    /// The unsigned flag on its own carries no meaning, so this is `false` for
    /// any non-integral type.
    #[inline]
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        self.contains(Self::INTEGER.union(Self::UNSIGNED))
    }

    /// Returns `true` if the type is floating-point.
    #[inline]
    #[must_use]
    pub const fn is_floating(self) -> bool {
        self.contains(Self::FLOATING)
    }

    /// Returns `true` if the type is a managed object reference.
    #[inline]
    #[must_use]
    pub const fn is_gc_reference(self) -> bool {
        self.contains(Self::GC_REFERENCE)
    }

    /// Returns `true` if the type is an interior pointer.
    #[inline]
    #[must_use]
    pub const fn is_by_reference(self) -> bool {
        self.contains(Self::BY_REFERENCE)
    }

    /// Returns `true` if values of the type must be reported to the garbage
    /// collector, either as object references or as interior pointers.
    #[inline]
    #[must_use]
    pub const fn is_gc_tracked(self) -> bool {
        self.intersects(Self::GC_TRACKED)
    }

    /// Returns `true` if the type is a SIMD vector.
    #[inline]
    #[must_use]
    pub const fn is_vector(self) -> bool {
        self.contains(Self::VECTOR)
    }

    /// Returns `true` if the type is an aggregate.
    #[inline]
    #[must_use]
    pub const fn is_aggregate(self) -> bool {
        self.contains(Self::STRUCT_LIKE)
    }

    /// Returns `true` if the type is exactly as wide as a pointer on the
    /// current target.
    #[inline]
    #[must_use]
    pub const fn is_native_int(self) -> bool {
        self.contains(Self::NATIVE_INT)
    }
}

/// Prints the set members joined by `|`, or `-` for the empty set.
impl Display for TypeFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.pad("-");
        }

        let names = self.iter_names().map(|(name, _)| name).join("|");
        f.pad(&names)
    }
}
