//! Attributes describing how the instruction emitter encodes an operand of a
//! given type.
//!
//! For most types the emitter only needs a byte count. Object references and
//! interior pointers additionally carry a tag so that the emitter can record
//! collector metadata for the operand, and that tag is what distinguishes an
//! [`EmitAttr`] from a plain storage size.

use std::fmt::{Display, Formatter};

/// How, if at all, an operand must be reported to the garbage collector.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum GcKind {
    /// The operand is not tracked by the collector.
    #[default]
    None,

    /// The operand is a managed object reference.
    Ref,

    /// The operand is an interior pointer.
    ByRef,
}

/// The size of an operand as seen by the instruction emitter.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct EmitAttr {
    /// The number of bytes encoded.
    size: u8,

    /// The collector tag carried alongside the size.
    gc: GcKind,
}

impl EmitAttr {
    /// Creates an untagged attribute of `size` bytes.
    #[must_use]
    pub const fn plain(size: u8) -> Self {
        Self {
            size,
            gc: GcKind::None,
        }
    }

    /// Creates an attribute of `size` bytes tagged as an object reference.
    #[must_use]
    pub const fn gc_ref(size: u8) -> Self {
        Self {
            size,
            gc: GcKind::Ref,
        }
    }

    /// Creates an attribute of `size` bytes tagged as an interior pointer.
    #[must_use]
    pub const fn by_ref(size: u8) -> Self {
        Self {
            size,
            gc: GcKind::ByRef,
        }
    }

    /// Gets the number of bytes encoded.
    #[must_use]
    pub const fn size(self) -> u8 {
        self.size
    }

    /// Gets the collector tag.
    #[must_use]
    pub const fn gc_kind(self) -> GcKind {
        self.gc
    }

    /// Returns `true` if the attribute carries a collector tag.
    #[must_use]
    pub const fn is_gc(self) -> bool {
        !matches!(self.gc, GcKind::None)
    }
}

impl Display for EmitAttr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self.gc {
            GcKind::None => self.size.to_string(),
            GcKind::Ref => format!("gcref({})", self.size),
            GcKind::ByRef => format!("byref({})", self.size),
        };
        f.pad(&text)
    }
}

#[cfg(test)]
mod test {
    use crate::emit::{EmitAttr, GcKind};

    #[test]
    fn tagged_attributes_differ_from_plain_ones() {
        assert_ne!(EmitAttr::gc_ref(8), EmitAttr::plain(8));
        assert_ne!(EmitAttr::by_ref(4), EmitAttr::plain(4));
        assert_ne!(EmitAttr::gc_ref(8), EmitAttr::by_ref(8));
        assert_eq!(EmitAttr::gc_ref(8).size(), 8);
        assert_eq!(EmitAttr::by_ref(4).gc_kind(), GcKind::ByRef);
        assert!(!EmitAttr::plain(4).is_gc());
    }

    #[test]
    fn displays_the_tag() {
        assert_eq!(EmitAttr::plain(2).to_string(), "2");
        assert_eq!(EmitAttr::gc_ref(8).to_string(), "gcref(8)");
        assert_eq!(EmitAttr::by_ref(4).to_string(), "byref(4)");
    }
}
