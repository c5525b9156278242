//! The record describing everything the registry knows about a single type.

use std::fmt::{Display, Formatter};

use crate::{constant::STACK_SLOT_SIZE, emit::EmitAttr, flags::TypeFlags, var_type::VarType};

/// The category a type belongs to for the purposes of static type-safety
/// verification.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum VerificationType {
    /// The type has no valid verification category.
    Error,

    /// An 8-bit integer or boolean.
    Byte,

    /// A 16-bit integer.
    Short,

    /// A 32-bit integer.
    Int,

    /// A 64-bit integer.
    Long,

    /// A 32-bit float.
    Float,

    /// A 64-bit float.
    Double,

    /// An object reference.
    Ref,

    /// A value type.
    Struct,
}

impl Display for VerificationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Ref => "ref",
            Self::Struct => "struct",
        };
        f.pad(name)
    }
}

/// The facts about a single type on a particular target.
///
/// # Value Semantics
///
/// Descriptors are owned by a [`crate::TypeTraitTable`] and handed out by
/// shared reference. They are never modified once the table has been built.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TypeDescriptor {
    /// The identifier of the type being described.
    pub identifier: VarType,

    /// The name used for the type in diagnostics.
    pub display_name: &'static str,

    /// The type that a value of this type is widened to once it is loaded
    /// into a general computation context.
    pub canonical_type: VarType,

    /// The category used for the type during verification.
    pub verification_type: VerificationType,

    /// The size in bytes of a value of this type in memory, or zero if the
    /// type has no fixed layout.
    pub storage_size: u8,

    /// The size of the type as encoded by the instruction emitter.
    pub emit_size: EmitAttr,

    /// The size of the type as encoded by the instruction emitter once a
    /// value of it is held in a register.
    pub emit_actual_size: EmitAttr,

    /// The number of [`STACK_SLOT_SIZE`]-byte stack slots that a value of this
    /// type occupies.
    pub stack_slots: u8,

    /// The required alignment of the type in bytes.
    pub alignment: u8,

    /// The classification of the type.
    pub flags: TypeFlags,
}

impl TypeDescriptor {
    /// Returns `true` if the type has a fixed in-memory layout, and `false`
    /// if its sizes are only placeholders.
    #[must_use]
    pub fn has_layout(&self) -> bool {
        self.storage_size != 0
    }

    /// Gets the number of bytes that a value of this type occupies on the
    /// stack.
    #[must_use]
    pub fn stack_bytes(&self) -> usize {
        usize::from(self.stack_slots) * usize::from(STACK_SLOT_SIZE)
    }

    /// Returns `true` if the type is integral.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.flags.is_integral()
    }

    /// Returns `true` if the type is an unsigned integral type.
    #[must_use]
    pub fn is_unsigned(&self) -> bool {
        self.flags.is_unsigned()
    }

    /// Returns `true` if the type is floating-point.
    #[must_use]
    pub fn is_floating(&self) -> bool {
        self.flags.is_floating()
    }

    /// Returns `true` if the type must be reported to the garbage collector.
    #[must_use]
    pub fn is_gc_tracked(&self) -> bool {
        self.flags.is_gc_tracked()
    }

    /// Returns `true` if the type is a SIMD vector.
    #[must_use]
    pub fn is_vector(&self) -> bool {
        self.flags.is_vector()
    }

    /// Returns `true` if the type is an aggregate.
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        self.flags.is_aggregate()
    }
}

/// Prints the descriptor as a single row of the table.
impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<8} {:<8} {:<8} {:<6} {:>3} {:>9} {:>9} {:>3} {:>3}  {}",
            self.identifier.symbol(),
            self.display_name,
            self.canonical_type.symbol(),
            self.verification_type,
            self.storage_size,
            self.emit_size,
            self.emit_actual_size,
            self.stack_slots,
            self.alignment,
            self.flags
        )
    }
}
