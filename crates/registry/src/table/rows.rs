//! The rows of the type trait table, as established for a given target.
//!
//! Each row gives, in order: the identifier, the canonical type, the
//! verification type, the storage size, the stack slot count, the alignment,
//! and the flags. The emitter sizes are derived from the storage size, and
//! only differ from it by the collector tag on the reference types.

use crate::{
    constant::{
        INT_32_SIZE,
        INT_64_SIZE,
        PLACEHOLDER_ALIGNMENT,
        SIMD_12_LAYOUT,
        SIMD_16_LAYOUT,
        SIMD_32_LAYOUT,
        SIMD_8_LAYOUT,
        STACK_SLOT_SIZE,
    },
    descriptor::{TypeDescriptor, VerificationType as Ver},
    emit::EmitAttr,
    flags::TypeFlags as F,
    target::{TargetConfig, WordSize},
    var_type::VarType as T,
};

/// Builds the rows of the table for `config`, in identifier order.
///
/// Vector rows are only produced when the target enables vectors, and the
/// 32-byte vector row only when the target has 32-byte vector registers.
#[must_use]
pub fn build(config: &TargetConfig) -> Vec<TypeDescriptor> {
    let ptr = config.word_size().bytes();
    let ptr_slots = ptr / STACK_SLOT_SIZE;

    // Only one of the two explicitly-sized integer categories is as wide as a
    // native integer.
    let (native_32, native_64) = match config.word_size() {
        WordSize::Bits32 => (F::NATIVE_INT, F::empty()),
        WordSize::Bits64 => (F::empty(), F::NATIVE_INT),
    };

    let int = F::INTEGER;
    let uint = F::INTEGER | F::UNSIGNED;

    let mut rows = vec![
        row(T::Undef, T::Undef, Ver::Error, 0, 0, 0, F::empty()),
        row(T::Void, T::Void, Ver::Error, 0, 0, 0, F::empty()),
        row(T::Bool, T::Int, Ver::Byte, 1, 1, 1, uint),
        row(T::Byte, T::Int, Ver::Byte, 1, 1, 1, int),
        row(T::UByte, T::Int, Ver::Byte, 1, 1, 1, uint),
        row(T::Short, T::Int, Ver::Short, 2, 1, 2, int),
        row(T::UShort, T::Int, Ver::Short, 2, 1, 2, uint),
        row(T::Int, T::Int, Ver::Int, INT_32_SIZE, 1, 4, int | native_32),
        row(T::UInt, T::Int, Ver::Int, INT_32_SIZE, 1, 4, uint | native_32),
        row(T::Long, T::Long, Ver::Long, INT_64_SIZE, 2, 8, int | native_64),
        row(T::ULong, T::Long, Ver::Long, INT_64_SIZE, 2, 8, uint | native_64),
        row(T::Float, T::Float, Ver::Float, 4, 1, 4, F::FLOATING),
        row(T::Double, T::Double, Ver::Double, 8, 2, 8, F::FLOATING),
        gc_row(T::Ref, Ver::Ref, EmitAttr::gc_ref(ptr), ptr_slots, F::GC_REFERENCE),
        gc_row(T::ByRef, Ver::Error, EmitAttr::by_ref(ptr), ptr_slots, F::BY_REFERENCE),
        row(T::Struct, T::Struct, Ver::Struct, 0, 1, PLACEHOLDER_ALIGNMENT, F::STRUCT_LIKE),
        row(T::Blk, T::Blk, Ver::Error, 0, 1, PLACEHOLDER_ALIGNMENT, F::empty()),
        row(T::LclBlk, T::LclBlk, Ver::Error, 0, 1, PLACEHOLDER_ALIGNMENT, F::empty()),
    ];

    if config.vectors() {
        rows.push(vector_row(T::Simd8, SIMD_8_LAYOUT));
        rows.push(vector_row(T::Simd12, SIMD_12_LAYOUT));
        rows.push(vector_row(T::Simd16, SIMD_16_LAYOUT));
        if config.wide_vectors() {
            rows.push(vector_row(T::Simd32, SIMD_32_LAYOUT));
        }
    }

    rows.push(row(T::Unknown, T::Unknown, Ver::Error, 0, 0, 0, F::empty()));

    rows
}

/// Builds a row for a type that is not tracked by the garbage collector.
fn row(
    identifier: T,
    canonical_type: T,
    verification_type: Ver,
    storage_size: u8,
    stack_slots: u8,
    alignment: u8,
    flags: F,
) -> TypeDescriptor {
    TypeDescriptor {
        identifier,
        display_name: identifier.display_name(),
        canonical_type,
        verification_type,
        storage_size,
        emit_size: EmitAttr::plain(storage_size),
        emit_actual_size: EmitAttr::plain(storage_size),
        stack_slots,
        alignment,
        flags,
    }
}

/// Builds a row for one of the pointer-sized types that the garbage collector
/// tracks, which are their own canonical type.
fn gc_row(
    identifier: T,
    verification_type: Ver,
    emit: EmitAttr,
    stack_slots: u8,
    flags: F,
) -> TypeDescriptor {
    TypeDescriptor {
        identifier,
        display_name: identifier.display_name(),
        canonical_type: identifier,
        verification_type,
        storage_size: emit.size(),
        emit_size: emit,
        emit_actual_size: emit,
        stack_slots,
        alignment: emit.size(),
        flags,
    }
}

/// Builds a row for a vector type from its `(size, slots, alignment)` layout.
fn vector_row(identifier: T, (size, slots, alignment): (u8, u8, u8)) -> TypeDescriptor {
    row(
        identifier,
        identifier,
        Ver::Struct,
        size,
        slots,
        alignment,
        F::STRUCT_LIKE | F::VECTOR,
    )
}
