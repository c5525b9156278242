//! Useful constants for use within the registry.

/// The size in bytes of a single machine stack slot.
///
/// Stack slots are counted in units of a native `int`, regardless of the
/// target's word size, so a pointer occupies two slots on a 64-bit target.
pub const STACK_SLOT_SIZE: u8 = 4;

/// The size of a byte in bits.
pub const BYTE_SIZE: u32 = 8;

/// The storage size in bytes of the literal 32-bit integer category.
pub const INT_32_SIZE: u8 = 4;

/// The storage size in bytes of the literal 64-bit integer category.
pub const INT_64_SIZE: u8 = 8;

/// The alignment used by the layout placeholders for aggregates and opaque
/// blocks of memory.
pub const PLACEHOLDER_ALIGNMENT: u8 = 4;

/// The layout of the 8-byte vector type.
///
/// The numbers are, in order: the logical size, the stack slot count, and the
/// alignment.
pub const SIMD_8_LAYOUT: (u8, u8, u8) = (8, 2, 8);

/// The layout of the 12-byte vector type.
///
/// It is padded out to 16 bytes on the stack and aligned as though it were a
/// full 16-byte vector. See [`SIMD_8_LAYOUT`] for the meaning of the fields.
pub const SIMD_12_LAYOUT: (u8, u8, u8) = (12, 4, 16);

/// See [`SIMD_8_LAYOUT`].
pub const SIMD_16_LAYOUT: (u8, u8, u8) = (16, 4, 16);

/// See [`SIMD_8_LAYOUT`].
///
/// Note that the 32-byte vector is only aligned to 16 bytes, as the stack is
/// not guaranteed to be aligned any further than that.
pub const SIMD_32_LAYOUT: (u8, u8, u8) = (32, 8, 16);
