//! This library implements the type trait registry for a compiler backend: the
//! single source of truth for the low-level facts about every primitive value
//! type that the backend can represent.
//!
//! Instruction selection, stack layout, calling-convention lowering, register
//! allocation, and garbage-collection reporting all query the registry rather
//! than hard-coding facts such as how large a type is, how many stack slots it
//! occupies, what alignment it requires, and whether the collector must track
//! it. A wrong answer here silently corrupts stack frames or collector
//! metadata, so the registry checks its own contents whenever it is built.
//!
//! # Process Overview
//!
//! 1. The host compiler describes its target as a [`TargetConfig`], either
//!    programmatically or by parsing a target description string.
//! 2. A [`TypeTraitTable`] is built for that target. The set of entries and
//!    their sizes depend on the word size and on whether vector types are
//!    enabled, and so each target gets its own immutable table.
//! 3. Every other phase queries the table by [`VarType`], either through a
//!    table it has been handed or through the process-wide table published by
//!    [`TypeTraitTable::install`].
//!
//! ```
//! use tyreg_registry::{TargetConfig, TypeTraitTable, VarType};
//!
//! let table = TypeTraitTable::new(TargetConfig::parse("a:x86-p32").unwrap()).unwrap();
//!
//! assert_eq!(table.storage_size_of(VarType::Ref), 4);
//! assert_eq!(table.canonical_type_of(VarType::Bool), VarType::Int);
//! assert!(table.is_gc_tracked(VarType::ByRef));
//! ```

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming
#![allow(clippy::multiple_crate_versions)] // Enforced by our dependencies

pub mod constant;
pub mod descriptor;
pub mod emit;
pub mod flags;
pub mod table;
pub mod target;
pub mod var_type;

pub use descriptor::{TypeDescriptor, VerificationType};
pub use emit::{EmitAttr, GcKind};
pub use flags::TypeFlags;
pub use table::TypeTraitTable;
pub use target::{Architecture, TargetConfig, WordSize};
pub use var_type::VarType;
