//! The [`TypeTraitTable`] itself, and the queries that the rest of the
//! compiler makes against it.
//!
//! A table is built once for a target and is immutable from then on, so it
//! can be shared freely between compilation threads. Where the target is
//! fixed for the lifetime of the process, [`TypeTraitTable::install`]
//! publishes a single table behind a one-time initialization barrier.

pub mod check;
pub mod rows;

use std::sync::OnceLock;

use tracing::{debug, trace};
use tyreg_errors::registry::{Error, Result};

use crate::{
    constant::BYTE_SIZE,
    descriptor::{TypeDescriptor, VerificationType},
    emit::EmitAttr,
    target::TargetConfig,
    var_type::VarType,
};

/// The process-wide table, if one has been installed.
static INSTALLED: OnceLock<TypeTraitTable> = OnceLock::new();

/// The single source of truth for the low-level facts about every value type
/// the compiler backend can represent on a given target.
///
/// # Failure Modes
///
/// Building a table can fail if the rows produced for the target are
/// inconsistent. Querying a table cannot fail for any identifier that the
/// target supports. Asking about an identifier that the target does not
/// support (such as a vector type when vectors are disabled) means that the
/// caller holds IR that could not have been produced for this target, and so
/// the query panics rather than guess.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeTraitTable {
    /// The target that the table describes.
    config: TargetConfig,

    /// The descriptors, indexed by [`VarType::index`].
    entries: [Option<TypeDescriptor>; VarType::COUNT],
}

/// Construction and publication.
impl TypeTraitTable {
    /// Builds the table of type traits for the target described by `config`.
    ///
    /// # Errors
    ///
    /// - [`Error::InconsistentTable`] if the rows for the target break any of
    ///   the table's invariants.
    pub fn new(config: TargetConfig) -> Result<Self> {
        debug!(config = %config, "Building type trait table");

        let rows = rows::build(&config);
        check::verify(&config, &rows)?;

        let mut entries: [Option<TypeDescriptor>; VarType::COUNT] =
            std::array::from_fn(|_| None);
        for row in rows {
            trace!(ty = row.identifier.symbol(), "Adding type trait entry");
            let index = row.identifier.index();
            entries[index] = Some(row);
        }

        Ok(Self { config, entries })
    }

    /// Builds the table for `config` and publishes it process-wide, returning
    /// the published table.
    ///
    /// Installing is idempotent for the same target, so that every phase can
    /// call this with the configuration it was given.
    ///
    /// # Errors
    ///
    /// - [`Error::TableAlreadyInstalled`] if a table for a different target
    ///   has already been installed.
    /// - Any error returned by [`Self::new`].
    pub fn install(config: TargetConfig) -> Result<&'static Self> {
        let installed = match INSTALLED.get() {
            Some(table) => table,
            None => {
                let table = Self::new(config)?;
                INSTALLED.get_or_init(|| table)
            }
        };

        if installed.config != config {
            Err(Error::TableAlreadyInstalled(
                installed.config.to_string(),
                config.to_string(),
            ))?;
        }

        Ok(installed)
    }

    /// Gets the table that was published by [`Self::install`].
    ///
    /// # Panics
    ///
    /// If no table has been installed, as no query can be answered before the
    /// target is known.
    #[must_use]
    pub fn global() -> &'static Self {
        INSTALLED
            .get()
            .expect("Internal consistency failure: no type trait table has been installed")
    }

    /// Gets the published table, if one has been installed.
    #[must_use]
    pub fn try_global() -> Option<&'static Self> {
        INSTALLED.get()
    }
}

/// Lookups.
impl TypeTraitTable {
    /// Gets the target that this table describes.
    #[must_use]
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Returns `true` if the table has an entry for `ty` on this target, and
    /// `false` otherwise.
    #[must_use]
    pub fn contains(&self, ty: VarType) -> bool {
        self.entries[ty.index()].is_some()
    }

    /// Gets the descriptor for `ty` if this target supports it.
    ///
    /// This is intended for tooling that inspects tables. Compiler phases
    /// should use [`Self::descriptor_of`].
    #[must_use]
    pub fn try_descriptor_of(&self, ty: VarType) -> Option<&TypeDescriptor> {
        self.entries[ty.index()].as_ref()
    }

    /// Gets the descriptor for `ty`.
    ///
    /// # Panics
    ///
    /// If this target has no entry for `ty`.
    #[must_use]
    pub fn descriptor_of(&self, ty: VarType) -> &TypeDescriptor {
        self.try_descriptor_of(ty).unwrap_or_else(|| {
            panic!(
                "Internal consistency failure: {} has no entry on target {}",
                ty.symbol(),
                self.config
            )
        })
    }

    /// Gets the descriptor for the type with the persisted identifier `raw`.
    ///
    /// # Panics
    ///
    /// If `raw` is not a valid identifier, or if this target has no entry for
    /// it.
    #[must_use]
    pub fn descriptor_of_raw(&self, raw: u8) -> &TypeDescriptor {
        self.descriptor_of(VarType::from_raw(raw))
    }

    /// Iterates over the descriptors present on this target, in identifier
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries.iter().flatten()
    }

    /// Gets the width in bits of a native integer on this target.
    ///
    /// This is the width of every entry flagged as native-width.
    #[must_use]
    pub fn native_integer_width(&self) -> u32 {
        self.config.word_size().bits()
    }
}

/// Projections of single attributes.
///
/// All of these panic under the same conditions as
/// [`TypeTraitTable::descriptor_of`].
impl TypeTraitTable {
    /// Gets the type that `ty` is widened to once loaded for computation.
    ///
    /// This is idempotent, so canonicalizing a canonical type is a no-op.
    #[must_use]
    pub fn canonical_type_of(&self, ty: VarType) -> VarType {
        self.descriptor_of(ty).canonical_type
    }

    /// Gets the category used to verify `ty`.
    #[must_use]
    pub fn verification_type_of(&self, ty: VarType) -> VerificationType {
        self.descriptor_of(ty).verification_type
    }

    /// Gets the name used for `ty` in diagnostics.
    #[must_use]
    pub fn display_name_of(&self, ty: VarType) -> &'static str {
        self.descriptor_of(ty).display_name
    }

    /// Gets the size in bytes of `ty` in memory.
    #[must_use]
    pub fn storage_size_of(&self, ty: VarType) -> u8 {
        self.descriptor_of(ty).storage_size
    }

    /// Gets the size of `ty` as the instruction emitter encodes it.
    #[must_use]
    pub fn emission_size_of(&self, ty: VarType) -> EmitAttr {
        self.descriptor_of(ty).emit_size
    }

    /// Gets the size of `ty` as the instruction emitter encodes it once it has
    /// been loaded into a register.
    #[must_use]
    pub fn emission_actual_size_of(&self, ty: VarType) -> EmitAttr {
        self.descriptor_of(ty).emit_actual_size
    }

    /// Gets the number of stack slots occupied by `ty`.
    #[must_use]
    pub fn stack_slot_count_of(&self, ty: VarType) -> u8 {
        self.descriptor_of(ty).stack_slots
    }

    /// Gets the number of bytes of stack occupied by `ty`.
    #[must_use]
    pub fn stack_bytes_of(&self, ty: VarType) -> usize {
        self.descriptor_of(ty).stack_bytes()
    }

    /// Gets the required alignment of `ty` in bytes.
    #[must_use]
    pub fn alignment_of(&self, ty: VarType) -> u8 {
        self.descriptor_of(ty).alignment
    }

    /// Gets the width in bits of `ty` if it is integral, and [`None`]
    /// otherwise.
    #[must_use]
    pub fn integer_width_of(&self, ty: VarType) -> Option<u32> {
        let descriptor = self.descriptor_of(ty);
        descriptor
            .is_integral()
            .then(|| u32::from(descriptor.storage_size) * BYTE_SIZE)
    }
}

/// Classification.
///
/// All of these panic under the same conditions as
/// [`TypeTraitTable::descriptor_of`].
impl TypeTraitTable {
    /// Returns `true` if `ty` is integral.
    #[must_use]
    pub fn is_integral(&self, ty: VarType) -> bool {
        self.descriptor_of(ty).is_integral()
    }

    /// Returns `true` if `ty` is an unsigned integral type.
    #[must_use]
    pub fn is_unsigned(&self, ty: VarType) -> bool {
        self.descriptor_of(ty).is_unsigned()
    }

    /// Returns `true` if `ty` is floating-point.
    #[must_use]
    pub fn is_floating(&self, ty: VarType) -> bool {
        self.descriptor_of(ty).is_floating()
    }

    /// Returns `true` if values of `ty` must be reported to the garbage
    /// collector, whether as object references or as interior pointers.
    #[must_use]
    pub fn is_gc_tracked(&self, ty: VarType) -> bool {
        self.descriptor_of(ty).is_gc_tracked()
    }

    /// Returns `true` if `ty` is a SIMD vector.
    #[must_use]
    pub fn is_vector(&self, ty: VarType) -> bool {
        self.descriptor_of(ty).is_vector()
    }

    /// Returns `true` if `ty` is an aggregate.
    #[must_use]
    pub fn is_aggregate(&self, ty: VarType) -> bool {
        self.descriptor_of(ty).is_aggregate()
    }

    /// Returns `true` if `ty` is integral or tracked by the garbage collector,
    /// and hence can be held in a general-purpose register.
    #[must_use]
    pub fn is_integral_or_gc(&self, ty: VarType) -> bool {
        let descriptor = self.descriptor_of(ty);
        descriptor.is_integral() || descriptor.is_gc_tracked()
    }

    /// Returns `true` if `ty` is an integral type narrower than the 32-bit
    /// integer category, and so only exists in memory.
    #[must_use]
    pub fn is_small_int(&self, ty: VarType) -> bool {
        let descriptor = self.descriptor_of(ty);
        descriptor.is_integral() && descriptor.storage_size < self.storage_size_of(VarType::Int)
    }
}

impl<'a> IntoIterator for &'a TypeTraitTable {
    type IntoIter = std::iter::Flatten<std::slice::Iter<'a, Option<TypeDescriptor>>>;
    type Item = &'a TypeDescriptor;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().flatten()
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use tyreg_errors::registry::Error;

    use crate::{
        emit::EmitAttr,
        flags::TypeFlags,
        table::TypeTraitTable,
        target::{Architecture, TargetConfig},
        var_type::VarType,
    };

    /// Every configuration in the supported target matrix.
    fn all_configs() -> Vec<TargetConfig> {
        let mut configs = Vec::new();
        for arch in [
            Architecture::X86,
            Architecture::X64,
            Architecture::Arm,
            Architecture::Arm64,
            Architecture::LoongArch64,
            Architecture::RiscV64,
        ] {
            let bits = arch.word_size().bits() as usize;
            configs.push(TargetConfig::new(arch, bits, false).expect("Valid configuration"));
            if arch.supports_vectors() {
                configs.push(TargetConfig::new(arch, bits, true).expect("Valid configuration"));
            }
        }
        configs
    }

    /// Every table in the supported target matrix.
    fn all_tables() -> anyhow::Result<Vec<TypeTraitTable>> {
        Ok(all_configs()
            .into_iter()
            .map(TypeTraitTable::new)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[test]
    fn describes_scalars_on_a_64_bit_vector_target() -> anyhow::Result<()> {
        let table = TypeTraitTable::new(TargetConfig::parse("a:x64-p64-v")?)?;

        let int = table.descriptor_of(VarType::Int);
        assert_eq!(int.storage_size, 4);
        assert_eq!(int.emit_size, EmitAttr::plain(4));
        assert_eq!(int.stack_slots, 1);
        assert_eq!(int.alignment, 4);
        assert_eq!(int.flags, TypeFlags::INTEGER);

        let reference = table.descriptor_of(VarType::Ref);
        assert_eq!(reference.storage_size, 8);
        assert_eq!(reference.emit_size, EmitAttr::gc_ref(8));
        assert_eq!(reference.emit_size.size(), 8);
        assert_eq!(reference.stack_slots, 2);
        assert_eq!(reference.alignment, 8);
        assert_eq!(reference.flags, TypeFlags::GC_REFERENCE);

        assert_eq!(table.storage_size_of(VarType::Bool), 1);
        assert_eq!(
            table.canonical_type_of(VarType::Bool),
            table.canonical_type_of(VarType::Int)
        );
        assert_eq!(table.native_integer_width(), 64);

        Ok(())
    }

    #[test]
    fn describes_references_on_a_32_bit_target() -> anyhow::Result<()> {
        let table = TypeTraitTable::new(TargetConfig::parse("a:x86-p32")?)?;

        assert_eq!(table.storage_size_of(VarType::Ref), 4);
        assert_eq!(table.stack_slot_count_of(VarType::Ref), 1);
        assert_eq!(table.emission_size_of(VarType::ByRef), EmitAttr::by_ref(4));
        assert_eq!(table.alignment_of(VarType::ByRef), 4);
        assert_eq!(table.native_integer_width(), 32);

        // The native-width category is the 32-bit integer here.
        assert!(table.descriptor_of(VarType::Int).flags.is_native_int());
        assert!(!table.descriptor_of(VarType::Long).flags.is_native_int());

        Ok(())
    }

    #[test]
    fn placeholders_have_no_layout() -> anyhow::Result<()> {
        for table in all_tables()? {
            for desc in &table {
                if desc.storage_size == 0 {
                    assert!(desc.stack_slots <= 1, "{}", desc.identifier);
                    assert!(desc.identifier.is_layout_placeholder());
                }
            }
        }

        Ok(())
    }

    #[test]
    fn canonicalization_is_idempotent_onto_the_canonical_categories() -> anyhow::Result<()> {
        let canonical = [
            VarType::Undef,
            VarType::Void,
            VarType::Int,
            VarType::Long,
            VarType::Float,
            VarType::Double,
            VarType::Ref,
            VarType::ByRef,
            VarType::Struct,
            VarType::Blk,
            VarType::LclBlk,
            VarType::Simd8,
            VarType::Simd12,
            VarType::Simd16,
            VarType::Simd32,
            VarType::Unknown,
        ];

        for table in all_tables()? {
            let mut image = BTreeSet::new();
            for desc in &table {
                let once = table.canonical_type_of(desc.identifier);
                assert_eq!(table.canonical_type_of(once), once);
                image.insert(once);
            }

            let expected = canonical
                .into_iter()
                .filter(|ty| table.contains(*ty))
                .collect::<BTreeSet<_>>();
            assert_eq!(image, expected);
        }

        Ok(())
    }

    #[test]
    fn narrow_integers_canonicalize_to_two_categories() -> anyhow::Result<()> {
        let table = TypeTraitTable::new(TargetConfig::default())?;

        for ty in [
            VarType::Bool,
            VarType::Byte,
            VarType::UByte,
            VarType::Short,
            VarType::UShort,
            VarType::Int,
            VarType::UInt,
        ] {
            assert_eq!(table.canonical_type_of(ty), VarType::Int);
        }
        assert_eq!(table.canonical_type_of(VarType::Long), VarType::Long);
        assert_eq!(table.canonical_type_of(VarType::ULong), VarType::Long);

        Ok(())
    }

    #[test]
    fn gc_flags_are_exclusive_with_value_flags() -> anyhow::Result<()> {
        let value_flags = [
            TypeFlags::INTEGER,
            TypeFlags::FLOATING,
            TypeFlags::STRUCT_LIKE,
            TypeFlags::VECTOR,
        ];

        for table in all_tables()? {
            for desc in &table {
                if desc.is_gc_tracked() {
                    for flag in value_flags {
                        assert!(!desc.flags.contains(flag), "{}", desc.identifier);
                    }
                }
            }
        }

        Ok(())
    }

    #[test]
    fn emission_sizes_only_differ_for_gc_tracked_types() -> anyhow::Result<()> {
        for table in all_tables()? {
            for desc in &table {
                let ty = desc.identifier;
                let plain = EmitAttr::plain(desc.storage_size);
                let differs = table.emission_size_of(ty) != plain;
                let actual_differs = table.emission_actual_size_of(ty) != plain;

                assert_eq!(differs, table.is_gc_tracked(ty), "{ty}");
                assert_eq!(actual_differs, table.is_gc_tracked(ty), "{ty}");
            }
        }

        Ok(())
    }

    #[test]
    fn native_width_follows_the_word_size() -> anyhow::Result<()> {
        for table in all_tables()? {
            let width = table.native_integer_width();
            assert_eq!(width, table.config().word_size().bits());

            for desc in table.iter().filter(|d| d.flags.is_native_int()) {
                assert_eq!(table.integer_width_of(desc.identifier), Some(width));
            }

            // The explicitly-sized categories keep their widths everywhere.
            assert_eq!(table.integer_width_of(VarType::Int), Some(32));
            assert_eq!(table.integer_width_of(VarType::UInt), Some(32));
            assert_eq!(table.integer_width_of(VarType::Long), Some(64));
            assert_eq!(table.integer_width_of(VarType::ULong), Some(64));
            assert_eq!(table.integer_width_of(VarType::Double), None);
        }

        Ok(())
    }

    #[test]
    fn vectors_are_absent_when_disabled() -> anyhow::Result<()> {
        for table in all_tables()? {
            let vectors = table.config().vectors();
            for ty in VarType::ALL.into_iter().filter(|ty| ty.is_vector_identifier()) {
                let expected = vectors
                    && (!ty.is_wide_vector_identifier() || table.config().wide_vectors());
                assert_eq!(table.contains(ty), expected, "{ty} on {}", table.config());
            }
            assert_eq!(table.iter().any(|d| d.is_vector()), vectors);
        }

        Ok(())
    }

    #[test]
    fn vectors_have_hardware_layouts() -> anyhow::Result<()> {
        let table = TypeTraitTable::new(TargetConfig::default())?;

        let simd12 = table.descriptor_of(VarType::Simd12);
        assert_eq!(simd12.storage_size, 12);
        assert_eq!(simd12.alignment, 16);
        assert_eq!(simd12.stack_bytes(), 16);
        assert!(simd12.is_vector() && simd12.is_aggregate());

        assert_eq!(table.stack_slot_count_of(VarType::Simd32), 8);
        assert_eq!(table.alignment_of(VarType::Simd32), 16);
        assert_eq!(table.alignment_of(VarType::Simd8), 8);

        // Only the x86 family has the 32-byte vector.
        let arm64 = TypeTraitTable::new(TargetConfig::for_architecture(Architecture::Arm64))?;
        assert!(arm64.contains(VarType::Simd16));
        assert!(!arm64.contains(VarType::Simd32));

        Ok(())
    }

    #[test]
    fn iterates_in_identifier_order() -> anyhow::Result<()> {
        let table = TypeTraitTable::new(TargetConfig::default())?;
        let ids = table.iter().map(|d| d.identifier).collect::<Vec<_>>();
        assert_eq!(ids, VarType::ALL.to_vec());

        let table = TypeTraitTable::new(TargetConfig::for_architecture(Architecture::Arm))?;
        assert_eq!(table.iter().count(), VarType::COUNT - 4);
        assert_eq!(table.iter().last().map(|d| d.identifier), Some(VarType::Unknown));

        Ok(())
    }

    #[test]
    fn derived_classifications() -> anyhow::Result<()> {
        let table = TypeTraitTable::new(TargetConfig::default())?;

        assert!(table.is_small_int(VarType::Bool));
        assert!(table.is_small_int(VarType::UShort));
        assert!(!table.is_small_int(VarType::Int));
        assert!(!table.is_small_int(VarType::Float));

        assert!(table.is_integral_or_gc(VarType::ByRef));
        assert!(table.is_integral_or_gc(VarType::Long));
        assert!(!table.is_integral_or_gc(VarType::Double));

        assert!(table.is_unsigned(VarType::Bool));
        assert!(!table.is_unsigned(VarType::Byte));
        assert!(table.is_floating(VarType::Float));
        assert!(table.is_aggregate(VarType::Struct));
        assert!(!table.is_aggregate(VarType::Blk));
        assert!(table.is_vector(VarType::Simd16));
        assert!(!table.is_integral(VarType::Ref));

        assert_eq!(table.stack_bytes_of(VarType::Ref), 8);
        assert_eq!(table.stack_bytes_of(VarType::Bool), 4);
        assert_eq!(table.display_name_of(VarType::LclBlk), "lclBlk");
        assert_eq!(
            table.verification_type_of(VarType::ByRef),
            crate::VerificationType::Error
        );
        assert_eq!(
            table.verification_type_of(VarType::UByte),
            crate::VerificationType::Byte
        );

        Ok(())
    }

    #[test]
    #[should_panic(expected = "SIMD16 has no entry on target a:x64-p64-nv")]
    fn absent_entries_are_fatal() {
        let config = TargetConfig::new(Architecture::X64, 64, false).expect("Valid configuration");
        let table = TypeTraitTable::new(config).expect("Valid table");
        let _ = table.descriptor_of(VarType::Simd16);
    }

    #[test]
    #[should_panic(expected = "99 is not a valid type identifier")]
    fn unknown_raw_identifiers_are_fatal() {
        let table = TypeTraitTable::new(TargetConfig::default()).expect("Valid table");
        let _ = table.descriptor_of_raw(99);
    }

    #[test]
    fn can_look_up_by_raw_identifier() -> anyhow::Result<()> {
        let table = TypeTraitTable::new(TargetConfig::default())?;
        assert_eq!(table.descriptor_of_raw(13).identifier, VarType::Ref);
        assert!(table.try_descriptor_of(VarType::Simd32).is_some());

        Ok(())
    }

    #[test]
    fn can_be_queried_from_many_threads() -> anyhow::Result<()> {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeTraitTable>();

        let table = TypeTraitTable::new(TargetConfig::default())?;
        std::thread::scope(|scope| {
            for ty in VarType::ALL {
                let table = &table;
                scope.spawn(move || {
                    assert_eq!(table.descriptor_of(ty).identifier, ty);
                });
            }
        });

        Ok(())
    }

    // This is the only test that touches the process-wide table, as the order
    // in which tests run is not fixed.
    #[test]
    fn can_install_a_process_wide_table() -> anyhow::Result<()> {
        let config = TargetConfig::default();

        let installed = TypeTraitTable::install(config)?;
        assert_eq!(installed.config(), &config);
        assert!(std::ptr::eq(installed, TypeTraitTable::global()));
        assert!(TypeTraitTable::try_global().is_some());

        // Installing the same target again hands back the same table.
        assert!(std::ptr::eq(TypeTraitTable::install(config)?, installed));

        // But a different target cannot replace it.
        let other = TargetConfig::for_architecture(Architecture::Arm);
        assert_eq!(
            TypeTraitTable::install(other),
            Err(Error::TableAlreadyInstalled(
                "a:x64-p64-v".to_string(),
                "a:arm-p32-nv".to_string()
            ))
        );

        Ok(())
    }
}
