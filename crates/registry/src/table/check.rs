//! Verification of the rows produced for a target before they are published
//! as a table.
//!
//! Every downstream phase trusts the table without question, so a row that
//! breaks one of these rules would silently corrupt stack frames or collector
//! reporting. The rules are therefore checked every time a table is built.

use tyreg_errors::registry::{Error, Result};

use crate::{
    constant::BYTE_SIZE,
    descriptor::TypeDescriptor,
    emit::{EmitAttr, GcKind},
    flags::TypeFlags,
    target::TargetConfig,
    var_type::VarType,
};

/// Checks that `rows` form a valid table for `config`.
///
/// # Errors
///
/// - [`Error::InconsistentTable`] naming the first offending row and the rule
///   that it breaks.
pub fn verify(config: &TargetConfig, rows: &[TypeDescriptor]) -> Result<()> {
    check_order(rows)?;
    check_coverage(config, rows)?;

    for row in rows {
        check_layout(row)?;
        check_flags(config, row)?;
        check_emit_sizes(row)?;
        check_canonical(rows, row)?;
    }

    Ok(())
}

/// Constructs the error for `ty` breaking the rule described by `message`.
fn inconsistent(ty: VarType, message: impl Into<String>) -> Error {
    Error::InconsistentTable(ty.symbol().to_string(), message.into())
}

/// Identifiers must be unique and appear in identifier order.
fn check_order(rows: &[TypeDescriptor]) -> Result<()> {
    for pair in rows.windows(2) {
        if pair[0].identifier >= pair[1].identifier {
            Err(inconsistent(
                pair[1].identifier,
                format!("appears after {}", pair[0].identifier.symbol()),
            ))?;
        }
    }

    Ok(())
}

/// Every identifier must have a row, except for vector identifiers which must
/// have a row exactly when the target provides them.
fn check_coverage(config: &TargetConfig, rows: &[TypeDescriptor]) -> Result<()> {
    for ty in VarType::ALL {
        let expected = if ty.is_wide_vector_identifier() {
            config.wide_vectors()
        } else if ty.is_vector_identifier() {
            config.vectors()
        } else {
            true
        };
        let present = rows.iter().any(|r| r.identifier == ty);

        match (expected, present) {
            (true, false) => Err(inconsistent(ty, "is missing from the table"))?,
            (false, true) => Err(inconsistent(ty, "is not available on this target"))?,
            _ => (),
        }
    }

    Ok(())
}

/// Only the designated placeholder types may lack a layout, and their stack
/// slot count is only ever a placeholder.
fn check_layout(row: &TypeDescriptor) -> Result<()> {
    let ty = row.identifier;
    if row.display_name != ty.display_name() {
        Err(inconsistent(ty, format!("is named `{}`", row.display_name)))?;
    }
    if row.has_layout() == ty.is_layout_placeholder() {
        Err(inconsistent(
            ty,
            format!("has a storage size of {}", row.storage_size),
        ))?;
    }
    if !row.has_layout() && row.stack_slots > 1 {
        Err(inconsistent(
            ty,
            format!("has no layout but {} stack slots", row.stack_slots),
        ))?;
    }

    Ok(())
}

/// Flags must only be combined in meaningful ways.
fn check_flags(config: &TargetConfig, row: &TypeDescriptor) -> Result<()> {
    let ty = row.identifier;
    let flags = row.flags;

    if flags.is_gc_tracked() && flags.intersects(TypeFlags::VALUE_CATEGORY) {
        Err(inconsistent(ty, format!("combines {flags}")))?;
    }
    if flags.contains(TypeFlags::GC_TRACKED) {
        Err(inconsistent(ty, "is both a reference and an interior pointer"))?;
    }
    if flags.contains(TypeFlags::UNSIGNED) && !flags.is_integral() {
        Err(inconsistent(ty, "is unsigned without being integral"))?;
    }
    if flags.is_vector() != ty.is_vector_identifier() {
        Err(inconsistent(ty, format!("has flags {flags}")))?;
    }
    if flags.is_native_int() && !flags.is_integral() {
        Err(inconsistent(ty, "is native-width without being integral"))?;
    }
    let storage_bits = u32::from(row.storage_size) * BYTE_SIZE;
    if flags.is_native_int() && storage_bits != config.word_size().bits() {
        Err(inconsistent(
            ty,
            format!(
                "is native-width but {} bytes wide on a {}-bit target",
                row.storage_size,
                config.word_size().bits()
            ),
        ))?;
    }

    Ok(())
}

/// The emitter sizes match the storage size, except that the collector-tracked
/// types carry the matching collector tag.
fn check_emit_sizes(row: &TypeDescriptor) -> Result<()> {
    let ty = row.identifier;
    let expected = if row.flags.is_gc_reference() {
        EmitAttr::gc_ref(row.storage_size)
    } else if row.flags.is_by_reference() {
        EmitAttr::by_ref(row.storage_size)
    } else {
        EmitAttr::plain(row.storage_size)
    };

    for (what, actual) in [
        ("emitter size", row.emit_size),
        ("actual emitter size", row.emit_actual_size),
    ] {
        if actual != expected {
            Err(inconsistent(
                ty,
                format!("has {what} {actual} but should have {expected}"),
            ))?;
        }
    }

    // The tag must only ever appear on the collector-tracked types.
    if row.emit_size.gc_kind() != GcKind::None && !row.is_gc_tracked() {
        Err(inconsistent(ty, "has a collector tag but is not tracked"))?;
    }

    Ok(())
}

/// Canonicalization must land on a row that is its own canonical type.
fn check_canonical(rows: &[TypeDescriptor], row: &TypeDescriptor) -> Result<()> {
    let ty = row.identifier;
    let Some(target) = rows.iter().find(|r| r.identifier == row.canonical_type) else {
        return Err(inconsistent(
            ty,
            format!("canonicalizes to missing type {}", row.canonical_type.symbol()),
        ));
    };
    if target.canonical_type != target.identifier {
        Err(inconsistent(
            ty,
            format!(
                "canonicalizes to {} which is not canonical",
                target.identifier.symbol()
            ),
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use tyreg_errors::registry::Error;

    use crate::{
        emit::EmitAttr,
        flags::TypeFlags,
        table::{check::verify, rows},
        target::{Architecture, TargetConfig},
        var_type::VarType,
    };

    /// Gets the rows for the default target along with the target itself.
    fn default_rows() -> (TargetConfig, Vec<crate::TypeDescriptor>) {
        let config = TargetConfig::default();
        (config, rows::build(&config))
    }

    /// Gets a mutable reference to the row for `ty`.
    fn row_mut(rows: &mut [crate::TypeDescriptor], ty: VarType) -> &mut crate::TypeDescriptor {
        rows.iter_mut()
            .find(|r| r.identifier == ty)
            .expect("Row was missing from the table")
    }

    #[test]
    fn accepts_rows_for_every_target() -> anyhow::Result<()> {
        for arch in [
            Architecture::X86,
            Architecture::X64,
            Architecture::Arm,
            Architecture::Arm64,
            Architecture::LoongArch64,
            Architecture::RiscV64,
        ] {
            let config = TargetConfig::for_architecture(arch);
            verify(&config, &rows::build(&config))?;
        }

        Ok(())
    }

    #[test]
    fn rejects_out_of_order_rows() {
        let (config, mut rows) = default_rows();
        rows.swap(2, 3);

        assert!(matches!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(ty, _)) if ty == "BOOL"
        ));
    }

    #[test]
    fn rejects_vectors_on_targets_without_them() -> anyhow::Result<()> {
        let config = TargetConfig::new(Architecture::X64, 64, false)?;
        let rows = rows::build(&TargetConfig::default());

        assert_eq!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(
                "SIMD8".to_string(),
                "is not available on this target".to_string()
            ))
        );

        Ok(())
    }

    #[test]
    fn rejects_gc_references_with_value_flags() {
        let (config, mut rows) = default_rows();
        row_mut(&mut rows, VarType::Ref).flags |= TypeFlags::INTEGER;

        assert!(matches!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(ty, _)) if ty == "REF"
        ));
    }

    #[test]
    fn rejects_untagged_reference_emit_sizes() {
        let (config, mut rows) = default_rows();
        row_mut(&mut rows, VarType::ByRef).emit_actual_size = EmitAttr::plain(8);

        assert_eq!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(
                "BYREF".to_string(),
                "has actual emitter size 8 but should have byref(8)".to_string()
            ))
        );
    }

    #[test]
    fn rejects_sizes_on_placeholders() {
        let (config, mut rows) = default_rows();
        row_mut(&mut rows, VarType::Void).stack_slots = 2;

        assert_eq!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(
                "VOID".to_string(),
                "has no layout but 2 stack slots".to_string()
            ))
        );
    }

    #[test]
    fn rejects_non_canonical_canonical_types() {
        let (config, mut rows) = default_rows();
        row_mut(&mut rows, VarType::Bool).canonical_type = VarType::Byte;

        assert_eq!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(
                "BOOL".to_string(),
                "canonicalizes to BYTE which is not canonical".to_string()
            ))
        );
    }

    #[test]
    fn rejects_misplaced_native_width_flags() {
        let (config, mut rows) = default_rows();
        row_mut(&mut rows, VarType::Int).flags |= TypeFlags::NATIVE_INT;

        assert_eq!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(
                "INT".to_string(),
                "is native-width but 4 bytes wide on a 64-bit target".to_string()
            ))
        );
    }

    #[test]
    fn rejects_missing_rows() {
        let (config, mut rows) = default_rows();
        rows.retain(|r| r.identifier != VarType::Float);

        assert_eq!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(
                "FLOAT".to_string(),
                "is missing from the table".to_string()
            ))
        );
    }

    #[test]
    fn rejects_references_that_are_also_interior_pointers() {
        let (config, mut rows) = default_rows();
        row_mut(&mut rows, VarType::Ref).flags |= TypeFlags::BY_REFERENCE;

        assert_eq!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(
                "REF".to_string(),
                "is both a reference and an interior pointer".to_string()
            ))
        );
    }

    #[test]
    fn rejects_unsigned_non_integers() {
        let (config, mut rows) = default_rows();
        row_mut(&mut rows, VarType::Double).flags |= TypeFlags::UNSIGNED;

        assert_eq!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(
                "DOUBLE".to_string(),
                "is unsigned without being integral".to_string()
            ))
        );
    }

    #[test]
    fn rejects_vector_flags_on_the_wrong_identifiers() {
        let (config, mut rows) = default_rows();
        row_mut(&mut rows, VarType::Simd16).flags.remove(TypeFlags::VECTOR);

        assert!(matches!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(ty, _)) if ty == "SIMD16"
        ));

        let (config, mut rows) = default_rows();
        row_mut(&mut rows, VarType::Struct).flags |= TypeFlags::VECTOR;

        assert!(matches!(
            verify(&config, &rows),
            Err(Error::InconsistentTable(ty, _)) if ty == "STRUCT"
        ));
    }
}
