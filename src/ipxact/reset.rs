use std::fmt::Display;

use super::{FieldDef, RegisterDef, ResetSpec};

/// Effective reset value of a field
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResolvedReset {
    Value(u128),
    /// No reset information covers the field bits
    NotApplicable,
}

impl ResolvedReset {
    pub fn value(&self) -> Option<u128> {
        match self {
            ResolvedReset::Value(v) => Some(*v),
            ResolvedReset::NotApplicable => None,
        }
    }
}

impl Display for ResolvedReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedReset::Value(v) => write!(f, "{v:#x}"),
            ResolvedReset::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Mask with the `width` LSB set
pub fn width_mask(width: u32) -> u128 {
    if width >= 128 {u128::MAX} else {(1_u128 << width) - 1}
}

/// Extract the bits [lsb+width-1:lsb] of a value
fn slice(value: u128, lsb: u32, width: u32) -> u128 {
    value.checked_shr(lsb).unwrap_or(0) & width_mask(width)
}

/// Reset value of a field, computed from the field reset if defined,
/// or from the slice of the register reset (filtered by the optional register mask)
pub fn resolve_reset(field: &FieldDef, reg: &RegisterDef) -> ResolvedReset {
    // Field level reset is already expressed at the field position: use it as is
    if let Some(rst) = &field.reset {
        log::debug!("{}.{}: field reset {:#x}", reg.name, field.name, rst.value);
        return ResolvedReset::Value(rst.value);
    }
    match &reg.reset {
        Some(rst) => resolve_from_register(rst, field.lsb(), field.width()),
        None => ResolvedReset::NotApplicable,
    }
}

fn resolve_from_register(rst: &ResetSpec, lsb: u32, width: u32) -> ResolvedReset {
    let candidate = slice(rst.value, lsb, width);
    match rst.mask {
        Some(mask) => {
            let field_mask = slice(mask, lsb, width);
            if field_mask == 0 {
                ResolvedReset::NotApplicable
            } else {
                ResolvedReset::Value(candidate & field_mask)
            }
        }
        None => ResolvedReset::Value(candidate),
    }
}
