//! Classification and coercion of foreign values to native scalars.
//!
//! Every coercion starts by assigning the input a [`Category`] from a
//! closed set of runtime shapes, then applies that category's
//! conversion rule. Container categories (boxed primitives, opaque
//! foreign objects) unwrap and re-classify; everything else converts
//! directly.

mod to_float;


pub use to_float::{to_float, FloatCallSite};

use crate::value::ForeignValue;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("no conversion rule for foreign value of kind {kind}")]
    UnsupportedInput { kind: &'static str },
    #[error("expected single-character text, got {len} characters")]
    InvalidTextLength { len: usize },
    #[error("failed to unwrap foreign value: {reason}")]
    UnwrapFailed { reason: String },
}

/// Runtime shape of a foreign value.
///
/// Classification follows the variant tag of [`ForeignValue`], so the
/// categories are disjoint by construction: a container wrapper is its
/// own representation and never shadows the terminal numeric shapes,
/// and the opaque-foreign fallback is a distinct variant rather than a
/// catch-all over the others. Integer and float widths are flattened
/// into per-width variants so a category fits the one-byte call-site
/// latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Category {
    Int8,
    Int16,
    Int32,
    Int64,
    Boolean,
    Character,
    SingleCharText,
    Float32,
    Float64,
    Function,
    Boxed,
    Address,
    Global,
    Foreign,
    Unrecognized,
}

impl Category {
    /// Classifies a foreign value. Total, pure, and O(1): one tag
    /// inspection, no recursion into containers.
    pub fn of(value: &ForeignValue) -> Category {
        match value {
            ForeignValue::I8(_) => Category::Int8,
            ForeignValue::I16(_) => Category::Int16,
            ForeignValue::I32(_) => Category::Int32,
            ForeignValue::I64(_) => Category::Int64,
            ForeignValue::Bool(_) => Category::Boolean,
            ForeignValue::Char(_) => Category::Character,
            ForeignValue::Text(_) => Category::SingleCharText,
            ForeignValue::F32(_) => Category::Float32,
            ForeignValue::F64(_) => Category::Float64,
            ForeignValue::Function(_) => Category::Function,
            ForeignValue::Boxed(_) => Category::Boxed,
            ForeignValue::Address(_) => Category::Address,
            ForeignValue::Global(_) => Category::Global,
            ForeignValue::Foreign(_) => Category::Foreign,
            ForeignValue::Unit => Category::Unrecognized,
        }
    }

    pub(crate) fn from_latch(raw: u8) -> Option<Category> {
        Some(match raw {
            0 => Category::Int8,
            1 => Category::Int16,
            2 => Category::Int32,
            3 => Category::Int64,
            4 => Category::Boolean,
            5 => Category::Character,
            6 => Category::SingleCharText,
            7 => Category::Float32,
            8 => Category::Float64,
            9 => Category::Function,
            10 => Category::Boxed,
            11 => Category::Address,
            12 => Category::Global,
            13 => Category::Foreign,
            14 => Category::Unrecognized,
            _ => return None,
        })
    }
}

/// Validates and extracts the sole character of a length-one text.
pub fn single_char_code(text: &str) -> Result<u32, ConvertError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as u32),
        _ => Err(ConvertError::InvalidTextLength {
            len: text.chars().count(),
        }),
    }
}
