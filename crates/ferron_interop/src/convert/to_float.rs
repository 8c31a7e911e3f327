use std::sync::atomic::{AtomicU8, Ordering};

use super::{single_char_code, Category, ConvertError};
use crate::context::InteropContext;
use crate::value::ForeignValue;

/// Bound on nested container unwraps. A cyclic foreign object would
/// otherwise recurse forever; well-formed object models stay far below
/// this.
const MAX_UNWRAP_DEPTH: usize = 64;

/// Latch value meaning "no category committed yet".
const LATCH_EMPTY: u8 = u8::MAX;

fn trace_interop() -> bool {
    std::env::var("FERRON_TRACE_INTEROP").is_ok_and(|v| v == "1")
}

fn unsupported(value: &ForeignValue) -> ConvertError {
    ConvertError::UnsupportedInput {
        kind: value.kind_name(),
    }
}

/// Generic entry point: coerces a foreign value to `f32`.
///
/// Stateless; re-classifies on every call and recurses through itself
/// when unwrapping containers. Usable from any context, including
/// cold call sites with no specialization state.
pub fn to_float(ctx: &dyn InteropContext, value: &ForeignValue) -> Result<f32, ConvertError> {
    convert_at_depth(ctx, value, 0)
}

fn convert_at_depth(
    ctx: &dyn InteropContext,
    value: &ForeignValue,
    depth: usize,
) -> Result<f32, ConvertError> {
    if depth > MAX_UNWRAP_DEPTH {
        return Err(ConvertError::UnwrapFailed {
            reason: format!("container nesting exceeds {MAX_UNWRAP_DEPTH} levels"),
        });
    }
    match value {
        ForeignValue::I8(v) => Ok(f32::from(*v)),
        ForeignValue::I16(v) => Ok(f32::from(*v)),
        // Wide integers round to the nearest representable f32; the
        // precision loss is accepted, not an error.
        ForeignValue::I32(v) => Ok(*v as f32),
        ForeignValue::I64(v) => Ok(*v as f32),
        ForeignValue::Bool(v) => Ok(if *v { 1.0 } else { 0.0 }),
        ForeignValue::Char(v) => Ok((*v as u32) as f32),
        ForeignValue::Text(text) => Ok(single_char_code(text)? as f32),
        ForeignValue::F32(v) => Ok(*v),
        ForeignValue::F64(v) => Ok(*v as f32),
        ForeignValue::Function(handle) => {
            Ok(ctx.resolve_function(handle)?.value() as f32)
        }
        ForeignValue::Address(pointer) => Ok(pointer.value() as f32),
        ForeignValue::Global(global) => Ok(ctx.resolve_global(global)?.value() as f32),
        ForeignValue::Boxed(inner) => convert_at_depth(ctx, inner, depth + 1),
        ForeignValue::Foreign(object) => {
            let inner = object.unwrap_primitive()?;
            convert_at_depth(ctx, &inner, depth + 1)
        }
        ForeignValue::Unit => Err(unsupported(value)),
    }
}

/// Applies the conversion rule of a committed category, or returns
/// `None` when the value's shape no longer matches the commitment and
/// the call site must re-specialize. Rule failures (wrong text length,
/// unwrap failures) are `Some(Err(..))`, not mismatches.
fn run_committed(
    ctx: &dyn InteropContext,
    committed: Category,
    value: &ForeignValue,
) -> Option<Result<f32, ConvertError>> {
    let result = match (committed, value) {
        (Category::Int8, ForeignValue::I8(v)) => Ok(f32::from(*v)),
        (Category::Int16, ForeignValue::I16(v)) => Ok(f32::from(*v)),
        (Category::Int32, ForeignValue::I32(v)) => Ok(*v as f32),
        (Category::Int64, ForeignValue::I64(v)) => Ok(*v as f32),
        (Category::Boolean, ForeignValue::Bool(v)) => Ok(if *v { 1.0 } else { 0.0 }),
        (Category::Character, ForeignValue::Char(v)) => Ok((*v as u32) as f32),
        (Category::SingleCharText, ForeignValue::Text(text)) => {
            single_char_code(text).map(|code| code as f32)
        }
        (Category::Float32, ForeignValue::F32(v)) => Ok(*v),
        (Category::Float64, ForeignValue::F64(v)) => Ok(*v as f32),
        (Category::Function, ForeignValue::Function(handle)) => ctx
            .resolve_function(handle)
            .map(|pointer| pointer.value() as f32),
        (Category::Address, ForeignValue::Address(pointer)) => Ok(pointer.value() as f32),
        (Category::Global, ForeignValue::Global(global)) => ctx
            .resolve_global(global)
            .map(|pointer| pointer.value() as f32),
        // Containers recurse through the generic path; the unwrapped
        // value has no call site of its own to specialize against.
        (Category::Boxed, ForeignValue::Boxed(inner)) => convert_at_depth(ctx, inner, 1),
        (Category::Foreign, ForeignValue::Foreign(object)) => match object.unwrap_primitive() {
            Ok(inner) => convert_at_depth(ctx, &inner, 1),
            Err(err) => Err(err),
        },
        (Category::Unrecognized, ForeignValue::Unit) => Err(unsupported(value)),
        _ => return None,
    };
    Some(result)
}

/// Cached entry point: one coercion call site with a committed-shape
/// latch.
///
/// The first call commits to the input's category; later calls apply
/// the committed rule directly after a structural match check and
/// re-commit only when the shape changes. The latch is the only state,
/// uses relaxed atomics, and is never trusted for correctness: a stale
/// value fails the structural check and costs one redundant re-commit.
/// Output is bit-for-bit identical to [`to_float`] for every input.
pub struct FloatCallSite {
    committed: AtomicU8,
}

impl FloatCallSite {
    pub fn new() -> Self {
        Self {
            committed: AtomicU8::new(LATCH_EMPTY),
        }
    }

    pub fn coerce(
        &self,
        ctx: &dyn InteropContext,
        value: &ForeignValue,
    ) -> Result<f32, ConvertError> {
        if let Some(committed) = Category::from_latch(self.committed.load(Ordering::Relaxed)) {
            if let Some(result) = run_committed(ctx, committed, value) {
                return result;
            }
        }
        self.recommit(ctx, value)
    }

    fn recommit(
        &self,
        ctx: &dyn InteropContext,
        value: &ForeignValue,
    ) -> Result<f32, ConvertError> {
        let category = Category::of(value);
        if trace_interop() {
            eprintln!("[FERRON_INTEROP] call site re-specialized to {category:?}");
        }
        self.committed.store(category as u8, Ordering::Relaxed);
        match run_committed(ctx, category, value) {
            Some(result) => result,
            // A fresh classification always matches its own rule arm.
            None => Err(unsupported(value)),
        }
    }
}

impl Default for FloatCallSite {
    fn default() -> Self {
        Self::new()
    }
}
