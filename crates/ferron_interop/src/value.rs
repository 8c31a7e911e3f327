use std::sync::Arc;

use crate::convert::ConvertError;

/// A resolved native scalar: a machine address or raw storage word.
///
/// Signed 64-bit to match the runtime's native word; numeric coercions
/// of pointers widen this signed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NativePointer(pub i64);

impl NativePointer {
    pub fn value(self) -> i64 {
        self.0
    }
}

/// Descriptor for a runtime function. Its native representation is a
/// machine address resolved lazily through the [`InteropContext`].
///
/// [`InteropContext`]: crate::context::InteropContext
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionHandle {
    pub id: u64,
    pub name: String,
}

/// Descriptor for a shared global variable. Native storage is resolved
/// through the [`InteropContext`]; the resolved pointer is the global's
/// current native word.
///
/// [`InteropContext`]: crate::context::InteropContext
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedGlobal {
    pub id: u64,
    pub name: String,
}

/// An opaque object from an interoperating runtime.
///
/// The embedding object model implements this for values the engine
/// cannot see into. `unwrap_primitive` must either produce a more
/// primitive [`ForeignValue`] or report that none exists; the engine
/// re-classifies whatever comes back.
pub trait OpaqueObject: Send + Sync {
    fn unwrap_primitive(&self) -> Result<ForeignValue, ConvertError>;

    /// Short diagnostic label used in error messages.
    fn describe(&self) -> String;
}

/// A dynamically-typed value supplied by an interoperating runtime.
///
/// Read-only for the duration of one coercion call; the engine never
/// stores one past the call that received it.
#[derive(Clone)]
pub enum ForeignValue {
    /// A value no conversion rule covers.
    Unit,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Char(char),
    Text(Arc<str>),
    F32(f32),
    F64(f64),
    Function(Arc<FunctionHandle>),
    /// A boxed primitive; coercion unwraps and re-classifies.
    Boxed(Arc<ForeignValue>),
    Address(NativePointer),
    Global(Arc<SharedGlobal>),
    Foreign(Arc<dyn OpaqueObject>),
}

impl ForeignValue {
    pub fn text(value: &str) -> Self {
        ForeignValue::Text(Arc::from(value))
    }

    pub fn boxed(inner: ForeignValue) -> Self {
        ForeignValue::Boxed(Arc::new(inner))
    }

    /// Stable name for the value's runtime shape, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ForeignValue::Unit => "unit",
            ForeignValue::Bool(_) => "boolean",
            ForeignValue::I8(_) => "int8",
            ForeignValue::I16(_) => "int16",
            ForeignValue::I32(_) => "int32",
            ForeignValue::I64(_) => "int64",
            ForeignValue::Char(_) => "character",
            ForeignValue::Text(_) => "text",
            ForeignValue::F32(_) => "float32",
            ForeignValue::F64(_) => "float64",
            ForeignValue::Function(_) => "function handle",
            ForeignValue::Boxed(_) => "boxed primitive",
            ForeignValue::Address(_) => "address",
            ForeignValue::Global(_) => "shared global",
            ForeignValue::Foreign(_) => "foreign object",
        }
    }
}

impl std::fmt::Debug for ForeignValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForeignValue::Unit => write!(f, "Unit"),
            ForeignValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            ForeignValue::I8(v) => f.debug_tuple("I8").field(v).finish(),
            ForeignValue::I16(v) => f.debug_tuple("I16").field(v).finish(),
            ForeignValue::I32(v) => f.debug_tuple("I32").field(v).finish(),
            ForeignValue::I64(v) => f.debug_tuple("I64").field(v).finish(),
            ForeignValue::Char(v) => f.debug_tuple("Char").field(v).finish(),
            ForeignValue::Text(v) => f.debug_tuple("Text").field(v).finish(),
            ForeignValue::F32(v) => f.debug_tuple("F32").field(v).finish(),
            ForeignValue::F64(v) => f.debug_tuple("F64").field(v).finish(),
            ForeignValue::Function(v) => f.debug_tuple("Function").field(&v.name).finish(),
            ForeignValue::Boxed(v) => f.debug_tuple("Boxed").field(v).finish(),
            ForeignValue::Address(v) => f.debug_tuple("Address").field(&v.0).finish(),
            ForeignValue::Global(v) => f.debug_tuple("Global").field(&v.name).finish(),
            ForeignValue::Foreign(v) => {
                f.debug_tuple("Foreign").field(&v.describe()).finish()
            }
        }
    }
}
