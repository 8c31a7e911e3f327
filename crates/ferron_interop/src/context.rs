use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;

use crate::convert::ConvertError;
use crate::value::{FunctionHandle, NativePointer, SharedGlobal};

/// Collaborator seam for to-native resolution.
///
/// Supplied by the embedding object model and passed explicitly into
/// the coercion entry points; the engine keeps no process-wide state.
/// Both resolutions must be idempotent and non-blocking: resolving the
/// same descriptor twice yields the same pointer.
pub trait InteropContext: Send + Sync {
    fn resolve_function(&self, handle: &FunctionHandle) -> Result<NativePointer, ConvertError>;

    fn resolve_global(&self, global: &SharedGlobal) -> Result<NativePointer, ConvertError>;
}

const FUNCTION_BASE: i64 = 0x1000;
const FUNCTION_STRIDE: i64 = 0x10;
const GLOBAL_BASE: i64 = 0x10_0000;
const GLOBAL_STRIDE: i64 = 8;

/// Production [`InteropContext`]: assigns and caches a native address
/// per descriptor on first resolution.
///
/// Function handles and shared globals live in disjoint address
/// regions so a resolved pointer identifies what it came from.
pub struct NativeContext {
    functions: RwLock<HashMap<u64, NativePointer>>,
    globals: RwLock<HashMap<u64, NativePointer>>,
    next_function: AtomicI64,
    next_global: AtomicI64,
}

impl NativeContext {
    pub fn new() -> Self {
        Self {
            functions: RwLock::new(HashMap::new()),
            globals: RwLock::new(HashMap::new()),
            next_function: AtomicI64::new(FUNCTION_BASE),
            next_global: AtomicI64::new(GLOBAL_BASE),
        }
    }

    fn resolve_cached(
        table: &RwLock<HashMap<u64, NativePointer>>,
        next: &AtomicI64,
        stride: i64,
        id: u64,
    ) -> NativePointer {
        if let Some(pointer) = table.read().get(&id) {
            return *pointer;
        }
        let mut table = table.write();
        *table
            .entry(id)
            .or_insert_with(|| NativePointer(next.fetch_add(stride, Ordering::Relaxed)))
    }
}

impl Default for NativeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl InteropContext for NativeContext {
    fn resolve_function(&self, handle: &FunctionHandle) -> Result<NativePointer, ConvertError> {
        Ok(Self::resolve_cached(
            &self.functions,
            &self.next_function,
            FUNCTION_STRIDE,
            handle.id,
        ))
    }

    fn resolve_global(&self, global: &SharedGlobal) -> Result<NativePointer, ConvertError> {
        Ok(Self::resolve_cached(
            &self.globals,
            &self.next_global,
            GLOBAL_STRIDE,
            global.id,
        ))
    }
}
