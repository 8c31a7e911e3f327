#![deny(clippy::unwrap_used)]

//! Foreign-value coercion core of the Ferron runtime engine.
//!
//! Values arriving from an interoperating runtime carry no statically
//! fixed type: a call may hand us a machine integer, a boolean, a
//! single-character text, a function handle, a boxed primitive, a raw
//! address, a shared global descriptor, or an opaque foreign object.
//! This crate classifies such a value into a closed set of shape
//! categories and coerces it to a native `f32`, either through a
//! per-call-site specializing fast path ([`FloatCallSite`]) or a fully
//! generic recursive slow path ([`to_float`]).
//!
//! Resolution of handles, addresses, and globals to native scalars is
//! delegated to an [`InteropContext`] supplied by the embedding object
//! model; the engine itself holds no global state.

pub mod context;
pub mod convert;
pub mod value;

pub use context::{InteropContext, NativeContext};
pub use convert::{single_char_code, to_float, Category, ConvertError, FloatCallSite};
pub use value::{ForeignValue, FunctionHandle, NativePointer, OpaqueObject, SharedGlobal};
