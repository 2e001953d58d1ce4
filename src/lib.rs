//! Recwire: client-side filter expression and CDT operation compiler for
//! record database drivers.
//!
//! This crate builds the flat, tagged instruction sequences and operation
//! descriptors a native database client consumes. It is the compiler half of a
//! driver: users compose expression trees from combinators and the builders
//! serialize them, synchronously and without I/O, into the order-sensitive
//! encoding the native evaluator expects.
//!
//! # Architecture
//! - Instruction model (tagged sequence, emitter combinators)
//! - Context paths into nested lists/maps
//! - Return-type resolution rules, applied at build time
//! - Expression builders (`exp`, with list/map/bit/HLL sub-APIs)
//! - Operation descriptor builders (`bitwise`, `hll`)
//!
//! The network client, record encoding, and wire protocol live in the native
//! layer; everything here is pure, deterministic construction. All validation
//! failures (context bounds, return-type mismatches) surface as [`Result`]s at
//! the offending call, before anything reaches the network.
//!
//! ```
//! use recwire::exp;
//!
//! // a > 5 && b == "active"
//! let filter = exp::and([
//!     exp::gt(exp::bin_int("a"), exp::int_val(5)),
//!     exp::eq(exp::bin_str("b"), exp::str_val("active")),
//! ]);
//! assert!(!filter.is_empty());
//! ```

mod context;
mod instruction;
mod policy;
mod types;

pub mod bitwise;
pub mod exp;
pub mod hll;
pub mod ops;

pub use context::*;
pub use instruction::*;
pub use policy::*;
pub use types::*;

use thiserror::Error;

/// Unified error type for build-time validation failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecwireError {
    /// A context selector index or rank fell outside the signed 32-bit range.
    #[error("range error: {0}")]
    Range(String),
    /// A return-type/value-type combination was rejected.
    #[error("type error: {0}")]
    Type(String),
}
