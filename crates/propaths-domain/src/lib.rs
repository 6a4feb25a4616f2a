//! ProPaths Domain Layer
//!
//! This crate contains the core model and the pure rules that every other
//! ProPaths crate builds on. Nothing in here performs I/O or logs; results that
//! callers may want to report carry their own diagnostics.
//!
//! ## Key Concepts
//!
//! - **Arrow**: the canonical relationship kind between two proteins
//!   (`activates`, `inhibits`, `binds`)
//! - **Direction**: either query-relative (`main_to_primary`, ...) or
//!   pair-absolute (`a_to_b`, ...)
//! - **Interactor**: one partner of the query protein inside a payload document
//! - **Payload Document**: the `ctx_json` / `snapshot_json` pair produced by a query
//! - **Interaction Row**: a persisted, canonically ordered protein pair
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Storage and cache implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod arrow;
pub mod direction;
pub mod interactor;
mod lenient;
pub mod pair;
pub mod payload;
pub mod traits;

// Re-exports for convenience
pub use aggregate::{aggregate_function_arrows, Aggregation};
pub use arrow::{ArrowClassifier, ArrowKind, Classify};
pub use direction::{
    arrow_notation, Conversion, ConversionOutcome, DirectionNormalizer, Normalize, PairDirection,
    QueryDirection,
};
pub use interactor::{ArrowBuckets, FunctionRecord, InteractionType, Interactor};
pub use pair::{FunctionContext, InteractionRow, PairKey, Protein, RowChange};
pub use payload::{PayloadContext, PayloadDocument, PayloadUpdate};
