//! ProPaths Merge Engine
//!
//! Folds partial interactor fragments into a payload document.
//!
//! # Overview
//!
//! Each pipeline round, and each parallel arrow worker, produces a fragment
//! addressed by interactor `primary`. The engine merges fragments one at a
//! time according to an explicit per-field policy table:
//!
//! | Field | Policy |
//! |-------|--------|
//! | `arrow`, `direction`, `intent`, `upstream_interactor`, `interaction_type`, `depth` | overwrite |
//! | `arrows` | union (per bucket, de-duplicated) |
//! | `functions` | append, or replace-if-non-empty on request |
//! | anything else | fill if absent |
//!
//! Merging the same fragment twice leaves the document unchanged, and
//! fragments for different interactors can be merged in any order.
//!
//! # Usage
//!
//! ```
//! use propaths_domain::{Interactor, PayloadDocument, PayloadUpdate};
//! use propaths_merge::MergeEngine;
//!
//! let base = PayloadDocument::with_interactors("ATXN3", vec![Interactor::new("VCP")]);
//! let update = PayloadUpdate::parse(
//!     r#"{"ctx_json":{"interactors":[{"primary":"VCP","arrow":"binds"}]}}"#,
//! ).unwrap();
//!
//! let engine = MergeEngine::default_config();
//! let merged = engine.merge(&base, &update);
//! assert_eq!(merged.interactor("VCP").unwrap().arrow.as_deref(), Some("binds"));
//! assert!(base.interactor("VCP").unwrap().arrow.is_none());
//! ```
//!
//! # Concurrent workers
//!
//! [`FragmentCoordinator`] owns the document and applies fragments sent by
//! any number of tasks, one at a time, in arrival order.

#![warn(missing_docs)]

mod config;
mod coordinator;
mod engine;
mod error;
mod functions;
mod policy;

pub use config::MergeConfig;
pub use coordinator::{CoordinatorOutcome, FragmentCoordinator, FragmentSender};
pub use engine::{MergeEngine, MergeReport};
pub use error::MergeError;
pub use functions::{dedup_functions, FunctionKey};
pub use policy::{FieldMerge, InteractorField, MergePolicy, MergeValue, PolicyTable};
