//! ProPaths Schema Validator
//!
//! Repairs structural gaps in a merged payload document before it is
//! persisted or fact checked.
//!
//! The validator provides:
//! - Function defaults (missing arrow and direction)
//! - Interactor arrow and direction refresh from function evidence
//! - Self-referential upstream repair
//! - Indirect chain completion (upstream, mediator chain, depth)
//! - Optional function field validation with placeholders
//!
//! Every rule is total: malformed input is repaired with documented defaults
//! and `_chain_*` markers, never rejected.
//!
//! # Examples
//!
//! ```
//! use propaths_domain::{Interactor, InteractionType, PayloadDocument};
//! use propaths_validator::{SchemaValidator, ValidatorConfig};
//!
//! let mut partner = Interactor::new("LC3");
//! partner.set_kind(InteractionType::Indirect);
//! let document = PayloadDocument::with_interactors("ATXN3", vec![partner]);
//!
//! let validator = SchemaValidator::default_config();
//! let (fixed, summary) = validator.validate_and_fix(&document);
//!
//! let lc3 = fixed.interactor("LC3").unwrap();
//! assert!(lc3.chain_missing);
//! assert_eq!(lc3.depth, Some(2));
//! assert!(summary.issues_found() > 0);
//! ```

#![warn(missing_docs)]

mod chain;
mod config;
mod error;
mod finalize;
mod functions;
mod report;
mod validator;

pub use chain::{infer_chain, mentions_symbol, ChainInference};
pub use config::ValidatorConfig;
pub use error::ValidatorError;
pub use finalize::finalize;
pub use functions::{placeholder, validate_function_fields, FunctionIssue, VALID_FUNCTION_ARROWS};
pub use report::DocumentReport;
pub use validator::{Finding, Issue, SchemaValidator, ValidationSummary};
