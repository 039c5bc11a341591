//! Paperwork core
//!
//! The form field resolution and validation engine. Given a document's field
//! schema and a user profile, it fills what it can and reports what is still
//! missing or malformed.
//!
//! ## Architecture
//!
//! Data flows one way through four components:
//!
//! 1. **Schema** (`schema`): ordered, typed field descriptors.
//! 2. **Profile** (`profile`): normalized, ambiguity-aware matching of field
//!    names against profile keys.
//! 3. **Autofill** (`autofill`): fills blank fields and records provenance.
//! 4. **Engine** (`engine`): per-kind validation rules producing issues.
//!
//! The orchestrator (`resolve`) runs autofill then validation in one call.
//! Collaborators that read documents, write them or load profiles plug in
//! through the traits in `document`; field explanations through `explain`.
//!
//! Everything here is synchronous and pure. No operation keeps state between
//! calls, so independent documents can be resolved concurrently without any
//! coordination.
//!
//! ## Example
//!
//! ```rust
//! use paperwork_core::{resolve, FieldDescriptor, FieldSchema, IssueReason, UserProfile};
//!
//! let schema = FieldSchema::new(vec![
//!     FieldDescriptor::text("Full Name").required(),
//!     FieldDescriptor::choice("Country", ["USA", "Canada"]).required(),
//! ]);
//! let profile = UserProfile::new().with("full_name", "Ada Lovelace");
//!
//! let (fields, issues) = resolve(&schema, &profile).unwrap();
//!
//! assert_eq!(fields[0].value(), "Ada Lovelace");
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues[0].reason, IssueReason::Missing);
//! ```

pub mod autofill;
pub mod document;
pub mod engine;
pub mod error;
pub mod explain;
pub mod profile;
pub mod resolve;
pub mod schema;

pub use autofill::autofill;
pub use document::{FieldExtractor, FieldWriter, ProfileStore};
pub use engine::rules::{IssueReason, Rule, ValidationIssue};
pub use engine::{validate, ValidationEngine};
pub use error::{Result, SchemaError};
pub use explain::{Explain, Glossary, PromptExplainer};
pub use profile::{match_profile, normalize_key, ProfileMatch, ProfileResolver, UserProfile};
pub use resolve::{resolve, FormResolver, Resolution, ResolutionSummary};
pub use schema::{FieldDescriptor, FieldKind, FieldSchema, FieldSource, ResolvedField, TextFormat};
