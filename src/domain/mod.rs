//! Domain layer for the bibshelf plugin.
//!
//! Core types of the document library, independent of Zellij APIs: the
//! document model, the format templates used to render and match documents,
//! and the matcher deciding whether a document satisfies a query.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`document`]: Document model backed by an `info.yaml` file
//! - [`format`]: `{doc[key]}` template rendering
//! - [`matcher`]: Query matching (regex and fuzzy modes)

pub mod document;
pub mod error;
pub mod format;
pub mod matcher;

pub use document::Document;
pub use error::{BibshelfError, Result};
pub use format::format_document;
pub use matcher::{DocumentMatcher, MatchMode, Matcher};
