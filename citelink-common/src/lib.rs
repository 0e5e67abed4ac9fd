//! # citelink Common Library
//!
//! Shared code for the citelink service:
//! - Content and source models
//! - Citation marker extraction and resolution
//! - Favicon lookup URL derivation
//! - Document loading
//! - Configuration resolution

pub mod citation;
pub mod config;
pub mod document;
pub mod error;
pub mod favicon;
pub mod models;

pub use citation::{resolve, CitationResolver};
pub use document::{DocumentLoader, FileDocumentLoader, StaticDocumentLoader};
pub use error::{Error, Result};
pub use models::{ContentRecord, ResolvedRecord, Source, SourceInput};
