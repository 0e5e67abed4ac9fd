//! Content and source models
//!
//! Field names match the JSON document consumed by the loader and the
//! response shape served by `/data`.

use serde::{Deserialize, Serialize};

/// Source as it appears in the backing document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInput {
    /// Identifier referenced by `<ref>ID</ref>` markers
    pub id: String,
    pub title: String,
    /// Origin URL of the source
    pub source: String,
}

/// Fully populated source with its derived favicon URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub title: String,
    pub source: String,
    pub favicon: String,
}

impl Source {
    /// Attach a derived favicon URL to a document source
    pub fn from_input(input: &SourceInput, favicon: String) -> Self {
        Self {
            id: input.id.clone(),
            title: input.title.clone(),
            source: input.source.clone(),
            favicon,
        }
    }
}

/// One item of the backing document: body text plus candidate sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub category: String,
    /// Body text containing zero or more citation markers
    pub content: String,
    pub sources: Vec<SourceInput>,
}

/// Record after citation resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    pub category: String,
    pub cited_sources: Vec<Source>,
    pub non_cited_sources: Vec<Source>,
    /// Body with markers rewritten into link markup or error placeholders
    pub content: String,
}
