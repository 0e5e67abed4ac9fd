//! Citation marker extraction and resolution
//!
//! Bodies reference sources with `<ref>ID</ref>` markers. Resolution
//! partitions a record's sources into cited and non-cited lists and
//! rewrites every marker exactly once: matched markers become links,
//! unmatched markers become a "Source not found" placeholder.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::favicon::{favicon_url, DEFAULT_FAVICON_SERVICE};
use crate::models::{ContentRecord, ResolvedRecord, Source};

/// `<ref>ID</ref>` where ID is one or more non-`<` characters
static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<ref>([^<]+)</ref>").unwrap());

/// Extract marker IDs from a body, in order of appearance, duplicates kept
///
/// # Examples
/// ```
/// use citelink_common::citation::extract_citation_ids;
///
/// let ids = extract_citation_ids("Text with <ref>ABC123</ref> and <ref>XYZ789</ref>");
/// assert_eq!(ids, vec!["ABC123", "XYZ789"]);
/// ```
pub fn extract_citation_ids(body: &str) -> Vec<String> {
    marker_ids(body).map(str::to_string).collect()
}

fn marker_ids(body: &str) -> impl Iterator<Item = &str> {
    MARKER_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolves citation markers against a record's source list
#[derive(Debug, Clone)]
pub struct CitationResolver {
    favicon_service: String,
}

impl Default for CitationResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FAVICON_SERVICE)
    }
}

impl CitationResolver {
    /// Create a resolver deriving favicons from `favicon_service`
    pub fn new(favicon_service: impl Into<String>) -> Self {
        Self {
            favicon_service: favicon_service.into(),
        }
    }

    /// Base URL of the favicon lookup service
    pub fn favicon_service(&self) -> &str {
        &self.favicon_service
    }

    /// Resolve one record
    ///
    /// Sources keep their input order within each bucket. When several
    /// sources share an id they are all cited and the first one supplies
    /// the link. The body is rewritten in a single pass, so text inserted
    /// for one marker is never scanned for further markers.
    pub fn resolve(&self, record: &ContentRecord) -> ResolvedRecord {
        let referenced: HashSet<&str> = marker_ids(&record.content).collect();
        let mut unresolved = referenced.clone();

        let mut links: HashMap<&str, String> = HashMap::new();
        let mut cited_sources = Vec::new();
        let mut non_cited_sources = Vec::new();

        for input in &record.sources {
            let favicon = favicon_url(&self.favicon_service, &input.source);
            let source = Source::from_input(input, favicon);

            if referenced.contains(input.id.as_str()) {
                unresolved.remove(input.id.as_str());
                links
                    .entry(input.id.as_str())
                    .or_insert_with(|| render_link(&source));
                cited_sources.push(source);
            } else {
                non_cited_sources.push(source);
            }
        }

        for id in &unresolved {
            warn!(category = %record.category, id = %id, "Citation has no matching source");
        }

        let content = MARKER_RE
            .replace_all(&record.content, |caps: &Captures| {
                let id = &caps[1];
                match links.get(id) {
                    Some(link) => link.clone(),
                    None => render_unresolved(id),
                }
            })
            .into_owned();

        debug!(
            category = %record.category,
            cited = cited_sources.len(),
            non_cited = non_cited_sources.len(),
            unresolved = unresolved.len(),
            "Resolved citations"
        );

        ResolvedRecord {
            category: record.category.clone(),
            cited_sources,
            non_cited_sources,
            content,
        }
    }
}

/// Resolve a record using the default favicon service
pub fn resolve(record: &ContentRecord) -> ResolvedRecord {
    CitationResolver::default().resolve(record)
}

fn render_link(source: &Source) -> String {
    let href = escape_html(&source.source);
    let title = escape_html(&source.title);
    format!(
        r#"<a href="{href}" title="{title}" target="_blank" rel="noopener noreferrer"><img src="{favicon}" alt="" width="16" height="16">{title}</a>"#,
        href = href,
        title = title,
        favicon = escape_html(&source.favicon),
    )
}

fn render_unresolved(id: &str) -> String {
    format!(
        r#"<span style="color: red;">Source not found: {}</span>"#,
        escape_html(id)
    )
}

/// Escape text for use in HTML attribute values and element content
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceInput;

    fn source(id: &str, title: &str, url: &str) -> SourceInput {
        SourceInput {
            id: id.to_string(),
            title: title.to_string(),
            source: url.to_string(),
        }
    }

    fn record(content: &str, sources: Vec<SourceInput>) -> ContentRecord {
        ContentRecord {
            category: "Guidance".to_string(),
            content: content.to_string(),
            sources,
        }
    }

    fn ids(sources: &[Source]) -> Vec<&str> {
        sources.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_extract_keeps_order_and_duplicates() {
        let ids = extract_citation_ids("<ref>B</ref> x <ref>A</ref> y <ref>B</ref>");
        assert_eq!(ids, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_extract_no_markers() {
        assert!(extract_citation_ids("plain text, no citations").is_empty());
        assert!(extract_citation_ids("").is_empty());
    }

    #[test]
    fn test_extract_ignores_empty_id() {
        assert!(extract_citation_ids("empty <ref></ref> marker").is_empty());
    }

    #[test]
    fn test_extract_excludes_nested_tags() {
        let ids = extract_citation_ids("<ref><b>X</b></ref> and <ref>Y</ref>");
        assert_eq!(ids, vec!["Y"]);
    }

    #[test]
    fn test_extract_allows_spaces_and_symbols() {
        let ids = extract_citation_ids("<ref>gov uk/2024-01</ref>");
        assert_eq!(ids, vec!["gov uk/2024-01"]);
    }

    #[test]
    fn test_resolve_cited_and_unresolved() {
        let rec = record(
            "See <ref>A1</ref> and <ref>B2</ref>.",
            vec![source("A1", "Gov", "https://www.gov.uk/page")],
        );
        let resolved = resolve(&rec);

        assert_eq!(resolved.category, "Guidance");
        assert_eq!(ids(&resolved.cited_sources), vec!["A1"]);
        assert!(resolved.non_cited_sources.is_empty());
        assert_eq!(
            resolved.cited_sources[0].favicon,
            "https://www.google.com/s2/favicons?domain=https://www.gov.uk&sz=64"
        );

        assert!(resolved.content.starts_with("See <a href=\"https://www.gov.uk/page\""));
        assert!(resolved.content.contains(">Gov</a>"));
        assert!(resolved.content.contains("Source not found: B2"));
        assert!(resolved.content.ends_with("</span>."));
        assert!(!resolved.content.contains("<ref>"));
    }

    #[test]
    fn test_resolve_no_markers_leaves_body_untouched() {
        let rec = record(
            "Nothing cited here.",
            vec![
                source("A", "First", "https://a.example/x"),
                source("B", "Second", "https://b.example/y"),
            ],
        );
        let resolved = resolve(&rec);

        assert_eq!(resolved.content, "Nothing cited here.");
        assert!(resolved.cited_sources.is_empty());
        assert_eq!(ids(&resolved.non_cited_sources), vec!["A", "B"]);
    }

    #[test]
    fn test_resolve_repeated_marker_cited_once() {
        let rec = record(
            "<ref>A1</ref> first, then again <ref>A1</ref>",
            vec![source("A1", "Gov", "https://www.gov.uk")],
        );
        let resolved = resolve(&rec);

        assert_eq!(ids(&resolved.cited_sources), vec!["A1"]);
        assert_eq!(resolved.content.matches("<a href=").count(), 2);
        assert!(!resolved.content.contains("<ref>"));
    }

    #[test]
    fn test_resolve_empty_source_list() {
        let rec = record("Claim <ref>X</ref>", vec![]);
        let resolved = resolve(&rec);

        assert!(resolved.cited_sources.is_empty());
        assert!(resolved.non_cited_sources.is_empty());
        assert_eq!(
            resolved.content,
            "Claim <span style=\"color: red;\">Source not found: X</span>"
        );
    }

    #[test]
    fn test_resolve_partitions_in_input_order() {
        let rec = record(
            "<ref>C</ref> <ref>A</ref>",
            vec![
                source("A", "a", "https://a.example"),
                source("B", "b", "https://b.example"),
                source("C", "c", "https://c.example"),
                source("D", "d", "https://d.example"),
            ],
        );
        let resolved = resolve(&rec);

        assert_eq!(ids(&resolved.cited_sources), vec!["A", "C"]);
        assert_eq!(ids(&resolved.non_cited_sources), vec!["B", "D"]);
    }

    #[test]
    fn test_resolve_duplicate_ids_first_source_supplies_link() {
        let rec = record(
            "<ref>A</ref>",
            vec![
                source("A", "First", "https://first.example"),
                source("A", "Second", "https://second.example"),
            ],
        );
        let resolved = resolve(&rec);

        assert_eq!(ids(&resolved.cited_sources), vec!["A", "A"]);
        assert!(resolved.content.contains("https://first.example"));
        assert!(!resolved.content.contains("https://second.example"));
        assert_eq!(resolved.content.matches("<a href=").count(), 1);
    }

    #[test]
    fn test_resolve_does_not_rescan_inserted_text() {
        let rec = record(
            "<ref>A</ref> <ref>B</ref>",
            vec![
                source("A", "<ref>B</ref>", "https://a.example"),
                source("B", "Bee", "https://b.example"),
            ],
        );
        let resolved = resolve(&rec);

        assert_eq!(resolved.content.matches("<a href=").count(), 2);
        assert!(resolved.content.contains("&lt;ref&gt;B&lt;/ref&gt;"));
        assert!(!resolved.content.contains("<ref>"));
    }

    #[test]
    fn test_resolve_escapes_source_fields() {
        let rec = record(
            "<ref>Q</ref>",
            vec![source("Q", "Tom & \"Jerry\"", "https://q.example/?a=1&b=2")],
        );
        let resolved = resolve(&rec);

        assert!(resolved.content.contains(r#"href="https://q.example/?a=1&amp;b=2""#));
        assert!(resolved.content.contains(r#"title="Tom &amp; &quot;Jerry&quot;""#));
        // Output keeps the raw values
        assert_eq!(resolved.cited_sources[0].title, "Tom & \"Jerry\"");
    }

    #[test]
    fn test_resolve_empty_marker_left_as_text() {
        let rec = record("odd <ref></ref> tag", vec![source("", "blank", "https://x.example")]);
        let resolved = resolve(&rec);

        assert_eq!(resolved.content, "odd <ref></ref> tag");
        assert_eq!(resolved.non_cited_sources.len(), 1);
    }

    #[test]
    fn test_resolve_custom_favicon_service() {
        let resolver = CitationResolver::new("https://icons.example/s");
        let rec = record("<ref>A</ref>", vec![source("A", "a", "https://a.example/p")]);
        let resolved = resolver.resolve(&rec);

        assert_eq!(
            resolved.cited_sources[0].favicon,
            "https://icons.example/s?domain=https://a.example&sz=64"
        );
        assert!(resolved
            .content
            .contains(r#"src="https://icons.example/s?domain=https://a.example&amp;sz=64""#));
    }

    #[test]
    fn test_resolve_every_source_in_exactly_one_bucket() {
        let rec = record(
            "<ref>1</ref><ref>3</ref><ref>9</ref>",
            (1..=5)
                .map(|i| source(&i.to_string(), "t", "https://e.example"))
                .collect(),
        );
        let resolved = resolve(&rec);

        let mut all: Vec<&str> = ids(&resolved.cited_sources);
        all.extend(ids(&resolved.non_cited_sources));
        all.sort();
        assert_eq!(all, vec!["1", "2", "3", "4", "5"]);
        assert!(resolved
            .cited_sources
            .iter()
            .all(|c| !resolved.non_cited_sources.iter().any(|n| n.id == c.id)));
        assert!(resolved.content.contains("Source not found: 9"));
    }
}
