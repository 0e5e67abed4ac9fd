//! Favicon lookup URL derivation
//!
//! Builds a URL against an external favicon service from the scheme and
//! authority of a source's origin URL. No network I/O is performed.

use url::Url;

/// Favicon service used when none is configured
pub const DEFAULT_FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Requested icon size in pixels
pub const FAVICON_SIZE: u32 = 64;

/// Derive the favicon lookup URL for an origin URL
///
/// Path, query, fragment and credentials of `origin` are discarded. An
/// origin that does not parse (or has no host) contributes empty
/// components, so the result is always produced.
///
/// # Examples
/// ```
/// use citelink_common::favicon::{favicon_url, DEFAULT_FAVICON_SERVICE};
///
/// assert_eq!(
///     favicon_url(DEFAULT_FAVICON_SERVICE, "https://www.gov.uk/page?x=1"),
///     "https://www.google.com/s2/favicons?domain=https://www.gov.uk&sz=64"
/// );
/// ```
pub fn favicon_url(service_base: &str, origin: &str) -> String {
    let (scheme, authority) = origin_parts(origin);
    format!(
        "{}?domain={}://{}&sz={}",
        service_base, scheme, authority, FAVICON_SIZE
    )
}

/// Split an origin URL into (scheme, host[:port])
fn origin_parts(origin: &str) -> (String, String) {
    let origin = origin.trim();

    // Scheme-relative origins carry an authority but no scheme
    if let Some(rest) = origin.strip_prefix("//") {
        let (_, authority) = origin_parts(&format!("http://{}", rest));
        return (String::new(), authority);
    }

    let parsed = match Url::parse(origin) {
        Ok(url) => url,
        Err(_) => return (String::new(), String::new()),
    };
    let scheme = parsed.scheme().to_string();

    let host = match parsed.host_str() {
        Some(host) => host,
        None => return (scheme, String::new()),
    };

    let port = parsed
        .port()
        .map(|p| p.to_string())
        .or_else(|| literal_port(origin));
    let authority = match port {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    (scheme, authority)
}

/// Port as written in the origin text
///
/// `Url` drops a port equal to the scheme default; the lookup keeps it.
fn literal_port(origin: &str) -> Option<String> {
    let (_, rest) = origin.split_once("://")?;
    let authority = rest.split(|c| matches!(c, '/' | '?' | '#')).next()?;
    let host_port = authority.rsplit('@').next()?;
    let (_, port) = host_port.rsplit_once(':')?;

    if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) {
        Some(port.to_string())
    } else {
        None
    }
}
