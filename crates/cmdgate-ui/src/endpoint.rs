//! Gateway base URL resolution for the browser console.
//!
//! # Design
//! - The gateway is expected beside the page under `/api` unless an override
//!   is stored.
//! - Relative overrides resolve against the page URL; absolute ones are used
//!   as given. Anything that is not http(s) falls back to the local gateway.

use url::Url;

/// Path the gateway is mounted under when no override is configured.
pub const DEFAULT_API_PATH: &str = "/api";
/// Base used when neither the page URL nor the override yields an http(s) URL.
pub const FALLBACK_API_BASE: &str = "http://localhost:5000/api";

/// Resolve the gateway base for a page at `page_href`.
///
/// The result never ends with `/`, so endpoint paths can be appended directly.
#[must_use]
pub fn resolve_api_base(page_href: &str, override_base: Option<&str>) -> String {
    let target = override_base
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_PATH);

    let resolved = Url::parse(target)
        .or_else(|_| Url::parse(page_href).and_then(|page| page.join(target)));

    match resolved {
        Ok(mut url) if matches!(url.scheme(), "http" | "https") => {
            url.set_query(None);
            url.set_fragment(None);
            url.as_str().trim_end_matches('/').to_string()
        }
        _ => FALLBACK_API_BASE.to_string(),
    }
}
