use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// ── Constants ────────────────────────────────────────────────────────────────

/// Label used when no hostname can be derived from a link.
pub const FALLBACK_LABEL: &str = "Link";

const MIN_URL_LEN: usize = 4;

// ── Lazy static regexes ──────────────────────────────────────────────────────

// Scheme, `www.`, or a bare `name.tld` shape. No TLD allowlist.
static URL_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://|www\.)|^[a-zA-Z0-9][-a-zA-Z0-9]*\.[a-zA-Z]{2,}").unwrap()
});

// ── Classification ───────────────────────────────────────────────────────────

/// Decide whether free text submitted as a card title is a link.
///
/// A cheap shape test runs first; only candidates that pass it are handed to
/// the URL parser (prefixed with `https://` when they carry no scheme).
pub fn is_url(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.chars().count() < MIN_URL_LEN {
        return false;
    }

    if !URL_SHAPE_RE.is_match(trimmed) {
        return false;
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    Url::parse(&candidate).is_ok()
}

/// Return `input` trimmed and qualified with `https://` unless it already has
/// an http(s) scheme.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_string();
    }
    format!("https://{}", trimmed)
}

// ── Domain label ─────────────────────────────────────────────────────────────

/// Hostname of `url` without a leading `www.`, or [`FALLBACK_LABEL`] when the
/// input does not parse or has no host.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|h| h.to_string()))
        .map(|host| host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| FALLBACK_LABEL.to_string())
}
