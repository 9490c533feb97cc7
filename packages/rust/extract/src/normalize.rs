//! Identifier and link normalization.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// A version label: integer or decimal (`17`, `9.6`).
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("version regex"));

/// Anything that is not a word character, whitespace or hyphen.
static SLUG_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("slug strip regex"));

/// Runs of whitespace and hyphens.
static SLUG_SEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("slug separator regex"));

/// Whether a header cell's text is a version label.
pub fn is_version_label(text: &str) -> bool {
    VERSION_RE.is_match(text)
}

/// Turn a feature name into its `id`.
///
/// `"SCRAM-SHA-256 authentication"` becomes `"scram_sha_256_authentication"`.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = SLUG_STRIP_RE.replace_all(&lower, "");
    let joined = SLUG_SEP_RE.replace_all(&stripped, "_");
    joined.trim_matches('_').to_string()
}

/// Resolve a row-header link to an absolute documentation URL.
///
/// - absolute (`https://…`) passes through
/// - root-relative (`/docs/…`) is prefixed with `site_origin`
/// - anything else is a path under `detail_base_url`
pub fn normalize_docs_url(href: &str, site_origin: &str, detail_base_url: &str) -> String {
    if href.starts_with('/') {
        return format!("{}{href}", site_origin.trim_end_matches('/'));
    }
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    if detail_base_url.ends_with('/') {
        format!("{detail_base_url}{href}")
    } else {
        format!("{detail_base_url}/{href}")
    }
}
