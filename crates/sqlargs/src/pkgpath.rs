//! Package path normalization.

const VENDOR_SEGMENT: &str = "vendor/";

/// Strip a vendoring prefix from a package path.
///
/// Only the part after the last `vendor/` *path segment* is significant, so
/// nested vendoring collapses to the innermost package:
///
/// ```
/// use sqlargs::pkgpath::strip_vendor;
///
/// assert_eq!(strip_vendor("github.com/acme/app/vendor/database/sql"), "database/sql");
/// assert_eq!(strip_vendor("github.com/myvendor/sqlx"), "github.com/myvendor/sqlx");
/// ```
pub fn strip_vendor(path: &str) -> &str {
    path.rmatch_indices(VENDOR_SEGMENT)
        .find(|(idx, _)| *idx == 0 || path.as_bytes()[idx - 1] == b'/')
        .map(|(idx, _)| &path[idx + VENDOR_SEGMENT.len()..])
        .unwrap_or(path)
}
