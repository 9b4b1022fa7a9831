//! String classification used to dispatch parsing and construction.
//!
//! A string is *self-describing* when the host parser already knows which
//! zone it is in: either an ISO date prefix (read as UTC) or a trailing zone
//! word such as `GMT`. Everything else is read as fake-local wall time.

/// True if `s` starts with `YYYY-MM-DD`.
pub fn looks_like_unqualified_iso(s: &str) -> bool {
    regex!(r"^\d{4}-\d{2}-\d{2}").is_match(s)
}

/// True if `s` ends in letters, ignoring trailing whitespace.
pub fn has_explicit_zone_suffix(s: &str) -> bool {
    regex!(r"[A-Za-z]\s*$").is_match(s)
}

/// Either of the above.
pub fn is_self_describing(s: &str) -> bool {
    looks_like_unqualified_iso(s) || has_explicit_zone_suffix(s)
}
