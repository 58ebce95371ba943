//! Object ID prefixes.
//!
//! Every persisted row gets an opaque object ID of the form
//! `{prefix}-{16 hex chars}`, generated inside the database.

pub const PREFIX_ORGANIZATION: &str = "org";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_PAGE: &str = "doc";
pub const PREFIX_RELATION: &str = "rel";
pub const PREFIX_EVIDENCE_REQUEST: &str = "evr";
pub const PREFIX_AUDITOR: &str = "aud";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_ORGANIZATION,
    PREFIX_PROJECT,
    PREFIX_PAGE,
    PREFIX_RELATION,
    PREFIX_EVIDENCE_REQUEST,
    PREFIX_AUDITOR,
];

/// Returns true when `id` looks like `{prefix}-{hex}`.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for prefix in ALL_PREFIXES {
            assert!(seen.insert(*prefix), "duplicate prefix {prefix}");
        }
    }

    #[test]
    fn has_prefix_checks_hex_tail() {
        assert!(has_prefix("doc-0a1b2c3d4e5f6071", PREFIX_PAGE));
        assert!(!has_prefix("doc-", PREFIX_PAGE));
        assert!(!has_prefix("doc-zzzz", PREFIX_PAGE));
        assert!(!has_prefix("rel-0a1b", PREFIX_PAGE));
    }
}
