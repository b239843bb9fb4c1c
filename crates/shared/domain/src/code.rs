//! Deterministic entity codes.
//!
//! A code identifies a named entity inside its tenant, e.g.
//! `tenant:1:code:my_brand`. Codes are derived once, at creation, and never
//! regenerated afterwards.

use crate::constants::{CODE_SEGMENT, CODE_TENANT_PREFIX};

/// Build the code for `name` inside `tenant_id`.
///
/// The name is lower-cased, spaces become underscores, anything outside
/// `[a-z0-9_-]` is dropped, underscore runs collapse to one and leading or
/// trailing underscores are trimmed. A name with nothing left after
/// normalization yields an empty suffix (`tenant:7:code:`).
pub fn generate_code(tenant_id: i64, name: &str) -> String {
    format!(
        "{}:{}:{}:{}",
        CODE_TENANT_PREFIX,
        tenant_id,
        CODE_SEGMENT,
        normalize_name(name)
    )
}

fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());

    for ch in name.to_lowercase().chars() {
        match ch {
            'a'..='z' | '0'..='9' | '-' => normalized.push(ch),
            ' ' | '_' => {
                if !normalized.ends_with('_') {
                    normalized.push('_');
                }
            }
            _ => {}
        }
    }

    normalized.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(generate_code(1, "My Brand"), "tenant:1:code:my_brand");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(
            generate_code(5, "  Multi   Space  "),
            "tenant:5:code:multi_space"
        );
    }

    #[test]
    fn test_non_ascii_and_punctuation_stripped() {
        assert_eq!(generate_code(2, "Café!!"), "tenant:2:code:caf");
    }

    #[test]
    fn test_stripped_characters_do_not_split_underscore_runs() {
        assert_eq!(generate_code(3, "a _!_ b"), "tenant:3:code:a_b");
    }

    #[test]
    fn test_hyphens_and_digits_kept() {
        assert_eq!(
            generate_code(9, "Tier-2 Support 24x7"),
            "tenant:9:code:tier-2_support_24x7"
        );
    }

    #[test]
    fn test_punctuation_only_name_yields_empty_suffix() {
        assert_eq!(generate_code(4, "!!!"), "tenant:4:code:");
    }

    #[test]
    fn test_tabs_are_not_spaces() {
        assert_eq!(generate_code(1, "a\tb"), "tenant:1:code:ab");
    }

    #[test]
    fn test_deterministic() {
        let first = generate_code(42, "Sales Manager");
        for _ in 0..10 {
            assert_eq!(generate_code(42, "Sales Manager"), first);
        }
    }

    #[test]
    fn test_tenant_is_part_of_code() {
        assert_ne!(generate_code(1, "Admin"), generate_code(2, "Admin"));
    }
}
