//! Integration coverage for the glob-style pattern matcher (C7) over the
//! public API, complementing the inline unit tests in `src/pattern.rs`.

use codegraph_core::pattern::matches;

#[test]
fn separator_detection_is_idempotent_across_repeated_calls() {
    let pattern = "src/**/utils.ts";
    let candidate = "src/app/helpers/utils.ts";
    for _ in 0..3 {
        assert!(matches(pattern, candidate));
    }
}

#[test]
fn double_star_at_pattern_start_matches_any_prefix_depth() {
    assert!(matches("**.Service", "com.acme.billing.Service"));
    assert!(matches("**.Service", "Service"));
}

#[test]
fn single_star_does_not_cross_a_separator_boundary() {
    assert!(!matches("com.*.Invoice", "com.acme.billing.Invoice"));
    assert!(matches("com.*.Invoice", "com.billing.Invoice"));
}

#[test]
fn mismatched_separator_styles_never_match() {
    assert!(!matches("com.acme.*", "com/acme/billing"));
}

#[test]
fn empty_pattern_only_matches_empty_candidate() {
    assert!(matches("", ""));
    assert!(!matches("", "com"));
}
