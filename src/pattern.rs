//! Glob-style pattern matcher (C7): `*` matches exactly one path segment,
//! `**` matches zero or more segments (including the separators between
//! them). Separator is auto-detected per match (`/` if present in either
//! operand, else `.`). Implemented as a direct segment automaton rather than
//! compiling to a regex — the distilled spec leaves the strategy open and a
//! hand-rolled matcher keeps the semantics (especially `**`) unambiguous.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Slash,
    Dot,
}

impl Separator {
    fn detect(pattern: &str, candidate: &str) -> Self {
        if pattern.contains('/') || candidate.contains('/') {
            Separator::Slash
        } else {
            Separator::Dot
        }
    }

    fn as_char(self) -> char {
        match self {
            Separator::Slash => '/',
            Separator::Dot => '.',
        }
    }
}

/// Whether `candidate` fully matches `pattern` under auto-detected
/// segment-separator semantics.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    let sep = Separator::detect(pattern, candidate);
    let pattern_segments: Vec<&str> = pattern.split(sep.as_char()).collect();
    let candidate_segments: Vec<&str> = candidate.split(sep.as_char()).collect();
    match_segments(&pattern_segments, &candidate_segments)
}

fn match_segments(pattern: &[&str], candidate: &[&str]) -> bool {
    match pattern.first() {
        None => candidate.is_empty(),
        Some(&"**") => {
            if match_segments(&pattern[1..], candidate) {
                return true;
            }
            if !candidate.is_empty() && match_segments(pattern, &candidate[1..]) {
                return true;
            }
            false
        }
        Some(&"*") => {
            !candidate.is_empty() && match_segments(&pattern[1..], &candidate[1..])
        }
        Some(seg) => {
            !candidate.is_empty() && *seg == candidate[0] && match_segments(&pattern[1..], &candidate[1..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_star_matches_one_dot_segment() {
        assert!(matches("com.*.service", "com.billing.service"));
        assert!(!matches("com.*.service", "com.billing.invoicing.service"));
    }

    #[test]
    fn double_star_matches_any_number_of_segments() {
        assert!(matches("com.**.service", "com.billing.invoicing.service"));
        assert!(matches("com.**.service", "com.service"));
        assert!(matches("com.**", "com.billing.invoicing"));
    }

    #[test]
    fn slash_separator_detected_over_dot() {
        assert!(matches("src/**/utils.ts", "src/app/helpers/utils.ts"));
        assert!(!matches("src/**/utils.ts", "src/app/helpers/utils.js"));
    }

    #[test]
    fn is_case_sensitive() {
        assert!(!matches("com.Billing.*", "com.billing.Service"));
    }

    #[test]
    fn exact_match_with_no_wildcards() {
        assert!(matches("com.billing.Service", "com.billing.Service"));
        assert!(!matches("com.billing.Service", "com.billing.Other"));
    }
}
