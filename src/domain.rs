//! Domain inference (C6): clusters package/module paths into coarse
//! business domains by grouping on a language-dependent default segment
//! index, skipping a fixed stop-set of architectural-layer segment names.

use crate::types::Language;
use std::collections::BTreeMap;

const STOP_SEGMENTS: &[&str] = &[
    "domain",
    "application",
    "infrastructure",
    "presentation",
    "api",
    "impl",
    "internal",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub patterns: Vec<String>,
    pub matched_packages: Vec<String>,
}

fn default_segment_index(language: Language) -> usize {
    if language.is_slash_separated() {
        1
    } else {
        2
    }
}

fn separator_for(language: Language) -> char {
    if language.is_slash_separated() {
        '/'
    } else {
        '.'
    }
}

/// Picks the clustering segment for one package/module path: start at
/// `start_index`, skip over stop-set segments, advancing one index each
/// time a skip occurs, until a non-stop segment is found or the path runs out.
fn pick_segment(segments: &[&str], start_index: usize) -> Option<String> {
    let mut idx = start_index;
    while idx < segments.len() {
        let seg = segments[idx];
        if STOP_SEGMENTS.contains(&seg.to_lowercase().as_str()) {
            idx += 1;
            continue;
        }
        return Some(seg.to_string());
    }
    None
}

/// Infers domains from a set of `(language, package_or_module_path)` pairs.
/// `override_index` corresponds to `AnalysisOptions::domain_segment_index`.
pub fn infer_domains(
    paths: &[(Language, String)],
    override_index: Option<usize>,
) -> Vec<Domain> {
    let mut clusters: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (language, path) in paths {
        let sep = separator_for(*language);
        let segments: Vec<&str> = path.split(sep).collect();
        let start_index = override_index.unwrap_or_else(|| default_segment_index(*language));
        if let Some(key) = pick_segment(&segments, start_index) {
            clusters.entry(key).or_default().push(path.clone());
        }
    }

    clusters
        .into_iter()
        .map(|(name, matched_packages)| {
            let patterns = matched_packages
                .iter()
                .map(|p| glob_pattern_for(p, &name))
                .collect::<Vec<_>>();
            Domain {
                name,
                patterns,
                matched_packages,
            }
        })
        .collect()
}

/// Builds a coarse glob pattern that would match `path` by replacing
/// everything after the clustering segment with a double-star wildcard.
fn glob_pattern_for(path: &str, segment: &str) -> String {
    let sep = if path.contains('/') { '/' } else { '.' };
    let segments: Vec<&str> = path.split(sep).collect();
    if let Some(pos) = segments.iter().position(|s| *s == segment) {
        let mut prefix: Vec<&str> = segments[..=pos].to_vec();
        prefix.push("**");
        prefix.join(&sep.to_string())
    } else {
        path.to_string()
    }
}

/// Merges inferred domains with a caller-supplied list, matching case
/// insensitively on `name`; caller-supplied domains win, inferred
/// duplicates are dropped.
pub fn merge_domains(inferred: Vec<Domain>, user_supplied: Vec<Domain>) -> Vec<Domain> {
    let user_names: Vec<String> = user_supplied.iter().map(|d| d.name.to_lowercase()).collect();
    let mut merged: Vec<Domain> = inferred
        .into_iter()
        .filter(|d| !user_names.contains(&d.name.to_lowercase()))
        .collect();
    merged.extend(user_supplied);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clusters_on_default_dot_index_for_java() {
        let paths = vec![
            (Language::Java, "com.acme.billing.Invoice".to_string()),
            (Language::Java, "com.acme.billing.Payment".to_string()),
            (Language::Java, "com.acme.shipping.Label".to_string()),
        ];
        let domains = infer_domains(&paths, None);
        let names: Vec<&str> = domains.iter().map(|d| d.name.as_str()).collect();
        assert!(names.contains(&"billing"));
        assert!(names.contains(&"shipping"));
    }

    #[test]
    fn skips_stop_segments_and_advances() {
        let paths = vec![(
            Language::Java,
            "com.acme.domain.billing.Invoice".to_string(),
        )];
        let domains = infer_domains(&paths, None);
        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].name, "billing");
    }

    #[test]
    fn slash_separated_uses_index_one() {
        let paths = vec![(Language::TypeScript, "src/billing/invoice".to_string())];
        let domains = infer_domains(&paths, None);
        assert_eq!(domains[0].name, "billing");
    }

    #[test]
    fn user_supplied_domain_overrides_inferred_case_insensitively() {
        let inferred = vec![Domain {
            name: "Billing".to_string(),
            patterns: vec!["com.acme.billing.**".to_string()],
            matched_packages: vec!["com.acme.billing.Invoice".to_string()],
        }];
        let user = vec![Domain {
            name: "billing".to_string(),
            patterns: vec!["com.acme.billing.*".to_string()],
            matched_packages: vec![],
        }];
        let merged = merge_domains(inferred, user);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].patterns, vec!["com.acme.billing.*".to_string()]);
    }
}
