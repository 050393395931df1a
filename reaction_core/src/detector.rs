//! Tag auto-detection - scoring free text against the lexicon.

use std::collections::BTreeSet;

use crate::lexicon::TagLexicon;
use domain_rules::Domain;

/// Detect which tags a free-text player action exercises.
///
/// The text is lowercased and every lexicon entry is scored by how many of
/// its keywords occur as substrings anywhere in it (so "forge" also fires
/// inside "reforge"). Zero-score tags are dropped; the rest are ranked by
/// descending score, with ties keeping lexicon declaration order. Pure and
/// deterministic; no matches is an empty list, not an error.
pub fn detect_tags(lexicon: &TagLexicon, text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let text = text.to_lowercase();

    let mut scored: Vec<(&str, usize)> = lexicon
        .entries()
        .iter()
        .filter_map(|entry| {
            let score = entry
                .keywords
                .iter()
                .filter(|keyword| text.contains(keyword.as_str()))
                .count();
            (score > 0).then_some((entry.tag.as_str(), score))
        })
        .collect();

    // Stable sort: equal scores keep declaration order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(tag, _)| tag.to_string()).collect()
}

/// Union the domain contributions of the given tags into a set.
///
/// Tag names the lexicon does not declare are silently ignored; the detector
/// only emits declared names, so unknowns here mean the caller mixed in its
/// own, which is tolerated rather than rejected.
pub fn infer_domains(lexicon: &TagLexicon, tags: &[String]) -> BTreeSet<Domain> {
    tags.iter()
        .filter_map(|tag| lexicon.get(tag))
        .flat_map(|entry| entry.domains.iter().copied())
        .collect()
}
