use crate::config::HighlightRule;
use crate::parser::text::normalize;

const STOP_PHRASES: &[&str] = &[
    "ingredients",
    "benefits",
    "how to use",
    "volume",
    "feature",
    "tips",
    "targets",
    "skin type",
    "free sample",
];
const STOP_AFTER: &[&str] = &["ingredients", "tips"];

const NOISE_PHRASES: &[&str] = &[
    "how to use",
    "ingredients",
    "expiration date",
    "expiry",
    "months",
    "shipped",
];
const NOISE_AFTER: &[&str] = &["how to use", "ingredients"];
const KEEP_AFTER: &str = "key ingredients";

/// Clean highlight lines into description lines, preserving input order.
pub fn classify(raw_lines: &[String], title: &str, rule: HighlightRule) -> Vec<String> {
    let lines: Vec<String> = raw_lines.iter().map(|l| normalize(l)).collect();
    match rule {
        HighlightRule::ExclusionList => exclusion_list(&lines, title),
        HighlightRule::MarkerTriggered => marker_triggered(&lines),
    }
}

/// Used when a page has no highlight regions at all.
pub fn from_meta_description(content: &str) -> Vec<String> {
    let line = normalize(content);
    if line.is_empty() {
        Vec::new()
    } else {
        vec![line]
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn exclusion_list(lines: &[String], title: &str) -> Vec<String> {
    let title = title.to_lowercase();
    let mut kept = Vec::new();
    let mut prev = String::new();

    for line in lines {
        let lower = line.to_lowercase();
        let drop = lower.is_empty()
            || contains_any(&lower, STOP_PHRASES)
            || contains_any(&prev, STOP_AFTER)
            // an empty title is contained in every line
            || lower.contains(&title);
        if !drop {
            kept.push(lower.clone());
        }
        prev = lower;
    }
    kept
}

fn marker_triggered(lines: &[String]) -> Vec<String> {
    let mut kept = Vec::new();
    let mut prev = String::new();

    for line in lines {
        let lower = line.to_lowercase();
        let keep = if prev == KEEP_AFTER {
            true
        } else {
            !contains_any(&lower, NOISE_PHRASES) && !contains_any(&prev, NOISE_AFTER)
        };
        if keep && !line.is_empty() {
            kept.push(line.clone());
        }
        prev = lower;
    }
    kept
}
