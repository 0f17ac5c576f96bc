//! Post-processing for model output.

use regex::Regex;
use std::sync::OnceLock;

static MARKER_RE: OnceLock<Regex> = OnceLock::new();

/// Lines the model tends to wrap YAML in: code fences, bare language tags,
/// and "Deployment YAML:"-style titles.
fn marker_re() -> &'static Regex {
    MARKER_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(```[a-z]*|yaml|[a-z]+\.ya?ml:|[a-z]+ ya?ml:|[a-z]+ manifest:)$",
        )
        .expect("static regex")
    })
}

/// Strip markdown fences and title lines from generated YAML.
///
/// Indentation is preserved. Separator lines between documents are kept;
/// leading and trailing ones are dropped, as are blank lines at either end.
pub fn clean_generated_yaml(text: &str) -> String {
    let kept: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !marker_re().is_match(line.trim()))
        .collect();

    let is_padding = |line: &&str| line.is_empty() || *line == crate::manifest::DOCUMENT_SEPARATOR;
    let start = kept.iter().position(|l| !is_padding(l)).unwrap_or(kept.len());
    let end = kept
        .iter()
        .rposition(|l| !is_padding(l))
        .map_or(start, |i| i + 1);

    kept[start..end].join("\n")
}

/// Whitespace-trim any other model answer.
pub fn trim_response(text: &str) -> &str {
    text.trim()
}
