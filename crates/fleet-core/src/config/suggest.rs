//! "Did you mean" suggestions for misspelled names

/// Minimum similarity for a candidate to be suggested.
const CUTOFF: f32 = 0.6;

/// At most this many suggestions are offered.
const MAX_SUGGESTIONS: usize = 3;

/// Known names closest to `name`, best match first.
pub fn closest_names<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut scored: Vec<(f32, &str)> = candidates
        .into_iter()
        .map(|candidate| {
            let ratio = similar::TextDiff::from_chars(name, candidate).ratio();
            (ratio, candidate)
        })
        .filter(|(ratio, _)| *ratio >= CUTOFF)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// Error text for an unknown `kind` called `name`.
pub fn unknown_name_message(kind: &str, name: &str, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        format!("unknown {kind} '{name}'")
    } else {
        format!(
            "unknown {kind} '{name}' (did you mean: {}?)",
            suggestions.join(", ")
        )
    }
}
