//! Helper functions for parsing: subcommand suggestions.

use strsim::levenshtein;

/// Suggest the candidate closest to `input` within `max_distance` edits.
///
/// Ties keep the earliest candidate. A `max_distance` of 0 disables hints.
pub(super) fn suggest_similar<'a, I>(input: &str, candidates: I, max_distance: usize) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    if max_distance == 0 {
        return None;
    }

    let input_lower = input.to_lowercase();
    let mut best_match: Option<(&str, usize)> = None;

    for candidate in candidates {
        let distance = levenshtein(&input_lower, candidate);
        if distance > max_distance {
            continue;
        }
        match best_match {
            Some((_, best_dist)) if distance >= best_dist => {}
            _ => best_match = Some((candidate, distance)),
        }
    }

    best_match.map(|(candidate, _)| candidate.to_string())
}
