//! Fuzzy suggestions of mapping targets for a column header

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::options::SelectOption;

/// Rank options against a column header
///
/// Scores both label and value, keeps the better one, drops anything below
/// `min_score` and the do-not-import sentinel. Highest score first, ties keep
/// option order.
pub fn suggest_options(
    header: &str,
    options: &[SelectOption],
    max_suggestions: usize,
    min_score: i64,
) -> Vec<SelectOption> {
    let header = header.trim();
    if header.is_empty() || max_suggestions == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();

    let mut scored: Vec<(usize, i64)> = options
        .iter()
        .enumerate()
        .filter(|(_, option)| !option.is_do_not_import())
        .filter_map(|(idx, option)| {
            let label_score = matcher.fuzzy_match(&option.label, header);
            let value_score = matcher.fuzzy_match(&option.value, header);
            label_score
                .max(value_score)
                .filter(|score| *score >= min_score)
                .map(|score| (idx, score))
        })
        .collect();

    // Stable sort keeps option order among equal scores
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(idx, _)| options[idx].clone())
        .collect()
}
