//! Substring filtering for autocomplete options.

use crate::value::SelectOption;

/// Indices of the options whose label or value contains `term`,
/// case-insensitively, in their original order.
///
/// An empty term matches everything. The result depends only on the
/// arguments, so filtering the same inputs twice yields the same list.
pub fn filter_options(options: &[SelectOption], term: &str) -> Vec<usize> {
    if term.is_empty() {
        return (0..options.len()).collect();
    }

    let needle = term.to_lowercase();
    options
        .iter()
        .enumerate()
        .filter(|(_, option)| {
            option.label.to_lowercase().contains(&needle)
                || option.value.to_lowercase().contains(&needle)
        })
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> Vec<SelectOption> {
        vec![
            SelectOption::new("Berlin", "berlin"),
            SelectOption::new("Hamburg", "hamburg"),
            SelectOption::new("Bern", "ch-bern"),
            SelectOption::new("Munich", "muenchen"),
        ]
    }

    #[test]
    fn test_substring_not_fuzzy() {
        let options = cities();
        assert_eq!(filter_options(&options, "ber"), vec![0, 2]);
        // "bn" is a fuzzy match for Berlin but not a substring
        assert!(filter_options(&options, "bn").is_empty());
    }

    #[test]
    fn test_matches_value_and_ignores_case() {
        let options = cities();
        assert_eq!(filter_options(&options, "MUEN"), vec![3]);
        assert_eq!(filter_options(&options, "ch-"), vec![2]);
    }

    #[test]
    fn test_empty_term_matches_all() {
        let options = cities();
        assert_eq!(filter_options(&options, ""), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_filter_is_pure_and_a_subset() {
        let options = cities();
        for term in ["", "b", "er", "urg", "zzz", "N"] {
            let first = filter_options(&options, term);
            let second = filter_options(&options, term);
            assert_eq!(first, second);
            assert!(first.iter().all(|&i| i < options.len()));
            assert!(first.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
