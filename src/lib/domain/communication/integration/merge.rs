//! Rules for combining per-call values with configured defaults

/// Returns `preferred` unless it is absent or empty, otherwise `fallback`.
///
/// The result is absent only when both sides are absent or empty.
pub fn first_non_empty(preferred: Option<&str>, fallback: Option<&str>) -> Option<String> {
    preferred
        .filter(|value| !value.is_empty())
        .or_else(|| fallback.filter(|value| !value.is_empty()))
        .map(str::to_string)
}

/// Combines configured defaults with values supplied at the call site.
///
/// With no defaults the supplied values are returned verbatim. Otherwise the
/// result is the set union: defaults first, then any supplied value not
/// already present.
pub fn merge<T: Clone + PartialEq>(defaults: &[T], supplied: Vec<T>) -> Vec<T> {
    if defaults.is_empty() {
        return supplied;
    }

    distinct(defaults.iter().cloned().chain(supplied))
}

/// Collapses duplicates, keeping the first occurrence of each value.
pub(crate) fn distinct<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut unique = Vec::new();

    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_empty_prefers_left() {
        assert_eq!(
            first_non_empty(Some("call"), Some("default")),
            Some("call".to_string())
        );
    }

    #[test]
    fn test_first_non_empty_falls_back_on_absent_or_empty() {
        assert_eq!(
            first_non_empty(None, Some("default")),
            Some("default".to_string())
        );
        assert_eq!(
            first_non_empty(Some(""), Some("default")),
            Some("default".to_string())
        );
    }

    #[test]
    fn test_first_non_empty_is_absent_when_both_are() {
        assert_eq!(first_non_empty(None, None), None);
        assert_eq!(first_non_empty(Some(""), Some("")), None);
        assert_eq!(first_non_empty(None, Some("")), None);
    }

    #[test]
    fn test_merge_without_defaults_returns_supplied_verbatim() {
        let supplied = vec!["c", "c", "d"];

        assert_eq!(merge(&[], supplied.clone()), supplied);
    }

    #[test]
    fn test_merge_with_defaults_is_union() {
        assert_eq!(merge(&["b"], vec!["c"]), vec!["b", "c"]);
        assert_eq!(merge(&["b", "c"], vec!["c", "d", "d"]), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_merge_with_defaults_and_nothing_supplied() {
        assert_eq!(merge(&["b"], Vec::new()), vec!["b"]);
    }

    #[test]
    fn test_distinct_keeps_first_occurrence() {
        assert_eq!(distinct([3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
