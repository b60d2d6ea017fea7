//! Generic utilities used across core modules.

/// Case-insensitive subsequence match: every query char appears in `text`, in order,
/// not necessarily contiguous. An empty query matches everything.
pub fn fuzzy_match(text: &str, query: &str) -> bool {
    let mut haystack = text.chars().flat_map(char::to_lowercase);
    query
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| !c.is_whitespace())
        .all(|q| haystack.any(|c| c == q))
}

/// Filter items by fuzzy query matching on one string field.
/// Returns all items when query is empty.
pub fn filter_by_query<'a, T, F>(items: &'a [T], query: &str, get_field: F) -> Vec<&'a T>
where
    F: Fn(&'a T) -> &'a str,
{
    if query.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| fuzzy_match(get_field(*item), query))
        .collect()
}
