//! Placeholder normalisation for behavioural steps.

/// Strips one layer of matching single or double quotes.
#[must_use]
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            trimmed
                .strip_prefix(quote)
                .and_then(|inner| inner.strip_suffix(quote))
        })
        .unwrap_or(trimmed)
}

/// Splits a comma-separated placeholder into unquoted, non-empty items.
///
/// # Examples
///
/// ```
/// use resbind_test_helpers::text::split_list;
///
/// assert_eq!(split_list("\"a\", b ,"), vec!["a", "b"]);
/// ```
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    unquote(value)
        .split(',')
        .map(unquote)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
