use crate::{
    FilterDetail, FilterType, QueryPart, mapping::get_filter_key_from_detail,
    parser::parse_search_query, serializer::construct_query_string,
};

/// Appends an empty `key:` for `detail` so the user can start typing values.
///
/// ```
/// use query_syntax::{push_filter_key_to_query_string, FilterDetail, FilterType};
/// let list = FilterDetail::new(FilterType::List);
/// assert_eq!(push_filter_key_to_query_string(&list, "").as_deref(), Some("c:"));
/// assert_eq!(push_filter_key_to_query_string(&list, "cats").as_deref(), Some("cats c:"));
/// assert_eq!(push_filter_key_to_query_string(&list, "cats ").as_deref(), Some("cats c:"));
/// ```
pub fn push_filter_key_to_query_string(detail: &FilterDetail, query: &str) -> Option<String> {
    let key = get_filter_key_from_detail(detail)?;
    let mut out = String::with_capacity(query.len() + key.len() + 2);
    out.push_str(query);
    if !query.is_empty() && !query.ends_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(key);
    out.push(':');
    Some(out)
}

/// Replaces the values of the first filter matching `detail` and writes the
/// query back. `None` when the query has no such filter.
///
/// ```
/// use query_syntax::{update_filters_in_query_string, FilterDetail, FilterType};
/// let tags = FilterDetail::new(FilterType::Tag).with_filters(["cats", "dogs"]);
/// assert_eq!(
///     update_filters_in_query_string(&tags, "pets t:ca").as_deref(),
///     Some(r#"pets t:cats,"dogs""#),
/// );
/// assert_eq!(update_filters_in_query_string(&tags, "pets"), None);
/// ```
pub fn update_filters_in_query_string(detail: &FilterDetail, query: &str) -> Option<String> {
    let mut parts = parse_search_query(query);
    let index = find_matching_filter_part_index(&parts, detail)?;
    let QueryPart::Filter { detail: target, .. } = &mut parts[index] else {
        return None;
    };
    target.filters = detail.filters.clone();
    target.raw_content = detail.raw_content.clone();
    target.is_exclusion = detail.is_exclusion;
    target.variant = detail.variant;
    target.query = detail.query.clone();
    Some(construct_query_string(&parts))
}

/// Drops empty `key:` placeholders for the filter `detail` names, leaving
/// other filters (empty or not) alone.
///
/// ```
/// use query_syntax::{remove_empty_filter_strings_from_query_string, FilterDetail, FilterType};
/// let tags = FilterDetail::new(FilterType::Tag);
/// assert_eq!(remove_empty_filter_strings_from_query_string(&tags, "t: hello"), " hello");
/// assert_eq!(remove_empty_filter_strings_from_query_string(&tags, "c: t:x"), "c: t:x");
/// ```
pub fn remove_empty_filter_strings_from_query_string(detail: &FilterDetail, query: &str) -> String {
    let key = get_filter_key_from_detail(detail);
    let parts: Vec<QueryPart> = parse_search_query(query)
        .into_iter()
        .filter(|part| match part {
            QueryPart::Filter { detail: existing, .. } => {
                !(existing.is_empty() && get_filter_key_from_detail(existing) == key)
            }
            QueryPart::SearchString { .. } => true,
        })
        .collect();
    construct_query_string(&parts)
}

/// Position of the first filter part with the same type, variant and
/// exclusion flag as `detail`.
pub fn find_matching_filter_part_index(
    parts: &[QueryPart],
    detail: &FilterDetail,
) -> Option<usize> {
    parts.iter().position(|part| {
        part.as_filter().is_some_and(|existing| {
            existing.filter_type == detail.filter_type
                && existing.variant == detail.variant
                && existing.is_exclusion == detail.is_exclusion
        })
    })
}

/// Type of the filter the cursor is in, or `None` when it is in free text.
///
/// ```
/// use query_syntax::{get_cursor_position_filter_type, FilterType};
/// let query = "d:example.com text";
/// assert_eq!(get_cursor_position_filter_type(query, 5), Some(FilterType::Domain));
/// assert_eq!(get_cursor_position_filter_type(query, 15), None);
/// ```
pub fn get_cursor_position_filter_type(query: &str, cursor: usize) -> Option<FilterType> {
    parse_search_query(query)
        .iter()
        .find(|part| part.contains_cursor(cursor))?
        .as_filter()
        .map(|detail| detail.filter_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DateVariant;

    #[test]
    fn push_appends_exclusion_key() {
        let detail = FilterDetail::excluded(FilterType::Tag);
        assert_eq!(
            push_filter_key_to_query_string(&detail, "t:cats").as_deref(),
            Some("t:cats -t:")
        );
    }

    #[test]
    fn push_after_tab_adds_no_space() {
        let detail = FilterDetail::date(DateVariant::To);
        assert_eq!(
            push_filter_key_to_query_string(&detail, "x\t").as_deref(),
            Some("x\tto:")
        );
    }

    #[test]
    fn push_without_key_is_none() {
        let detail = FilterDetail::new(FilterType::Date);
        assert_eq!(push_filter_key_to_query_string(&detail, "x"), None);
    }

    #[test]
    fn update_keeps_surrounding_text() {
        let detail = FilterDetail::date(DateVariant::From).with_query("");
        assert_eq!(
            update_filters_in_query_string(&detail, "from: text").as_deref(),
            Some("from: text")
        );
    }

    #[test]
    fn update_only_touches_first_match() {
        let detail = FilterDetail::new(FilterType::Domain).with_filters(["a.com", "b.com"]);
        assert_eq!(
            update_filters_in_query_string(&detail, "d:x.com t:y d:z.com").as_deref(),
            Some("d:a.com,b.com t:y d:z.com")
        );
    }

    #[test]
    fn update_distinguishes_exclusion() {
        let detail = FilterDetail::excluded(FilterType::Tag).with_filters(["old"]);
        assert_eq!(
            update_filters_in_query_string(&detail, "t:new -t:x").as_deref(),
            Some(r#"t:new -t:"old""#)
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let detail = FilterDetail::new(FilterType::List);
        let once = remove_empty_filter_strings_from_query_string(&detail, "c: cats c:");
        let twice = remove_empty_filter_strings_from_query_string(&detail, &once);
        assert_eq!(once, " cats ");
        assert_eq!(once, twice);
    }

    #[test]
    fn remove_keeps_filters_with_values_or_queries() {
        let detail = FilterDetail::new(FilterType::Tag);
        assert_eq!(
            remove_empty_filter_strings_from_query_string(&detail, "t:a t:b"),
            "t:a t:b"
        );
        assert_eq!(
            remove_empty_filter_strings_from_query_string(&detail, "-t: t:"),
            "-t: "
        );
    }

    #[test]
    fn find_returns_first_matching_filter() {
        let parts = parse_search_query("x t:a to:2024-01-01 t:b");
        assert_eq!(
            find_matching_filter_part_index(&parts, &FilterDetail::new(FilterType::Tag)),
            Some(1)
        );
        assert_eq!(
            find_matching_filter_part_index(&parts, &FilterDetail::date(DateVariant::To)),
            Some(3)
        );
        assert_eq!(
            find_matching_filter_part_index(&parts, &FilterDetail::date(DateVariant::From)),
            None
        );
    }

    #[test]
    fn cursor_at_end_of_filter_is_inside_it() {
        assert_eq!(get_cursor_position_filter_type("t:ca", 4), Some(FilterType::Tag));
        assert_eq!(get_cursor_position_filter_type("", 0), None);
        assert_eq!(get_cursor_position_filter_type("t:ca", 40), None);
    }
}
