#![allow(dead_code)]
//! Shared helpers for `query-syntax` integration tests.

use query_syntax::*;

pub fn parse(input: &str) -> ParsedSearchQuery {
    parse_search_query(input)
}

pub fn round_trip(input: &str) -> String {
    construct_query_string(&parse_search_query(input))
}

pub fn as_filter(part: &QueryPart) -> &FilterDetail {
    match part {
        QueryPart::Filter { detail, .. } => detail,
        other => panic!("expected Filter, got: {other:?}"),
    }
}

pub fn text_is(part: &QueryPart, expected: &str) {
    match part {
        QueryPart::SearchString { value, .. } => assert_eq!(value, expected),
        other => panic!("expected SearchString, got: {other:?}"),
    }
}

pub fn filter_is(part: &QueryPart, filter_type: FilterType, is_exclusion: bool, filters: &[&str]) {
    let detail = as_filter(part);
    assert_eq!(detail.filter_type, filter_type);
    assert_eq!(detail.is_exclusion, is_exclusion);
    assert_eq!(detail.filters, filters);
}

pub fn query_is(part: &QueryPart, expected: Option<&str>) {
    assert_eq!(as_filter(part).query.as_deref(), expected);
}

pub fn span_is(part: &QueryPart, start: usize, end: usize) {
    assert_eq!((part.start_index(), part.end_index()), (start, end), "{part:?}");
}

/// Parts must cover `input` left to right with no gaps or overlaps, and no
/// two free-text parts may be adjacent.
pub fn assert_partition(input: &str) {
    let parts = parse_search_query(input);
    let len = input.chars().count();
    if len == 0 {
        assert!(parts.is_empty(), "{input:?} -> {parts:?}");
        return;
    }
    let mut next = 0;
    for part in &parts {
        assert_eq!(part.start_index(), next, "gap or overlap in {input:?}: {parts:?}");
        assert!(part.end_index() >= part.start_index(), "{input:?}: {parts:?}");
        next = part.end_index() + 1;
    }
    assert_eq!(next, len, "parts of {input:?} stop early: {parts:?}");

    for pair in parts.windows(2) {
        let both_text = matches!(
            pair,
            [QueryPart::SearchString { .. }, QueryPart::SearchString { .. }]
        );
        assert!(!both_text, "adjacent free text in {input:?}: {parts:?}");
    }
}

pub type PartSummary = (Option<FilterType>, bool, Vec<String>, Option<String>, String);

/// Filter contents and free text as a comparable summary.
pub fn semantics(input: &str) -> Vec<PartSummary> {
    parse_search_query(input)
        .into_iter()
        .map(|part| match part {
            QueryPart::SearchString { value, .. } => (None, false, Vec::new(), None, value),
            QueryPart::Filter { detail, .. } => (
                Some(detail.filter_type),
                detail.is_exclusion,
                detail.filters,
                detail.query.filter(|q| !q.is_empty()),
                String::new(),
            ),
        })
        .collect()
}
