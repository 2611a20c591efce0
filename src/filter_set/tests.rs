use super::*;
use query_syntax::{construct_query_string, update_filters_in_query_string};

const JAN_1_2024_UTC_MS: i64 = 1_704_067_200_000;
const DAY_MS: i64 = 86_400_000;

fn parse(query: &str) -> SearchFilterSet {
    SearchFilterSet::parse(query, &DateContext::utc()).unwrap()
}

#[test]
fn empty_query_is_empty_set() {
    assert!(parse("").is_empty());
    assert!(parse("   ").is_empty());
    assert!(parse("t: c: from:").is_empty());
}

#[test]
fn collects_every_filter_kind() {
    let set = parse(concat!(
        r#"notes t:rust,"async io" -t:draft d:docs.rs c:reading "#,
        "from:2024-01-01 to:2024-01-31 later",
    ));
    assert_eq!(set.terms, ["notes", "later"]);
    assert_eq!(set.tags_included, ["rust", "async io"]);
    assert_eq!(set.tags_excluded, ["draft"]);
    assert_eq!(set.domains_included, ["docs.rs"]);
    assert!(set.domains_excluded.is_empty());
    assert_eq!(set.lists_included, ["reading"]);
    assert!(set.lists_excluded.is_empty());
    assert_eq!(set.date_from, Some(JAN_1_2024_UTC_MS));
    assert_eq!(set.date_to, Some(JAN_1_2024_UTC_MS + 31 * DAY_MS - 1));
}

#[test]
fn in_progress_values_are_not_committed() {
    let set = parse("t:rust,asy");
    assert_eq!(set.tags_included, ["rust"]);
}

#[test]
fn repeated_values_are_collapsed() {
    let set = parse("a t:x t:x,y a b");
    assert_eq!(set.terms, ["a", "b"]);
    assert_eq!(set.tags_included, ["x", "y"]);
}

#[test]
fn last_date_bound_wins() {
    let set = parse("from:2023-06-01 from:2024-01-01 ");
    assert_eq!(set.date_from, Some(JAN_1_2024_UTC_MS));
    assert_eq!(set.date_to, None);
}

#[test]
fn exclusions_built_from_details_are_kept() {
    // `d:`/`c:` always parse as inclusive, but edited parts can carry
    // exclusions straight to the executor.
    let parts = [
        QueryPart::Filter {
            start_index: 0,
            end_index: 0,
            detail: FilterDetail::excluded(FilterType::Domain).with_filters(["spam.com"]),
        },
        QueryPart::Filter {
            start_index: 0,
            end_index: 0,
            detail: FilterDetail::excluded(FilterType::List).with_filters(["inbox"]),
        },
    ];
    let set = SearchFilterSet::from_query(&parts, &DateContext::utc()).unwrap();
    assert_eq!(set.domains_excluded, ["spam.com"]);
    assert_eq!(set.lists_excluded, ["inbox"]);
}

#[test]
fn rejects_inverted_date_range() {
    let err = SearchFilterSet::parse("from:2024-02-01 to:2024-01-01 ", &DateContext::utc())
        .unwrap_err();
    assert!(format!("{err:#}").contains("date range start must not exceed end"));
}

#[test]
fn half_typed_date_keeps_the_rest_of_the_set() {
    let set = parse("dogs t:cute from:2024-");
    assert_eq!(set.terms, ["dogs"]);
    assert_eq!(set.tags_included, ["cute"]);
    assert_eq!(set.date_from, None);
}

#[test]
fn unparsable_date_keeps_the_previous_bound() {
    let set = parse("from:2024-01-01 from:yesterday to:2024-0");
    assert_eq!(set.date_from, Some(JAN_1_2024_UTC_MS));
    assert_eq!(set.date_to, None);
}

#[test]
fn rejects_date_without_variant() {
    let parts = [QueryPart::Filter {
        start_index: 0,
        end_index: 0,
        detail: FilterDetail::new(FilterType::Date).with_filters(["2024-01-01"]),
    }];
    assert!(SearchFilterSet::from_query(&parts, &DateContext::utc()).is_err());
}

#[test]
fn picker_updates_flow_into_the_set() {
    let query = update_filters_in_query_string(
        &FilterDetail::new(FilterType::List).with_filters(["read later", "work"]),
        "c: research",
    )
    .unwrap();
    let set = parse(&query);
    assert_eq!(set.lists_included, ["read later", "work"]);
    assert_eq!(set.terms, ["research"]);
    assert_eq!(
        construct_query_string(&parse_search_query(&query)),
        r#"c:"read later",work research"#
    );
}

#[test]
fn serializes_for_the_executor() {
    let set = parse("t:a to:1704067200000 ");
    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(json["tagsIncluded"], serde_json::json!(["a"]));
    assert_eq!(json["dateTo"], serde_json::json!(JAN_1_2024_UTC_MS));
    assert_eq!(json["dateFrom"], serde_json::Value::Null);
}
