//! # Memex's search-bar filter language
//!
//! `query-syntax` turns the live contents of the search bar into an ordered,
//! position-indexed list of [`QueryPart`]s and back again. Users mix free text
//! with filter directives such as `t:` (tags), `-t:` (excluded tags), `d:`
//! (domains), `c:` (collections/lists) and `from:`/`to:` (date range). The
//! parser never fails: text it cannot interpret stays free text, so a
//! half-typed query never blocks the user.
//!
//! ## Example
//! ```
//! use query_syntax::{construct_query_string, parse_search_query, FilterType, QueryPart};
//!
//! let parts = parse_search_query("dogs t:cute,funny more text");
//! assert_eq!(parts.len(), 3);
//! assert!(matches!(&parts[0], QueryPart::SearchString { value, .. } if value == "dogs "));
//! let QueryPart::Filter { detail, .. } = &parts[1] else { panic!() };
//! assert_eq!(detail.filter_type, FilterType::Tag);
//! assert_eq!(detail.filters, ["cute", "funny"]);
//!
//! // parsing then serializing gives the string back
//! assert_eq!(construct_query_string(&parts), "dogs t:cute,funny more text");
//! ```

mod mapping;
mod mutation;
mod parser;
mod serializer;

pub use mapping::{
    FILTER_KEY_MAPPING, FilterKeyMapping, get_filter_key_from_detail, get_filter_mapping_from_key,
};
pub use mutation::{
    find_matching_filter_part_index, get_cursor_position_filter_type,
    push_filter_key_to_query_string, remove_empty_filter_strings_from_query_string,
    update_filters_in_query_string,
};
pub use parser::parse_search_query;
pub use serializer::{
    QUERY_STRING_ERROR, SerializeError, construct_query_string, get_raw_content_from_filters_array,
    try_construct_query_string,
};

use serde::{Deserialize, Serialize};

/// Left-to-right sequence of parts covering the whole input string.
pub type ParsedSearchQuery = Vec<QueryPart>;

/// Semantic category of a filter directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    Tag,
    Domain,
    List,
    Date,
}

/// Which end of a date range a `from:`/`to:` filter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateVariant {
    From,
    To,
}

/// Everything the search bar knows about one filter directive.
///
/// `filters` holds the comma-terminated values, `query` the value still being
/// typed at the end of the input, and `raw_content` the exact text that
/// followed `key:` in the source string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDetail {
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    #[serde(default)]
    pub is_exclusion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<DateVariant>,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default)]
    pub raw_content: String,
}

impl FilterDetail {
    /// An inclusive filter of `filter_type` with no values.
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            filter_type,
            is_exclusion: false,
            variant: None,
            filters: Vec::new(),
            query: None,
            raw_content: String::new(),
        }
    }

    /// An exclusion filter of `filter_type` with no values.
    pub fn excluded(filter_type: FilterType) -> Self {
        Self {
            is_exclusion: true,
            ..Self::new(filter_type)
        }
    }

    /// A `from:`/`to:` filter with no values.
    pub fn date(variant: DateVariant) -> Self {
        Self {
            variant: Some(variant),
            ..Self::new(FilterType::Date)
        }
    }

    /// Replaces the completed values, keeping `raw_content` in sync.
    pub fn with_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = filters.into_iter().map(Into::into).collect();
        self.raw_content = get_raw_content_from_filters_array(&self.filters);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// The literal key (`t`, `-t`, `from`, ...) this detail serializes to.
    pub fn key(&self) -> Option<&'static str> {
        get_filter_key_from_detail(self)
    }

    /// No completed values and nothing being typed.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.query.as_deref().is_none_or(str::is_empty)
    }
}

/// One run of the search bar: free text or a filter directive.
///
/// Indices are inclusive and count `char`s, so they line up with a cursor
/// position reported by a text input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum QueryPart {
    /// A run of free text, e.g. `"dogs "`.
    ///
    /// ```
    /// use query_syntax::{parse_search_query, QueryPart};
    /// let parts = parse_search_query("hello world");
    /// assert_eq!((parts[0].start_index(), parts[0].end_index()), (0, 10));
    /// assert!(matches!(&parts[..], [QueryPart::SearchString { .. }]));
    /// ```
    SearchString {
        start_index: usize,
        end_index: usize,
        value: String,
    },
    /// A `key:values` directive, e.g. `t:cute,funny`.
    ///
    /// ```
    /// use query_syntax::{parse_search_query, FilterType, QueryPart};
    /// let parts = parse_search_query("-t:boring");
    /// let [QueryPart::Filter { detail, .. }] = &parts[..] else { panic!() };
    /// assert_eq!(detail.filter_type, FilterType::Tag);
    /// assert!(detail.is_exclusion);
    /// ```
    Filter {
        start_index: usize,
        end_index: usize,
        detail: FilterDetail,
    },
}

impl QueryPart {
    pub fn start_index(&self) -> usize {
        match self {
            QueryPart::SearchString { start_index, .. } | QueryPart::Filter { start_index, .. } => {
                *start_index
            }
        }
    }

    pub fn end_index(&self) -> usize {
        match self {
            QueryPart::SearchString { end_index, .. } | QueryPart::Filter { end_index, .. } => {
                *end_index
            }
        }
    }

    pub fn as_filter(&self) -> Option<&FilterDetail> {
        match self {
            QueryPart::Filter { detail, .. } => Some(detail),
            QueryPart::SearchString { .. } => None,
        }
    }

    /// Whether a text cursor at `cursor` is touching this part.
    ///
    /// A cursor sitting right after the last character still counts, that is
    /// where the user keeps typing.
    pub fn contains_cursor(&self, cursor: usize) -> bool {
        self.start_index() <= cursor && cursor <= self.end_index() + 1
    }
}
