use crate::{FilterDetail, FilterType, QueryPart, mapping::get_filter_key_from_detail};
use std::fmt;
use tracing::warn;

/// Returned by [`construct_query_string`] when a part cannot be written back.
pub const QUERY_STRING_ERROR: &str = "Error constructing query string";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeError {
    pub message: String,
    pub part: usize,
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at part {})", self.message, self.part)
    }
}

impl std::error::Error for SerializeError {}

/// Rebuilds the search-bar string from parsed (and possibly edited) parts.
///
/// Only fails on a filter part that has no key, such as a date filter
/// without a variant.
pub fn try_construct_query_string(parts: &[QueryPart]) -> Result<String, SerializeError> {
    parts
        .iter()
        .enumerate()
        .try_fold(String::new(), |mut out, (index, part)| {
            match part {
                QueryPart::SearchString { value, .. } => out.push_str(value),
                QueryPart::Filter { detail, .. } => {
                    let key = get_filter_key_from_detail(detail).ok_or_else(|| SerializeError {
                        message: format!(
                            "no filter key for {:?} (exclusion: {}, variant: {:?})",
                            detail.filter_type, detail.is_exclusion, detail.variant
                        ),
                        part: index,
                    })?;
                    write_filter(&mut out, key, detail, parts.get(index + 1));
                }
            }
            Ok(out)
        })
}

/// Like [`try_construct_query_string`], but hands back
/// [`QUERY_STRING_ERROR`] instead of an error so the search bar always has
/// something to show.
///
/// ```
/// use query_syntax::{construct_query_string, parse_search_query};
/// let query = r#"c:"my list",other d:-t:"#;
/// assert_eq!(construct_query_string(&parse_search_query(query)), query);
/// ```
pub fn construct_query_string(parts: &[QueryPart]) -> String {
    try_construct_query_string(parts).unwrap_or_else(|error| {
        warn!(%error, "Failed to construct query string");
        QUERY_STRING_ERROR.to_string()
    })
}

/// Joins values with commas, quoting those that would not survive a
/// re-parse on their own (whitespace, commas, quotes).
///
/// ```
/// use query_syntax::get_raw_content_from_filters_array;
/// let values = ["cats".to_string(), "big dogs".to_string()];
/// assert_eq!(get_raw_content_from_filters_array(&values), r#"cats,"big dogs""#);
/// ```
pub fn get_raw_content_from_filters_array(filters: &[String]) -> String {
    let mut raw = String::new();
    push_values(&mut raw, filters, false);
    raw
}

// A filter only ends at whitespace or after a closing quote, so a part that
// starts right after it needs that quote to stay separate.
fn glued_to(next: Option<&QueryPart>) -> bool {
    match next {
        Some(QueryPart::SearchString { value, .. }) => {
            value.starts_with(|ch: char| !ch.is_whitespace())
        }
        Some(QueryPart::Filter { .. }) => true,
        None => false,
    }
}

fn push_values(out: &mut String, filters: &[String], quote_last: bool) {
    for (i, value) in filters.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if needs_quoting(value) || (quote_last && i + 1 == filters.len()) {
            push_quoted(out, value);
        } else {
            out.push_str(value);
        }
    }
}

fn write_filter(out: &mut String, key: &str, detail: &FilterDetail, next: Option<&QueryPart>) {
    let glued = glued_to(next);
    // An unquoted non-date value at the end of input reads back as still typed.
    let close_last = glued || (next.is_none() && detail.filter_type != FilterType::Date);
    out.push_str(key);
    out.push(':');
    push_values(out, &detail.filters, close_last && detail.query.is_none());
    match &detail.query {
        Some(query) => {
            if !detail.filters.is_empty() {
                out.push(',');
            }
            if glued {
                push_quoted(out, query);
            } else {
                push_in_progress(out, query);
            }
        }
        None if glued && detail.filters.is_empty() => out.push_str("\"\""),
        None => {}
    }
}

fn push_quoted(out: &mut String, value: &str) {
    out.push('"');
    push_escaped(out, value);
    out.push('"');
}

// A value still being typed gets an opening quote only: the closing one has
// not been typed yet.
fn push_in_progress(out: &mut String, query: &str) {
    if needs_quoting(query) {
        out.push('"');
        push_escaped(out, query);
    } else {
        out.push_str(query);
    }
}

fn needs_quoting(value: &str) -> bool {
    value
        .chars()
        .any(|ch| ch.is_whitespace() || matches!(ch, ',' | '"'))
}

fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
}
