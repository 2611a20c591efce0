use crate::{
    FilterDetail, FilterType, ParsedSearchQuery, QueryPart,
    mapping::{self, FilterKeyMapping},
};

/// Splits a search-bar string into free text and filter parts.
///
/// The returned parts cover every character of `input` in order, with no gaps
/// or overlaps. Malformed input is never an error; at worst the whole string
/// comes back as one [`QueryPart::SearchString`].
///
/// ```
/// use query_syntax::{parse_search_query, QueryPart};
/// let parts = parse_search_query("t:\"in progress");
/// let [QueryPart::Filter { detail, .. }] = &parts[..] else { panic!() };
/// assert!(detail.filters.is_empty());
/// assert_eq!(detail.query.as_deref(), Some("in progress"));
/// ```
pub fn parse_search_query(input: &str) -> ParsedSearchQuery {
    Parser::new().parse(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FreeText,
    InFilter,
    InFilterQuoted { escaped: bool },
    JustClosedQuote,
}

struct OpenFilter {
    start_index: usize,
    detail: FilterDetail,
    // Text of the value being scanned, quotes included.
    value: String,
}

impl OpenFilter {
    fn new(start_index: usize, mapping: &FilterKeyMapping) -> Self {
        Self {
            start_index,
            detail: mapping.detail(),
            value: String::new(),
        }
    }

    fn push(&mut self, ch: char) {
        self.detail.raw_content.push(ch);
        self.value.push(ch);
    }

    fn push_separator(&mut self) {
        self.detail.raw_content.push(',');
        self.commit_value();
    }

    fn commit_value(&mut self) {
        let value = strip_quotes(&std::mem::take(&mut self.value));
        if !value.is_empty() {
            self.detail.filters.push(value);
        }
    }

    // Input ended while the value was still open: unless this is a date, the
    // last value is the one being typed.
    fn finish_in_progress(mut self) -> FilterDetail {
        if self.detail.filter_type == FilterType::Date {
            self.commit_value();
            return self.detail;
        }
        let started = !self.value.is_empty() || self.detail.raw_content.ends_with(',');
        if started {
            self.detail.query = Some(strip_quotes(&self.value));
        }
        self.detail
    }
}

/// Append-only part list that keeps free text merged.
#[derive(Default)]
struct PartsBuilder {
    parts: ParsedSearchQuery,
}

impl PartsBuilder {
    fn text(&mut self, start_index: usize, end_index: usize, text: &str) -> &mut Self {
        if let Some(QueryPart::SearchString {
            end_index: last_end,
            value,
            ..
        }) = self.parts.last_mut()
        {
            *last_end = end_index;
            value.push_str(text);
            return self;
        }
        self.parts.push(QueryPart::SearchString {
            start_index,
            end_index,
            value: text.to_string(),
        });
        self
    }

    fn filter(&mut self, start_index: usize, end_index: usize, detail: FilterDetail) -> &mut Self {
        self.parts.push(QueryPart::Filter {
            start_index,
            end_index,
            detail,
        });
        self
    }

    fn build(self) -> ParsedSearchQuery {
        self.parts
    }
}

/// Character-at-a-time state machine. Free text accumulates in `fragment`
/// until a `key:` is recognized at its tail; filter values accumulate in the
/// open filter until unquoted whitespace (or a non-comma after a closing
/// quote) ends the segment.
struct Parser {
    state: State,
    fragment: String,
    fragment_start: usize,
    filter: Option<OpenFilter>,
    parts: PartsBuilder,
}

impl Parser {
    fn new() -> Self {
        Self {
            state: State::FreeText,
            fragment: String::new(),
            fragment_start: 0,
            filter: None,
            parts: PartsBuilder::default(),
        }
    }

    fn parse(mut self, input: &str) -> ParsedSearchQuery {
        let mut len = 0;
        for (index, ch) in input.chars().enumerate() {
            self.step(index, ch);
            len = index + 1;
        }
        self.finish(len)
    }

    fn step(&mut self, index: usize, ch: char) {
        match self.state {
            State::FreeText => self.free_text(index, ch),
            State::InFilter => {
                if ch.is_whitespace() {
                    self.close_filter(index - 1);
                    self.free_text(index, ch);
                    return;
                }
                let Some(filter) = self.filter.as_mut() else {
                    return;
                };
                match ch {
                    ',' => filter.push_separator(),
                    '"' => {
                        filter.push(ch);
                        self.state = State::InFilterQuoted { escaped: false };
                    }
                    _ => filter.push(ch),
                }
            }
            State::InFilterQuoted { escaped } => {
                if let Some(filter) = self.filter.as_mut() {
                    filter.push(ch);
                }
                self.state = match ch {
                    _ if escaped => State::InFilterQuoted { escaped: false },
                    '\\' => State::InFilterQuoted { escaped: true },
                    '"' => State::JustClosedQuote,
                    _ => State::InFilterQuoted { escaped: false },
                };
            }
            State::JustClosedQuote => {
                if ch == ',' {
                    if let Some(filter) = self.filter.as_mut() {
                        filter.push_separator();
                    }
                    self.state = State::InFilter;
                } else {
                    self.close_filter(index - 1);
                    self.free_text(index, ch);
                }
            }
        }
    }

    fn free_text(&mut self, index: usize, ch: char) {
        if ch == ':' {
            if let Some((mapping, key_len)) = mapping::match_key_suffix(&self.fragment) {
                self.open_filter(mapping, key_len);
                return;
            }
        }
        if self.fragment.is_empty() {
            self.fragment_start = index;
        }
        self.fragment.push(ch);
    }

    fn open_filter(&mut self, mapping: &FilterKeyMapping, key_len: usize) {
        let text = &self.fragment[..self.fragment.len() - key_len];
        let text_chars = text.chars().count();
        let key_start = self.fragment_start + text_chars;
        if text_chars > 0 {
            self.parts.text(self.fragment_start, key_start - 1, text);
        }
        self.fragment.clear();
        self.filter = Some(OpenFilter::new(key_start, mapping));
        self.state = State::InFilter;
    }

    fn close_filter(&mut self, end_index: usize) {
        if let Some(mut filter) = self.filter.take() {
            filter.commit_value();
            self.parts.filter(filter.start_index, end_index, filter.detail);
        }
        self.state = State::FreeText;
    }

    fn finish(mut self, len: usize) -> ParsedSearchQuery {
        match self.state {
            State::FreeText => {
                if !self.fragment.is_empty() {
                    self.parts.text(self.fragment_start, len - 1, &self.fragment);
                }
            }
            State::InFilter | State::InFilterQuoted { .. } => {
                if let Some(filter) = self.filter.take() {
                    let start_index = filter.start_index;
                    self.parts
                        .filter(start_index, len - 1, filter.finish_in_progress());
                }
            }
            State::JustClosedQuote => self.close_filter(len - 1),
        }
        self.parts.build()
    }
}

/// Removes the quoting around a value: a leading `"`, the first unescaped
/// `"` after it, and the `\"`/`\\` escapes in between. Unquoted values are
/// returned as typed.
pub(crate) fn strip_quotes(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"') else {
        return raw.to_string();
    };
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => break,
            '\\' => match chars.next() {
                Some(next @ ('"' | '\\')) => value.push(next),
                Some(next) => {
                    value.push('\\');
                    value.push(next);
                }
                None => value.push('\\'),
            },
            _ => value.push(ch),
        }
    }
    value
}
