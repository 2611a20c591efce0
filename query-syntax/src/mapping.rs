use crate::{DateVariant, FilterDetail, FilterType};
use hashbrown::HashMap;
use once_cell::sync::Lazy;

/// One recognized filter prefix and the filter it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterKeyMapping {
    pub key: &'static str,
    pub filter_type: FilterType,
    pub is_exclusion: bool,
    pub variant: Option<DateVariant>,
}

impl FilterKeyMapping {
    const fn new(key: &'static str, filter_type: FilterType, is_exclusion: bool) -> Self {
        Self {
            key,
            filter_type,
            is_exclusion,
            variant: None,
        }
    }

    const fn date(key: &'static str, variant: DateVariant) -> Self {
        Self {
            key,
            filter_type: FilterType::Date,
            is_exclusion: false,
            variant: Some(variant),
        }
    }

    /// An empty detail seeded from this entry, as opened by the parser.
    pub fn detail(&self) -> FilterDetail {
        FilterDetail {
            is_exclusion: self.is_exclusion,
            variant: self.variant,
            ..FilterDetail::new(self.filter_type)
        }
    }
}

/// Every filter key the search bar understands.
///
/// The domain and list exclusions share their key with the inclusive entry,
/// so typing `d:` or `c:` always opens the inclusive filter. Key lookups
/// resolve to the first entry carrying the key.
pub static FILTER_KEY_MAPPING: &[FilterKeyMapping] = &[
    FilterKeyMapping::new("t", FilterType::Tag, false),
    FilterKeyMapping::new("-t", FilterType::Tag, true),
    FilterKeyMapping::new("d", FilterType::Domain, false),
    FilterKeyMapping::new("d", FilterType::Domain, true),
    FilterKeyMapping::new("c", FilterType::List, false),
    FilterKeyMapping::new("c", FilterType::List, true),
    FilterKeyMapping::date("from", DateVariant::From),
    FilterKeyMapping::date("to", DateVariant::To),
];

type CompositeKey = (FilterType, bool, Option<DateVariant>);

static BY_KEY: Lazy<HashMap<&'static str, &'static FilterKeyMapping>> = Lazy::new(|| {
    let mut index = HashMap::with_capacity(FILTER_KEY_MAPPING.len());
    for mapping in FILTER_KEY_MAPPING {
        index.entry(mapping.key).or_insert(mapping);
    }
    index
});

static BY_DETAIL: Lazy<HashMap<CompositeKey, &'static FilterKeyMapping>> = Lazy::new(|| {
    FILTER_KEY_MAPPING
        .iter()
        .map(|mapping| {
            (
                (mapping.filter_type, mapping.is_exclusion, mapping.variant),
                mapping,
            )
        })
        .collect()
});

// Longest first so `-t` is tried before `t`.
static KEYS_BY_LENGTH: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut keys: Vec<_> = BY_KEY.keys().copied().collect();
    keys.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    keys
});

/// Looks up the entry opened by typing `key:`.
///
/// ```
/// use query_syntax::{get_filter_mapping_from_key, FilterType};
/// let mapping = get_filter_mapping_from_key("-t").unwrap();
/// assert_eq!(mapping.filter_type, FilterType::Tag);
/// assert!(mapping.is_exclusion);
/// assert!(get_filter_mapping_from_key("x").is_none());
/// ```
pub fn get_filter_mapping_from_key(key: &str) -> Option<&'static FilterKeyMapping> {
    BY_KEY.get(key).copied()
}

/// Looks up the key a detail serializes to. Date filters are keyed by their
/// variant alone.
///
/// ```
/// use query_syntax::{get_filter_key_from_detail, DateVariant, FilterDetail, FilterType};
/// assert_eq!(get_filter_key_from_detail(&FilterDetail::new(FilterType::List)), Some("c"));
/// assert_eq!(get_filter_key_from_detail(&FilterDetail::date(DateVariant::To)), Some("to"));
/// assert_eq!(get_filter_key_from_detail(&FilterDetail::new(FilterType::Date)), None);
/// ```
pub fn get_filter_key_from_detail(detail: &FilterDetail) -> Option<&'static str> {
    if detail.filter_type == FilterType::Date {
        return match detail.variant? {
            DateVariant::From => Some("from"),
            DateVariant::To => Some("to"),
        };
    }
    BY_DETAIL
        .get(&(detail.filter_type, detail.is_exclusion, None))
        .map(|mapping| mapping.key)
}

/// Finds the key `fragment` ends with, if any.
///
/// The key has to start the fragment or follow whitespace, so `hat:` is not a
/// tag filter. Returns the mapping and the key's length in bytes.
pub(crate) fn match_key_suffix(fragment: &str) -> Option<(&'static FilterKeyMapping, usize)> {
    KEYS_BY_LENGTH.iter().find_map(|&key| {
        let preceding = fragment.strip_suffix(key)?;
        if !preceding.is_empty() && !preceding.ends_with(char::is_whitespace) {
            return None;
        }
        Some((BY_KEY[key], key.len()))
    })
}
