#[cfg(test)]
mod tests;

use crate::dates::{DateContext, parse_date_bound};
use anyhow::{Context, Result, bail};
use query_syntax::{DateVariant, FilterDetail, FilterType, QueryPart, parse_search_query};
use serde::Serialize;
use tracing::{debug, warn};

/// What the index query executor receives from the search bar: free-text
/// terms plus included/excluded tags, domains and lists and a date range in
/// unix milliseconds.
///
/// Only committed filter values count. A value the user is still typing
/// (the trailing `query` of a filter) is left out until it is completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilterSet {
    pub terms: Vec<String>,
    pub tags_included: Vec<String>,
    pub tags_excluded: Vec<String>,
    pub domains_included: Vec<String>,
    pub domains_excluded: Vec<String>,
    pub lists_included: Vec<String>,
    pub lists_excluded: Vec<String>,
    pub date_from: Option<i64>,
    pub date_to: Option<i64>,
}

impl SearchFilterSet {
    /// Parses a search-bar string and collects its filters.
    ///
    /// ```
    /// use memex_search::{DateContext, SearchFilterSet};
    /// let query = "dogs t:cute,funny -t:sad more";
    /// let set = SearchFilterSet::parse(query, &DateContext::utc()).unwrap();
    /// assert_eq!(set.terms, ["dogs", "more"]);
    /// assert_eq!(set.tags_included, ["cute", "funny"]);
    /// assert_eq!(set.tags_excluded, ["sad"]);
    /// ```
    pub fn parse(query: &str, context: &DateContext) -> Result<Self> {
        Self::from_query(&parse_search_query(query), context)
            .with_context(|| format!("Invalid search query: {query:?}"))
    }

    pub fn from_query(parts: &[QueryPart], context: &DateContext) -> Result<Self> {
        let mut set = Self::default();
        for part in parts {
            match part {
                QueryPart::SearchString { value, .. } => {
                    for term in value.split_whitespace() {
                        push_unique(&mut set.terms, term);
                    }
                }
                QueryPart::Filter { detail, .. } => set.add_filter(detail, context)?,
            }
        }
        if let (Some(from), Some(to)) = (set.date_from, set.date_to) {
            if from > to {
                bail!("date range start must not exceed end");
            }
        }
        debug!(?set, "Built search filter set");
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn add_filter(&mut self, detail: &FilterDetail, context: &DateContext) -> Result<()> {
        let values = match (detail.filter_type, detail.is_exclusion) {
            (FilterType::Tag, false) => &mut self.tags_included,
            (FilterType::Tag, true) => &mut self.tags_excluded,
            (FilterType::Domain, false) => &mut self.domains_included,
            (FilterType::Domain, true) => &mut self.domains_excluded,
            (FilterType::List, false) => &mut self.lists_included,
            (FilterType::List, true) => &mut self.lists_excluded,
            (FilterType::Date, _) => return self.add_date(detail, context),
        };
        for value in &detail.filters {
            push_unique(values, value);
        }
        Ok(())
    }

    // Later values override earlier ones. Date values are committed while
    // still being typed, so ones that do not parse are skipped.
    fn add_date(&mut self, detail: &FilterDetail, context: &DateContext) -> Result<()> {
        let Some(variant) = detail.variant else {
            bail!("date filter is missing its from/to variant");
        };
        for value in &detail.filters {
            let bound = match parse_date_bound(value, variant, context) {
                Ok(bound) => bound,
                Err(error) => {
                    warn!(?error, ?variant, %value, "Skipping date filter value");
                    continue;
                }
            };
            match variant {
                DateVariant::From => self.date_from = Some(bound),
                DateVariant::To => self.date_to = Some(bound),
            }
        }
        Ok(())
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}
