//! Search-bar front end for Memex.
//!
//! The filter language itself lives in [`query_syntax`]; this crate turns a
//! parsed search bar into the [`SearchFilterSet`] handed to the index query
//! executor.
//!
//! ```
//! use memex_search::{DateContext, SearchFilterSet};
//! let query = "rust c:reading from:2024-01-01 ";
//! let set = SearchFilterSet::parse(query, &DateContext::utc()).unwrap();
//! assert_eq!(set.lists_included, ["reading"]);
//! assert_eq!(set.date_from, Some(1_704_067_200_000));
//! ```
mod dates;
mod filter_set;

pub use dates::DateContext;
pub use filter_set::SearchFilterSet;
pub use query_syntax;
