//! Query string parsing, merging and serialization.
//!
//! Parsing and serialization follow `application/x-www-form-urlencoded`, the
//! same rules a browser's `URLSearchParams` applies (`+` is a space, a
//! repeated key keeps its last value).

use crate::warn_log;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

/// Query parameters in the order they first appear.
pub type Query = IndexMap<String, String>;

/// Parses a query string, with or without its leading `?`.
pub fn parse_query(search: &str) -> Query {
	let search = search.strip_prefix('?').unwrap_or(search);
	if search.is_empty() {
		return Query::new();
	}

	match serde_urlencoded::from_str::<Vec<(String, String)>>(search) {
		Ok(pairs) => pairs.into_iter().collect(),
		Err(e) => {
			warn_log!("ignoring malformed query string '{}': {}", search, e);
			Query::new()
		}
	}
}

/// Serializes a query without the leading `?`.
pub fn serialize_query(query: &Query) -> String {
	let pairs: Vec<(&str, &str)> = query
		.iter()
		.map(|(k, v)| (k.as_str(), v.as_str()))
		.collect();
	serde_urlencoded::to_string(pairs).unwrap_or_default()
}

/// Applies a partial update over `current`.
///
/// `Some(value)` sets a key (existing keys keep their position, new keys are
/// appended). `None` and `Some("")` delete the key.
pub fn merge_query<I, K, V>(current: &Query, update: I) -> Query
where
	I: IntoIterator<Item = (K, Option<V>)>,
	K: Into<String>,
	V: Into<String>,
{
	let mut merged = current.clone();
	for (key, value) in update {
		let key = key.into();
		match value.map(Into::into) {
			Some(value) if !value.is_empty() => {
				merged.insert(key, value);
			}
			_ => {
				merged.shift_remove(&key);
			}
		}
	}
	merged
}

/// Decodes a query into a typed filter struct.
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct Filter { sort: Option<String>, page: Option<u32> }
///
/// let filter: Filter = decode_query(&router.query())?;
/// ```
pub fn decode_query<T: DeserializeOwned>(query: &Query) -> Result<T, serde_urlencoded::de::Error> {
	serde_urlencoded::from_str(&serialize_query(query))
}
