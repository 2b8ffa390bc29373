use serde_json::{Map, Value};

/// Partial structured property query: a mapping from search-parameter keys
/// (city, locality, bedrooms, min_price, max_price, property_type,
/// listing_type, and lifestyle flags) to scalar or boolean values.
///
/// No key or type validation happens at this layer; query construction
/// decides which keys it recognizes.
pub type FilterMap = Map<String, Value>;

/// Right-biased shallow union: every key of `extracted` overwrites the
/// corresponding key in `prior`, keys only in `prior` are kept verbatim.
///
/// This is what lets a follow-up turn narrow or replace one criterion
/// while the rest of the accumulated context persists.
pub fn merge(prior: &FilterMap, extracted: &FilterMap) -> FilterMap {
	let mut merged = prior.clone();

	for (key, value) in extracted {
		merged.insert(key.clone(), value.clone());
	}

	merged
}

/// Reads a persisted filter state back into a [`FilterMap`].
///
/// Anything that is not a JSON object is treated as an empty state.
pub fn filters_from_value(value: &Value) -> FilterMap {
	value.as_object().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn map(pairs: &[(&str, Value)]) -> FilterMap {
		pairs.iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
	}

	#[test]
	fn merge_is_right_biased() {
		let prior = map(&[("city", "Bangalore".into()), ("max_price", 30_000.into())]);
		let extracted = map(&[("max_price", 20_000.into())]);
		let merged = merge(&prior, &extracted);

		assert_eq!(merged.get("city"), Some(&Value::from("Bangalore")));
		assert_eq!(merged.get("max_price"), Some(&Value::from(20_000)));
	}

	#[test]
	fn merge_with_empty_extraction_is_a_no_op() {
		let prior = map(&[("city", "Pune".into()), ("bedrooms", 2.into())]);
		let merged = merge(&prior, &FilterMap::new());

		assert_eq!(merged, prior);
	}

	#[test]
	fn merge_keeps_keys_absent_from_either_side_absent() {
		let prior = map(&[("city", "Delhi".into())]);
		let extracted = map(&[("near_metro", true.into())]);
		let merged = merge(&prior, &extracted);

		assert_eq!(merged.len(), 2);
		assert!(!merged.contains_key("locality"));
	}

	#[test]
	fn filters_from_value_tolerates_non_objects() {
		assert!(filters_from_value(&Value::Null).is_empty());
		assert!(filters_from_value(&Value::from("oops")).is_empty());

		let state = filters_from_value(&serde_json::json!({ "city": "Chennai" }));

		assert_eq!(state.get("city"), Some(&Value::from("Chennai")));
	}
}
