//! Value rules shared across the engine.

use serde_json::{Map, Value};

/// Literal include values that switch a relationship off
const OFF_MARKERS: &[&str] = &["0", "false"];

/// Check whether a value counts as "true" when used as a guard or flag.
///
/// Only `null` and `false` are falsy. Empty strings, `0` and empty
/// collections are all truthy.
///
/// # Examples
///
/// ```
/// use halite_core::is_truthy;
/// use serde_json::json;
///
/// assert!(is_truthy(&json!(0)));
/// assert!(is_truthy(&json!("")));
/// assert!(!is_truthy(&json!(null)));
/// assert!(!is_truthy(&json!(false)));
/// ```
pub fn is_truthy(value: &Value) -> bool {
	!matches!(value, Value::Null | Value::Bool(false))
}

/// Check whether an include value is one of the literal "off" markers
/// (`0`, `false`, `"0"`, `"false"`).
///
/// # Examples
///
/// ```
/// use halite_core::is_off_marker;
/// use serde_json::json;
///
/// assert!(is_off_marker(&json!(0)));
/// assert!(is_off_marker(&json!("false")));
/// assert!(!is_off_marker(&json!(true)));
/// assert!(!is_off_marker(&json!({})));
/// ```
pub fn is_off_marker(value: &Value) -> bool {
	match value {
		Value::Bool(flag) => OFF_MARKERS.contains(&flag.to_string().as_str()),
		Value::Number(number) => OFF_MARKERS.contains(&number.to_string().as_str()),
		Value::String(text) => OFF_MARKERS.contains(&text.as_str()),
		_ => false,
	}
}

/// Fold an option key to snake_case.
///
/// `includeLinks`, `include-links` and `INCLUDE_LINKS` all become
/// `include_links`.
pub fn normalize_key(key: &str) -> String {
	let mut normalized = String::with_capacity(key.len() + 4);
	let mut previous_lower = false;

	for c in key.trim().chars() {
		if c == '-' || c == ' ' {
			normalized.push('_');
			previous_lower = false;
		} else if c.is_uppercase() {
			if previous_lower {
				normalized.push('_');
			}
			normalized.extend(c.to_lowercase());
			previous_lower = false;
		} else {
			normalized.push(c);
			previous_lower = c.is_lowercase() || c.is_ascii_digit();
		}
	}

	normalized
}

/// Deep-merge `overlay` into `base`.
///
/// Where both sides hold a map under the same key the maps merge
/// recursively; otherwise the overlay value replaces the base value.
pub fn deep_merge(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
	for (key, incoming) in overlay {
		match (base.get_mut(key), incoming) {
			(Some(Value::Object(existing)), Value::Object(nested)) => {
				deep_merge(existing, nested);
			}
			_ => {
				base.insert(key.clone(), incoming.clone());
			}
		}
	}
}
