//! Conversion of raw submitted form data into field wire values

use std::collections::HashMap;

/// Flattens multi-valued form data into one wire string per key.
///
/// A key submitted once keeps its value. A key submitted several times
/// (a `<select multiple>`) becomes a JSON array string, the wire format of
/// [`MultipleChoiceField`](crate::fields::MultipleChoiceField).
///
/// # Examples
///
/// ```
/// use rampart_forms::convert_form_data;
/// use std::collections::HashMap;
///
/// let submitted = HashMap::from([
/// 	("title".to_string(), vec!["Hello".to_string()]),
/// 	("tags".to_string(), vec!["a".to_string(), "b".to_string()]),
/// ]);
/// let wire = convert_form_data(&submitted);
/// assert_eq!(wire["title"], "Hello");
/// assert_eq!(wire["tags"], r#"["a","b"]"#);
/// ```
pub fn convert_form_data(data: &HashMap<String, Vec<String>>) -> HashMap<String, String> {
	data.iter()
		.map(|(key, values)| {
			let wire = match values.as_slice() {
				[] => String::new(),
				[single] => single.clone(),
				many => serde_json::Value::from(many.to_vec()).to_string(),
			};
			(key.clone(), wire)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_empty_values_become_empty_string() {
		let data = HashMap::from([("flag".to_string(), Vec::new())]);

		assert_eq!(convert_form_data(&data)["flag"], "");
	}

	#[rstest]
	fn test_multiple_values_escape_json() {
		let data = HashMap::from([(
			"tags".to_string(),
			vec!["say \"hi\"".to_string(), "x".to_string()],
		)]);

		let wire = convert_form_data(&data);

		assert_eq!(wire["tags"], r#"["say \"hi\"","x"]"#);
	}
}
