//! Text field for free-form string input

use crate::field::{
	BaseField, FieldResult, FieldValidator, FormField, HtmlAttributes, native_str,
	required_validator, validator,
};
use regex::Regex;
use serde_json::Value;

/// Text field with length and pattern validation
#[derive(Debug, Clone)]
pub struct TextField {
	pub base: BaseField,
	pub required: bool,
	pub placeholder: Option<String>,
	pub max_length: Option<usize>,
	pub min_length: Option<usize>,
	pub regex: Option<Regex>,
}

impl TextField {
	/// Create a new TextField with the given name
	///
	/// # Examples
	///
	/// ```
	/// use rampart_forms::fields::TextField;
	/// use rampart_forms::FormField;
	///
	/// let field = TextField::new("username".to_string());
	/// assert_eq!(field.name(), "username");
	/// assert!(!field.required);
	/// ```
	pub fn new(name: String) -> Self {
		Self {
			base: BaseField::new(name),
			required: false,
			placeholder: None,
			max_length: None,
			min_length: None,
			regex: None,
		}
	}
	/// Set the field as required
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
	/// Set the maximum length, counted in characters
	///
	/// # Examples
	///
	/// ```
	/// use rampart_forms::fields::TextField;
	///
	/// let field = TextField::new("username".to_string()).with_max_length(20);
	/// assert_eq!(field.max_length, Some(20));
	/// ```
	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}
	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
		self
	}
	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}
	/// Require non-empty input to match `regex`
	pub fn with_regex(mut self, regex: Regex) -> Self {
		self.regex = Some(regex);
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.base.label = label.into();
		self
	}
	pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
		self.base.initial = Some(Value::String(initial.into()));
		self
	}
}

impl FormField for TextField {
	fn base(&self) -> &BaseField {
		&self.base
	}

	fn base_mut(&mut self) -> &mut BaseField {
		&mut self.base
	}

	fn to_wire(&self, value: &Value) -> FieldResult<String> {
		Ok(native_str(value, &self.base.name)?
			.unwrap_or_default()
			.to_string())
	}

	fn from_wire(&self, wire: &str) -> FieldResult<Value> {
		Ok(Value::String(wire.to_string()))
	}

	fn builtin_validators(&self) -> Vec<FieldValidator> {
		let mut validators = Vec::new();
		if self.required {
			validators.push(required_validator());
		}
		let name = self.base.name.clone();
		if let Some(max) = self.max_length {
			let name = name.clone();
			validators.push(validator(move |value| {
				let len = native_str(value, &name)?.map_or(0, |s| s.chars().count());
				if len > max {
					Ok(vec![format!(
						"input length of {} is greater than the maximum length of {}",
						len, max
					)])
				} else {
					Ok(vec![])
				}
			}));
		}
		if let Some(min) = self.min_length {
			let name = name.clone();
			validators.push(validator(move |value| {
				let len = native_str(value, &name)?.map_or(0, |s| s.chars().count());
				// Empty input is the required check's business.
				if len > 0 && len < min {
					Ok(vec![format!(
						"input length of {} is less than the minimum length of {}",
						len, min
					)])
				} else {
					Ok(vec![])
				}
			}));
		}
		if let Some(regex) = self.regex.clone() {
			validators.push(validator(move |value| match native_str(value, &name)? {
				Some(s) if !s.is_empty() && !regex.is_match(s) => {
					Ok(vec!["input does not match the required pattern".to_string()])
				}
				_ => Ok(vec![]),
			}));
		}
		validators
	}

	fn attributes(&self) -> FieldResult<HtmlAttributes> {
		let mut attrs = self.base.input_attributes("text");
		if let Some(wire) = self.initial_wire()? {
			attrs.set("value", wire);
		}
		if let Some(placeholder) = &self.placeholder {
			attrs.set("placeholder", placeholder.as_str());
		}
		if self.required {
			attrs.set_flag("required");
		}
		if let Some(max) = self.max_length {
			attrs.set("maxlength", max.to_string());
		}
		if let Some(min) = self.min_length {
			attrs.set("minlength", min.to_string());
		}
		if let Some(regex) = &self.regex {
			attrs.set("pattern", regex.as_str());
		}
		Ok(attrs)
	}

	fn clone_box(&self) -> Box<dyn FormField> {
		Box::new(self.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_required_empty_string_yields_error() {
		// Arrange
		let field = TextField::new("title".to_string()).required();

		// Act
		let errors = field.validate(&json!("")).unwrap();

		// Assert
		assert_eq!(errors, vec!["field is required".to_string()]);
	}

	#[rstest]
	fn test_optional_empty_string_has_no_errors() {
		let field = TextField::new("title".to_string())
			.with_min_length(3)
			.with_regex(Regex::new("^[a-z]+$").unwrap());

		let errors = field.validate(&json!("")).unwrap();

		assert!(errors.is_empty());
	}

	#[rstest]
	fn test_length_is_counted_in_chars() {
		let field = TextField::new("title".to_string()).with_max_length(3);

		assert!(field.validate(&json!("日本語")).unwrap().is_empty());
		assert_eq!(
			field.validate(&json!("日本語!")).unwrap(),
			vec!["input length of 4 is greater than the maximum length of 3".to_string()]
		);
	}

	#[rstest]
	fn test_errors_accumulate() {
		let field = TextField::new("code".to_string())
			.with_min_length(5)
			.with_regex(Regex::new("^[0-9]+$").unwrap());

		let errors = field.validate(&json!("ab")).unwrap();

		assert_eq!(errors.len(), 2);
	}

	#[rstest]
	fn test_non_string_native_is_internal_error() {
		let field = TextField::new("title".to_string()).with_max_length(3);

		assert!(field.validate(&json!(12)).is_err());
	}

	#[rstest]
	fn test_html_renders_constraints_and_initial() {
		let field = TextField::new("title".to_string())
			.required()
			.with_max_length(50)
			.with_placeholder("Title")
			.with_initial("Hello <world>");

		let html = field.html().unwrap();

		assert_eq!(
			html,
			r#"<input type="text" name="title" id="title" value="Hello &lt;world&gt;" placeholder="Title" required maxlength="50">"#
		);
	}

	#[rstest]
	fn test_superseding_attribute_wins() {
		let mut field = TextField::new("title".to_string()).with_max_length(50);
		field.supersede_attribute("maxlength", Some("10".to_string()));
		field.supersede_attribute("autofocus", None);

		let html = field.html().unwrap();

		assert!(html.contains(r#"maxlength="10""#));
		assert!(!html.contains(r#"maxlength="50""#));
		assert!(html.ends_with("autofocus>"));
	}

	#[rstest]
	fn test_wire_is_identity() {
		let field = TextField::new("title".to_string());

		let native = field.from_wire("some text").unwrap();

		assert_eq!(native, json!("some text"));
		assert_eq!(field.to_wire(&native).unwrap(), "some text");
	}
}
