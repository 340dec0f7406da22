//! Absolute URL field

use crate::field::{
	BaseField, FieldResult, FieldValidator, FormField, HtmlAttributes, native_str,
	required_validator, validator,
};
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone)]
pub struct URLField {
	pub base: BaseField,
	pub required: bool,
	pub placeholder: Option<String>,
}

impl URLField {
	pub fn new(name: String) -> Self {
		Self {
			base: BaseField::new(name),
			required: false,
			placeholder: None,
		}
	}
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.base.label = label.into();
		self
	}
}

impl FormField for URLField {
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
		Ok(Value::String(wire.trim().to_string()))
	}

	fn builtin_validators(&self) -> Vec<FieldValidator> {
		let mut validators = Vec::new();
		if self.required {
			validators.push(required_validator());
		}
		let name = self.base.name.clone();
		validators.push(validator(move |value| match native_str(value, &name)? {
			Some(s) if !s.is_empty() && Url::parse(s).is_err() => {
				Ok(vec!["invalid URL".to_string()])
			}
			_ => Ok(vec![]),
		}));
		validators
	}

	fn attributes(&self) -> FieldResult<HtmlAttributes> {
		let mut attrs = self.base.input_attributes("url");
		if let Some(wire) = self.initial_wire()? {
			attrs.set("value", wire);
		}
		if let Some(placeholder) = &self.placeholder {
			attrs.set("placeholder", placeholder.as_str());
		}
		if self.required {
			attrs.set_flag("required");
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
	#[case("https://example.com/path?q=1", 0)]
	#[case("mailto:someone@example.com", 0)]
	#[case("/relative/path", 1)]
	#[case("example.com", 1)]
	#[case("", 0)]
	fn test_validate(#[case] input: &str, #[case] expected_errors: usize) {
		let field = URLField::new("homepage".to_string());

		assert_eq!(field.validate(&json!(input)).unwrap().len(), expected_errors);
	}

	#[rstest]
	fn test_required_empty() {
		let field = URLField::new("homepage".to_string()).required();

		assert_eq!(
			field.validate(&json!("")).unwrap(),
			vec!["field is required".to_string()]
		);
	}
}
