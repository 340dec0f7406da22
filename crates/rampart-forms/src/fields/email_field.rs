//! Email address field

use crate::field::{
	BaseField, FieldResult, FieldValidator, FormField, HtmlAttributes, native_str,
	required_validator, validator,
};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

// Address pattern accepted by HTML `type="email"` inputs.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
	)
	.expect("EMAIL_REGEX: invalid regex pattern")
});

/// Checks an address against the email pattern.
pub fn is_valid_email(address: &str) -> bool {
	address.len() <= 254 && EMAIL_REGEX.is_match(address)
}

#[derive(Debug, Clone)]
pub struct EmailField {
	pub base: BaseField,
	pub required: bool,
	pub placeholder: Option<String>,
}

impl EmailField {
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

impl FormField for EmailField {
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
			Some(s) if !s.is_empty() && !is_valid_email(s) => {
				Ok(vec!["invalid email address".to_string()])
			}
			_ => Ok(vec![]),
		}));
		validators
	}

	fn attributes(&self) -> FieldResult<HtmlAttributes> {
		let mut attrs = self.base.input_attributes("email");
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
