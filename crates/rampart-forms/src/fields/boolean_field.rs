//! Boolean checkbox field
//!
//! A checkbox that is absent from a submission converts to `false`. The
//! `required` flag only rejects a value that was never supplied at all
//! (`null`), so an unchecked box is always a valid `false`.

use crate::field::{
	BaseField, FieldError, FieldResult, FieldValidator, FormField, HtmlAttributes,
	REQUIRED_MESSAGE, validator,
};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct BooleanField {
	pub base: BaseField,
	pub required: bool,
}

impl BooleanField {
	pub fn new(name: String) -> Self {
		Self {
			base: BaseField::new(name),
			required: false,
		}
	}
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.base.label = label.into();
		self
	}
	pub fn with_initial(mut self, initial: bool) -> Self {
		self.base.initial = Some(Value::Bool(initial));
		self
	}

	fn is_checked(&self) -> FieldResult<bool> {
		match self.base.initial {
			None | Some(Value::Null) => Ok(false),
			Some(Value::Bool(b)) => Ok(b),
			Some(ref other) => Err(FieldError::Internal(format!(
				"initial value for {} must be a boolean, got {}",
				self.base.name, other
			))),
		}
	}
}

impl FormField for BooleanField {
	fn base(&self) -> &BaseField {
		&self.base
	}

	fn base_mut(&mut self) -> &mut BaseField {
		&mut self.base
	}

	fn to_wire(&self, value: &Value) -> FieldResult<String> {
		match value {
			Value::Null | Value::Bool(false) => Ok(String::new()),
			Value::Bool(true) => Ok("true".to_string()),
			other => Err(FieldError::Internal(format!(
				"value for {} must be a boolean, got {}",
				self.base.name, other
			))),
		}
	}

	fn from_wire(&self, wire: &str) -> FieldResult<Value> {
		let checked = matches!(
			wire.trim().to_ascii_lowercase().as_str(),
			"on" | "true" | "1"
		);
		Ok(Value::Bool(checked))
	}

	fn builtin_validators(&self) -> Vec<FieldValidator> {
		if !self.required {
			return Vec::new();
		}
		vec![validator(|value| {
			if value.is_null() {
				Ok(vec![REQUIRED_MESSAGE.to_string()])
			} else {
				Ok(vec![])
			}
		})]
	}

	fn attributes(&self) -> FieldResult<HtmlAttributes> {
		let mut attrs = self.base.input_attributes("checkbox");
		attrs.set("value", "true");
		if self.is_checked()? {
			attrs.set_flag("checked");
		}
		Ok(attrs)
	}

	fn clone_box(&self) -> Box<dyn FormField> {
		Box::new(self.clone())
	}
}
