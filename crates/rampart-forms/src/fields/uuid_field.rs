//! UUID field accepting version 4 identifiers

use crate::field::{
	BaseField, FieldError, FieldResult, FieldValidator, FormField, HtmlAttributes,
	REQUIRED_MESSAGE, native_str, validator,
};
use serde_json::Value;
use uuid::Uuid;

/// Pattern rendered into the `pattern` attribute for client-side checks.
pub const UUID_V4_PATTERN: &str =
	"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}";

#[derive(Debug, Clone)]
pub struct UUIDField {
	pub base: BaseField,
	pub required: bool,
}

impl UUIDField {
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
	pub fn with_initial(mut self, initial: Uuid) -> Self {
		self.base.initial = Some(Value::String(initial.hyphenated().to_string()));
		self
	}
}

fn parse_uuid(s: &str) -> FieldResult<Uuid> {
	Uuid::parse_str(s).map_err(|_| FieldError::Invalid(format!("'{}' is not a valid UUID", s)))
}

impl FormField for UUIDField {
	fn base(&self) -> &BaseField {
		&self.base
	}

	fn base_mut(&mut self) -> &mut BaseField {
		&mut self.base
	}

	fn to_wire(&self, value: &Value) -> FieldResult<String> {
		match native_str(value, &self.base.name)? {
			None | Some("") => Ok(String::new()),
			Some(s) => Ok(parse_uuid(s)?.hyphenated().to_string()),
		}
	}

	fn from_wire(&self, wire: &str) -> FieldResult<Value> {
		let wire = wire.trim();
		if wire.is_empty() {
			return Ok(Value::Null);
		}
		Ok(Value::String(parse_uuid(wire)?.hyphenated().to_string()))
	}

	fn builtin_validators(&self) -> Vec<FieldValidator> {
		let mut validators = Vec::new();
		if self.required {
			validators.push(validator(|value| {
				if value.is_null() || value.as_str() == Some("") {
					Ok(vec![REQUIRED_MESSAGE.to_string()])
				} else {
					Ok(vec![])
				}
			}));
		}
		let name = self.base.name.clone();
		validators.push(validator(move |value| match native_str(value, &name)? {
			Some(s) if !s.is_empty() => match Uuid::parse_str(s) {
				Ok(id) if id.get_version_num() == 4 => Ok(vec![]),
				_ => Ok(vec!["value is not a valid version 4 UUID".to_string()]),
			},
			_ => Ok(vec![]),
		}));
		validators
	}

	fn attributes(&self) -> FieldResult<HtmlAttributes> {
		let mut attrs = self.base.input_attributes("text");
		if let Some(wire) = self.initial_wire()? {
			attrs.set("value", wire);
		}
		attrs.set("pattern", UUID_V4_PATTERN);
		attrs.set("maxlength", "36");
		attrs.set("minlength", "36");
		if self.required {
			attrs.set_flag("required");
		}
		Ok(attrs)
	}

	fn clone_box(&self) -> Box<dyn FormField> {
		Box::new(self.clone())
	}
}
