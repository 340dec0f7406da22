//! Integer field

use crate::field::{
	BaseField, FieldError, FieldResult, FieldValidator, FormField, HtmlAttributes,
	REQUIRED_MESSAGE, validator,
};
use serde_json::Value;

/// Integer field with optional bounds
#[derive(Debug, Clone)]
pub struct IntegerField {
	pub base: BaseField,
	pub required: bool,
	pub min_value: Option<i64>,
	pub max_value: Option<i64>,
}

impl IntegerField {
	/// Create a new IntegerField
	///
	/// # Examples
	///
	/// ```
	/// use rampart_forms::fields::IntegerField;
	///
	/// let field = IntegerField::new("age".to_string()).with_min_value(0).with_max_value(150);
	/// assert_eq!(field.min_value, Some(0));
	/// assert_eq!(field.max_value, Some(150));
	/// ```
	pub fn new(name: String) -> Self {
		Self {
			base: BaseField::new(name),
			required: false,
			min_value: None,
			max_value: None,
		}
	}
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
	pub fn with_min_value(mut self, min: i64) -> Self {
		self.min_value = Some(min);
		self
	}
	pub fn with_max_value(mut self, max: i64) -> Self {
		self.max_value = Some(max);
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.base.label = label.into();
		self
	}
	pub fn with_initial(mut self, initial: i64) -> Self {
		self.base.initial = Some(Value::from(initial));
		self
	}
}

/// Widens any JSON integer so signed and unsigned values compare correctly.
fn as_wide(value: &Value, field: &str) -> FieldResult<Option<i128>> {
	match value {
		Value::Null => Ok(None),
		Value::Number(n) => n
			.as_i64()
			.map(i128::from)
			.or_else(|| n.as_u64().map(i128::from))
			.map(Some)
			.ok_or_else(|| FieldError::Internal(format!("value for {} is not an integer", field))),
		other => Err(FieldError::Internal(format!(
			"value for {} is not an integer: {}",
			field, other
		))),
	}
}

impl FormField for IntegerField {
	fn base(&self) -> &BaseField {
		&self.base
	}

	fn base_mut(&mut self) -> &mut BaseField {
		&mut self.base
	}

	fn to_wire(&self, value: &Value) -> FieldResult<String> {
		Ok(as_wide(value, &self.base.name)?
			.map(|n| n.to_string())
			.unwrap_or_default())
	}

	fn from_wire(&self, wire: &str) -> FieldResult<Value> {
		let wire = wire.trim();
		if wire.is_empty() {
			return Ok(Value::Null);
		}
		if let Ok(n) = wire.parse::<i64>() {
			return Ok(Value::from(n));
		}
		wire.parse::<u64>()
			.map(Value::from)
			.map_err(|_| FieldError::Invalid(format!("'{}' is not a valid integer", wire)))
	}

	fn builtin_validators(&self) -> Vec<FieldValidator> {
		let mut validators = Vec::new();
		if self.required {
			validators.push(validator(|value| {
				if value.is_null() {
					Ok(vec![REQUIRED_MESSAGE.to_string()])
				} else {
					Ok(vec![])
				}
			}));
		}
		if let Some(min) = self.min_value {
			let name = self.base.name.clone();
			validators.push(validator(move |value| match as_wide(value, &name)? {
				Some(n) if n < i128::from(min) => {
					Ok(vec![format!("value {} is less than minimum {}", n, min)])
				}
				_ => Ok(vec![]),
			}));
		}
		if let Some(max) = self.max_value {
			let name = self.base.name.clone();
			validators.push(validator(move |value| match as_wide(value, &name)? {
				Some(n) if n > i128::from(max) => {
					Ok(vec![format!("value {} is greater than maximum {}", n, max)])
				}
				_ => Ok(vec![]),
			}));
		}
		validators
	}

	fn attributes(&self) -> FieldResult<HtmlAttributes> {
		let mut attrs = self.base.input_attributes("number");
		attrs.set("step", "1");
		if let Some(wire) = self.initial_wire()? {
			attrs.set("value", wire);
		}
		if self.required {
			attrs.set_flag("required");
		}
		if let Some(min) = self.min_value {
			attrs.set("min", min.to_string());
		}
		if let Some(max) = self.max_value {
			attrs.set("max", max.to_string());
		}
		Ok(attrs)
	}

	fn clone_box(&self) -> Box<dyn FormField> {
		Box::new(self.clone())
	}
}
