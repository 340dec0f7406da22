//! Float field

use crate::field::{
	BaseField, FieldError, FieldResult, FieldValidator, FormField, HtmlAttributes,
	REQUIRED_MESSAGE, validator,
};
use serde_json::{Number, Value};

/// Floating point field with optional bounds
#[derive(Debug, Clone)]
pub struct FloatField {
	pub base: BaseField,
	pub required: bool,
	pub min_value: Option<f64>,
	pub max_value: Option<f64>,
}

impl FloatField {
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
	pub fn with_min_value(mut self, min: f64) -> Self {
		self.min_value = Some(min);
		self
	}
	pub fn with_max_value(mut self, max: f64) -> Self {
		self.max_value = Some(max);
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.base.label = label.into();
		self
	}
	pub fn with_initial(mut self, initial: f64) -> Self {
		self.base.initial = Number::from_f64(initial).map(Value::Number);
		self
	}
}

fn as_float(value: &Value, field: &str) -> FieldResult<Option<f64>> {
	match value {
		Value::Null => Ok(None),
		Value::Number(n) => n
			.as_f64()
			.map(Some)
			.ok_or_else(|| FieldError::Internal(format!("value for {} is not a float", field))),
		other => Err(FieldError::Internal(format!(
			"value for {} is not a float: {}",
			field, other
		))),
	}
}

impl FormField for FloatField {
	fn base(&self) -> &BaseField {
		&self.base
	}

	fn base_mut(&mut self) -> &mut BaseField {
		&mut self.base
	}

	fn to_wire(&self, value: &Value) -> FieldResult<String> {
		Ok(as_float(value, &self.base.name)?
			.map(|f| f.to_string())
			.unwrap_or_default())
	}

	fn from_wire(&self, wire: &str) -> FieldResult<Value> {
		let wire = wire.trim();
		if wire.is_empty() {
			return Ok(Value::Null);
		}
		let parsed = wire
			.parse::<f64>()
			.map_err(|_| FieldError::Invalid(format!("'{}' is not a valid number", wire)))?;
		Number::from_f64(parsed)
			.map(Value::Number)
			.ok_or_else(|| FieldError::Invalid(format!("'{}' is not a finite number", wire)))
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
			validators.push(validator(move |value| match as_float(value, &name)? {
				Some(f) if f < min => Ok(vec![format!("value {} is less than minimum {}", f, min)]),
				_ => Ok(vec![]),
			}));
		}
		if let Some(max) = self.max_value {
			let name = self.base.name.clone();
			validators.push(validator(move |value| match as_float(value, &name)? {
				Some(f) if f > max => {
					Ok(vec![format!("value {} is greater than maximum {}", f, max)])
				}
				_ => Ok(vec![]),
			}));
		}
		validators
	}

	fn attributes(&self) -> FieldResult<HtmlAttributes> {
		let mut attrs = self.base.input_attributes("number");
		attrs.set("step", "any");
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

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("1.5", 1.5)]
	#[case("-0.25", -0.25)]
	#[case("3", 3.0)]
	fn test_from_wire(#[case] wire: &str, #[case] expected: f64) {
		let field = FloatField::new("price".to_string());

		let value = field.from_wire(wire).unwrap();

		assert_eq!(value.as_f64(), Some(expected));
	}

	#[rstest]
	#[case("abc")]
	#[case("inf")]
	#[case("NaN")]
	fn test_rejects_malformed_and_non_finite(#[case] wire: &str) {
		let field = FloatField::new("price".to_string());

		assert!(matches!(field.from_wire(wire), Err(FieldError::Invalid(_))));
	}

	#[rstest]
	fn test_bounds_accept_integer_natives() {
		let field = FloatField::new("price".to_string())
			.with_min_value(0.5)
			.with_max_value(2.5);

		assert!(field.validate(&json!(1)).unwrap().is_empty());
		assert_eq!(field.validate(&json!(0.1)).unwrap().len(), 1);
		assert_eq!(field.validate(&json!(3)).unwrap().len(), 1);
	}

	proptest! {
		#[test]
		fn prop_wire_round_trip(f in -1.0e12f64..1.0e12f64) {
			let field = FloatField::new("f".to_string());
			let native = Value::Number(Number::from_f64(f).unwrap());
			let wire = field.to_wire(&native).unwrap();
			prop_assert_eq!(field.from_wire(&wire).unwrap(), native);
		}
	}
}
