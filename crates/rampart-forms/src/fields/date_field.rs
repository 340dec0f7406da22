//! Date field using the ISO 8601 date-only format

use crate::field::{
	BaseField, FieldError, FieldResult, FieldValidator, FormField, HtmlAttributes,
	REQUIRED_MESSAGE, native_str, validator,
};
use chrono::NaiveDate;
use serde_json::Value;

/// Wire and native format of dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date field with optional bounds.
///
/// Native values are `YYYY-MM-DD` strings, the same representation
/// serde uses for `chrono::NaiveDate`.
#[derive(Debug, Clone)]
pub struct DateField {
	pub base: BaseField,
	pub required: bool,
	pub min_date: Option<NaiveDate>,
	pub max_date: Option<NaiveDate>,
}

impl DateField {
	pub fn new(name: String) -> Self {
		Self {
			base: BaseField::new(name),
			required: false,
			min_date: None,
			max_date: None,
		}
	}
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
	pub fn with_min_date(mut self, min: NaiveDate) -> Self {
		self.min_date = Some(min);
		self
	}
	pub fn with_max_date(mut self, max: NaiveDate) -> Self {
		self.max_date = Some(max);
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.base.label = label.into();
		self
	}
	pub fn with_initial(mut self, initial: NaiveDate) -> Self {
		self.base.initial = Some(Value::String(initial.format(DATE_FORMAT).to_string()));
		self
	}
}

fn parse_date(s: &str) -> FieldResult<NaiveDate> {
	NaiveDate::parse_from_str(s, DATE_FORMAT)
		.map_err(|_| FieldError::Invalid(format!("'{}' is not a valid date (YYYY-MM-DD)", s)))
}

fn native_date(value: &Value, field: &str) -> FieldResult<Option<NaiveDate>> {
	match native_str(value, field)? {
		None => Ok(None),
		Some("") => Ok(None),
		Some(s) => parse_date(s).map(Some),
	}
}

impl FormField for DateField {
	fn base(&self) -> &BaseField {
		&self.base
	}

	fn base_mut(&mut self) -> &mut BaseField {
		&mut self.base
	}

	fn to_wire(&self, value: &Value) -> FieldResult<String> {
		Ok(native_date(value, &self.base.name)?
			.map(|d| d.format(DATE_FORMAT).to_string())
			.unwrap_or_default())
	}

	fn from_wire(&self, wire: &str) -> FieldResult<Value> {
		let wire = wire.trim();
		if wire.is_empty() {
			return Ok(Value::Null);
		}
		let date = parse_date(wire)?;
		Ok(Value::String(date.format(DATE_FORMAT).to_string()))
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
		if let Some(min) = self.min_date {
			let name = self.base.name.clone();
			validators.push(validator(move |value| match native_date(value, &name)? {
				Some(d) if d < min => Ok(vec![format!(
					"date {} is before minimum date {}",
					d.format(DATE_FORMAT),
					min.format(DATE_FORMAT)
				)]),
				_ => Ok(vec![]),
			}));
		}
		if let Some(max) = self.max_date {
			let name = self.base.name.clone();
			validators.push(validator(move |value| match native_date(value, &name)? {
				Some(d) if d > max => Ok(vec![format!(
					"date {} is after maximum date {}",
					d.format(DATE_FORMAT),
					max.format(DATE_FORMAT)
				)]),
				_ => Ok(vec![]),
			}));
		}
		validators
	}

	fn attributes(&self) -> FieldResult<HtmlAttributes> {
		let mut attrs = self.base.input_attributes("date");
		if let Some(wire) = self.initial_wire()? {
			attrs.set("value", wire);
		}
		if self.required {
			attrs.set_flag("required");
		}
		if let Some(min) = self.min_date {
			attrs.set("min", min.format(DATE_FORMAT).to_string());
		}
		if let Some(max) = self.max_date {
			attrs.set("max", max.format(DATE_FORMAT).to_string());
		}
		Ok(attrs)
	}

	fn clone_box(&self) -> Box<dyn FormField> {
		Box::new(self.clone())
	}
}
