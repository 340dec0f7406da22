//! Single and multiple choice fields rendered as `<select>` elements

use crate::field::{
	BaseField, FieldError, FieldResult, FieldValidator, FormField, HtmlAttributes, escape_html,
	native_str, required_validator, validator,
};
use serde_json::Value;

/// A selectable option: submitted value and display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
	pub value: String,
	pub label: String,
}

impl Choice {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for Choice {
	fn from((value, label): (V, L)) -> Self {
		Self::new(value, label)
	}
}

const INVALID_CHOICE: &str = "invalid choice selected";
const NO_CHOICE: &str = "at least one choice must be selected";

fn render_select(attrs: &HtmlAttributes, choices: &[Choice], selected: &[&str], blank: bool) -> String {
	let mut html = format!("<select {}>", attrs);
	if blank {
		html.push_str(r#"<option value="">---------</option>"#);
	}
	for choice in choices {
		let marker = if selected.contains(&choice.value.as_str()) {
			" selected"
		} else {
			""
		};
		html.push_str(&format!(
			r#"<option value="{}"{}>{}</option>"#,
			escape_html(&choice.value),
			marker,
			escape_html(&choice.label)
		));
	}
	html.push_str("</select>");
	html
}

/// Field accepting one value from a fixed option set
#[derive(Debug, Clone)]
pub struct ChoiceField {
	pub base: BaseField,
	pub required: bool,
	pub choices: Vec<Choice>,
}

impl ChoiceField {
	/// Create a new ChoiceField
	///
	/// # Examples
	///
	/// ```
	/// use rampart_forms::fields::ChoiceField;
	/// use rampart_forms::FormField;
	/// use serde_json::json;
	///
	/// let field = ChoiceField::new("color".to_string(), vec![("r", "Red"), ("g", "Green")]);
	/// assert!(field.validate(&json!("r")).unwrap().is_empty());
	/// assert_eq!(field.validate(&json!("b")).unwrap().len(), 1);
	/// ```
	pub fn new<C: Into<Choice>>(name: String, choices: Vec<C>) -> Self {
		Self {
			base: BaseField::new(name),
			required: false,
			choices: choices.into_iter().map(Into::into).collect(),
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
	pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
		self.base.initial = Some(Value::String(initial.into()));
		self
	}
}

impl FormField for ChoiceField {
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
		let allowed: Vec<String> = self.choices.iter().map(|c| c.value.clone()).collect();
		validators.push(validator(move |value| match native_str(value, &name)? {
			Some(s) if !s.is_empty() && !allowed.iter().any(|a| a == s) => {
				Ok(vec![INVALID_CHOICE.to_string()])
			}
			_ => Ok(vec![]),
		}));
		validators
	}

	fn attributes(&self) -> FieldResult<HtmlAttributes> {
		let mut attrs = HtmlAttributes::new();
		attrs.set("name", self.base.name.as_str());
		attrs.set("id", self.base.name.as_str());
		if self.required {
			attrs.set_flag("required");
		}
		Ok(attrs)
	}

	fn html(&self) -> FieldResult<String> {
		let mut attrs = self.attributes()?;
		attrs.merge(&self.base.superseding);
		let initial = self.initial_wire()?;
		let selected: Vec<&str> = initial.as_deref().into_iter().collect();
		Ok(render_select(&attrs, &self.choices, &selected, !self.required))
	}

	fn clone_box(&self) -> Box<dyn FormField> {
		Box::new(self.clone())
	}
}

/// Field accepting any subset of a fixed option set.
///
/// The wire representation is a JSON array of strings, the same shape
/// [`convert_form_data`](crate::convert_form_data) produces for repeated
/// form keys.
#[derive(Debug, Clone)]
pub struct MultipleChoiceField {
	pub base: BaseField,
	pub required: bool,
	pub choices: Vec<Choice>,
}

impl MultipleChoiceField {
	pub fn new<C: Into<Choice>>(name: String, choices: Vec<C>) -> Self {
		Self {
			base: BaseField::new(name),
			required: false,
			choices: choices.into_iter().map(Into::into).collect(),
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
	pub fn with_initial<S: Into<String>>(mut self, initial: Vec<S>) -> Self {
		self.base.initial = Some(Value::Array(
			initial.into_iter().map(|s| Value::String(s.into())).collect(),
		));
		self
	}
}

fn native_strings<'a>(value: &'a Value, field: &str) -> FieldResult<Vec<&'a str>> {
	match value {
		Value::Null => Ok(Vec::new()),
		Value::Array(items) => items
			.iter()
			.map(|item| {
				item.as_str().ok_or_else(|| {
					FieldError::Internal(format!("values for {} must be strings", field))
				})
			})
			.collect(),
		other => Err(FieldError::Internal(format!(
			"value for {} must be a list of strings, got {}",
			field, other
		))),
	}
}

impl FormField for MultipleChoiceField {
	fn base(&self) -> &BaseField {
		&self.base
	}

	fn base_mut(&mut self) -> &mut BaseField {
		&mut self.base
	}

	fn to_wire(&self, value: &Value) -> FieldResult<String> {
		if value.is_null() {
			return Ok(String::new());
		}
		let values = native_strings(value, &self.base.name)?;
		serde_json::to_string(&values).map_err(|e| FieldError::Internal(e.to_string()))
	}

	fn from_wire(&self, wire: &str) -> FieldResult<Value> {
		let wire = wire.trim();
		if wire.is_empty() {
			return Ok(Value::Array(Vec::new()));
		}
		// A single selection arrives as the bare value.
		if !wire.starts_with('[') {
			return Ok(Value::Array(vec![Value::String(wire.to_string())]));
		}
		let values: Vec<String> = serde_json::from_str(wire)
			.map_err(|_| FieldError::Invalid("invalid multiple choice value".to_string()))?;
		Ok(Value::Array(values.into_iter().map(Value::String).collect()))
	}

	fn builtin_validators(&self) -> Vec<FieldValidator> {
		let mut validators = Vec::new();
		if self.required {
			let name = self.base.name.clone();
			validators.push(validator(move |value| {
				let selected = native_strings(value, &name)?;
				if selected.iter().all(|s| s.is_empty()) {
					Ok(vec![NO_CHOICE.to_string()])
				} else {
					Ok(vec![])
				}
			}));
		}
		let name = self.base.name.clone();
		let allowed: Vec<String> = self.choices.iter().map(|c| c.value.clone()).collect();
		validators.push(validator(move |value| {
			Ok(native_strings(value, &name)?
				.into_iter()
				.filter(|s| !s.is_empty() && !allowed.iter().any(|a| a == s))
				.map(|s| format!("invalid choice: {}", s))
				.collect())
		}));
		validators
	}

	fn attributes(&self) -> FieldResult<HtmlAttributes> {
		let mut attrs = HtmlAttributes::new();
		attrs.set("name", self.base.name.as_str());
		attrs.set("id", self.base.name.as_str());
		attrs.set_flag("multiple");
		if self.required {
			attrs.set_flag("required");
		}
		Ok(attrs)
	}

	fn html(&self) -> FieldResult<String> {
		let mut attrs = self.attributes()?;
		attrs.merge(&self.base.superseding);
		let selected = match &self.base.initial {
			Some(value) => native_strings(value, &self.base.name)?,
			None => Vec::new(),
		};
		Ok(render_select(&attrs, &self.choices, &selected, false))
	}

	fn clone_box(&self) -> Box<dyn FormField> {
		Box::new(self.clone())
	}
}
