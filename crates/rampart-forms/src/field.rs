//! Core form field abstractions
//!
//! Every field variant shares a [`BaseField`] (name, label, extra validators,
//! initial value and superseding HTML attributes) and implements
//! [`FormField`] for conversion, validation and rendering.

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Result type for field operations
pub type FieldResult<T> = Result<T, FieldError>;

/// Outcome of a single validator: user-facing messages on success,
/// an internal error when the validator itself could not run.
pub type ValidationOutcome = FieldResult<Vec<String>>;

/// A validation function attached to a field.
///
/// Returning `Ok(vec![])` means the value passed. Returning `Err` aborts
/// validation of the whole form.
pub type FieldValidator = Arc<dyn Fn(&Value) -> ValidationOutcome + Send + Sync>;

/// Wraps a closure into a [`FieldValidator`].
///
/// # Examples
///
/// ```
/// use rampart_forms::field::validator;
/// use serde_json::json;
///
/// let no_admin = validator(|value| {
/// 	if value == &json!("admin") {
/// 		Ok(vec!["reserved name".to_string()])
/// 	} else {
/// 		Ok(vec![])
/// 	}
/// });
/// assert_eq!(no_admin(&json!("admin")).unwrap().len(), 1);
/// assert!(no_admin(&json!("alice")).unwrap().is_empty());
/// ```
pub fn validator<F>(f: F) -> FieldValidator
where
	F: Fn(&Value) -> ValidationOutcome + Send + Sync + 'static,
{
	Arc::new(f)
}

/// Errors raised by form fields.
///
/// User-facing validation messages are not errors; they are returned as
/// plain strings from validators. These variants describe failures of the
/// field machinery itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("field name cannot be empty")]
	EmptyName,
	#[error("field label cannot be empty")]
	EmptyLabel,
	/// A wire or native value could not be converted.
	#[error("{0}")]
	Invalid(String),
	/// A validator failed to run.
	#[error("{0}")]
	Internal(String),
}

/// Escapes HTML special characters in a string.
///
/// Returns a borrowed reference if no escaping is needed.
pub fn escape_html(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

/// Ordered set of HTML attributes.
///
/// A `None` value renders as a bare attribute (`required`). Setting an
/// existing name replaces it in place so the rendering order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlAttributes {
	entries: Vec<(String, Option<String>)>,
}

impl HtmlAttributes {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `name="value"`.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.insert(name, Some(value.into()));
	}

	/// Sets a bare attribute such as `required` or `checked`.
	pub fn set_flag(&mut self, name: impl Into<String>) {
		self.insert(name, None);
	}

	pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
		let name = name.into();
		match self.entries.iter_mut().find(|(n, _)| *n == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	/// Returns `Some(None)` for a bare attribute, `None` when absent.
	pub fn get(&self, name: &str) -> Option<Option<&str>> {
		self.entries
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_deref())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Applies `overrides` on top of these attributes. Overrides always win.
	pub fn merge(&mut self, overrides: &HtmlAttributes) {
		for (name, value) in &overrides.entries {
			self.insert(name.clone(), value.clone());
		}
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl fmt::Display for HtmlAttributes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for (name, value) in &self.entries {
			if !first {
				f.write_str(" ")?;
			}
			first = false;
			match value {
				Some(v) => write!(f, "{}=\"{}\"", escape_html(name), escape_html(v))?,
				None => write!(f, "{}", escape_html(name))?,
			}
		}
		Ok(())
	}
}

/// State shared by every field variant.
#[derive(Clone, Default)]
pub struct BaseField {
	pub name: String,
	pub label: String,
	/// Caller-registered validators, run after the variant's own checks.
	pub validators: Vec<FieldValidator>,
	pub initial: Option<Value>,
	/// Raw attributes merged last over the computed ones.
	pub superseding: HtmlAttributes,
}

impl BaseField {
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			label: name.clone(),
			name,
			..Default::default()
		}
	}

	/// Common attributes every input starts from.
	pub fn input_attributes(&self, input_type: &str) -> HtmlAttributes {
		let mut attrs = HtmlAttributes::new();
		attrs.set("type", input_type);
		attrs.set("name", self.name.as_str());
		attrs.set("id", self.name.as_str());
		attrs
	}
}

impl fmt::Debug for BaseField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BaseField")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("validators", &self.validators.len())
			.field("initial", &self.initial)
			.field("superseding", &self.superseding)
			.finish()
	}
}

/// A typed, self-validating and self-rendering input.
pub trait FormField: Send + Sync {
	fn base(&self) -> &BaseField;
	fn base_mut(&mut self) -> &mut BaseField;

	/// Converts a native value into its wire (string) form.
	fn to_wire(&self, value: &Value) -> FieldResult<String>;

	/// Converts a submitted wire value into the native value.
	fn from_wire(&self, wire: &str) -> FieldResult<Value>;

	/// Required-ness and constraint checks owned by the variant.
	fn builtin_validators(&self) -> Vec<FieldValidator>;

	/// Computed attributes before superseding attributes are applied.
	fn attributes(&self) -> FieldResult<HtmlAttributes>;

	fn clone_box(&self) -> Box<dyn FormField>;

	/// Renders the input element.
	fn html(&self) -> FieldResult<String> {
		let mut attrs = self.attributes()?;
		attrs.merge(&self.base().superseding);
		Ok(format!("<input {}>", attrs))
	}

	fn name(&self) -> &str {
		&self.base().name
	}

	fn set_name(&mut self, name: &str) -> FieldResult<()> {
		if name.is_empty() {
			return Err(FieldError::EmptyName);
		}
		self.base_mut().name = name.to_string();
		Ok(())
	}

	fn label(&self) -> &str {
		&self.base().label
	}

	fn set_label(&mut self, label: &str) -> FieldResult<()> {
		if label.is_empty() {
			return Err(FieldError::EmptyLabel);
		}
		self.base_mut().label = label.to_string();
		Ok(())
	}

	fn initial(&self) -> Option<&Value> {
		self.base().initial.as_ref()
	}

	fn set_initial(&mut self, value: Value) {
		self.base_mut().initial = Some(value);
	}

	fn add_validator(&mut self, validator: FieldValidator) {
		self.base_mut().validators.push(validator);
	}

	/// Overrides a computed HTML attribute. `None` renders a bare attribute.
	fn supersede_attribute(&mut self, name: &str, value: Option<String>) {
		self.base_mut().superseding.insert(name, value);
	}

	/// Built-in validators followed by caller-registered ones.
	fn validators(&self) -> Vec<FieldValidator> {
		let mut validators = self.builtin_validators();
		validators.extend(self.base().validators.iter().cloned());
		validators
	}

	/// Runs every validator, collecting user-facing messages.
	///
	/// The first internal error stops validation and is returned.
	fn validate(&self, value: &Value) -> ValidationOutcome {
		let mut messages = Vec::new();
		for validate in self.validators() {
			messages.extend(validate(value)?);
		}
		Ok(messages)
	}

	/// Wire form of the initial value, or `None` when unset.
	fn initial_wire(&self) -> FieldResult<Option<String>> {
		match self.initial() {
			None | Some(Value::Null) => Ok(None),
			Some(value) => self.to_wire(value).map(Some),
		}
	}
}

impl Clone for Box<dyn FormField> {
	fn clone(&self) -> Self {
		self.clone_box()
	}
}

impl fmt::Debug for dyn FormField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormField")
			.field("name", &self.name())
			.field("label", &self.label())
			.finish()
	}
}

pub(crate) const REQUIRED_MESSAGE: &str = "field is required";

/// `true` for `null` and the empty string.
pub(crate) fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.is_empty(),
		_ => false,
	}
}

pub(crate) fn required_validator() -> FieldValidator {
	validator(|value| {
		if is_blank(value) {
			Ok(vec![REQUIRED_MESSAGE.to_string()])
		} else {
			Ok(vec![])
		}
	})
}

/// Borrows a string native value; `null` is treated as absent.
pub(crate) fn native_str<'a>(value: &'a Value, field: &str) -> FieldResult<Option<&'a str>> {
	match value {
		Value::Null => Ok(None),
		Value::String(s) => Ok(Some(s.as_str())),
		other => Err(FieldError::Internal(format!(
			"value for {} must be a string, got {}",
			field, other
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_html_attributes_replace_in_place() {
		// Arrange
		let mut attrs = HtmlAttributes::new();
		attrs.set("type", "text");
		attrs.set("name", "title");

		// Act
		attrs.set("type", "search");

		// Assert
		assert_eq!(attrs.to_string(), r#"type="search" name="title""#);
	}

	#[rstest]
	fn test_html_attributes_merge_overrides_win() {
		let mut computed = HtmlAttributes::new();
		computed.set("type", "text");
		computed.set_flag("required");

		let mut overrides = HtmlAttributes::new();
		overrides.set("required", "required");
		overrides.set_flag("autofocus");

		computed.merge(&overrides);

		assert_eq!(
			computed.to_string(),
			r#"type="text" required="required" autofocus"#
		);
	}

	#[rstest]
	#[case("plain", "plain")]
	#[case("<b>", "&lt;b&gt;")]
	#[case(r#"a"b"#, "a&quot;b")]
	fn test_escape_html(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_html(input), expected);
	}

	#[rstest]
	#[case(Value::Null, true)]
	#[case(Value::String(String::new()), true)]
	#[case(Value::String("x".into()), false)]
	#[case(Value::Bool(false), false)]
	fn test_is_blank(#[case] value: Value, #[case] expected: bool) {
		assert_eq!(is_blank(&value), expected);
	}
}
