//! Form engine
//!
//! A [`Form`] is an ordered set of named fields. Submissions are cleaned into
//! native values, validated per field and then across fields, and rendered
//! back with inline errors.

use crate::field::{FieldError, FormField, escape_html};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("field name cannot be empty")]
	EmptyFieldName,
	#[error("field {0} already exists")]
	DuplicateField(String),
	#[error("Field error in {field}: {error}")]
	Field { field: String, error: FieldError },
	#[error("Validation error: {0}")]
	Validation(String),
}

pub type FormResult<T> = Result<T, FormError>;

/// Cross-field validator. `Ok` carries user-facing messages, `Err` aborts.
type CleanFunction =
	Arc<dyn Fn(&HashMap<String, Value>) -> FormResult<Vec<String>> + Send + Sync>;

/// Special key for form-level (non-field-specific) errors in flattened maps.
pub const ALL_FIELDS_KEY: &str = "_all";

/// Aggregated outcome of [`Form::validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
	pub form_errors: Vec<String>,
	pub field_errors: HashMap<String, Vec<String>>,
}

impl ValidationReport {
	pub fn is_valid(&self) -> bool {
		self.form_errors.is_empty() && self.field_errors.values().all(|e| e.is_empty())
	}

	pub fn field(&self, name: &str) -> &[String] {
		self.field_errors.get(name).map_or(&[], |e| e.as_slice())
	}

	/// Flattens both maps, keeping form-level errors under [`ALL_FIELDS_KEY`].
	pub fn to_error_map(&self) -> HashMap<String, Vec<String>> {
		let mut map: HashMap<String, Vec<String>> = self
			.field_errors
			.iter()
			.filter(|(_, errors)| !errors.is_empty())
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect();
		if !self.form_errors.is_empty() {
			map.insert(ALL_FIELDS_KEY.to_string(), self.form_errors.clone());
		}
		map
	}
}

/// An ordered set of named fields plus cross-field validators
#[derive(Clone, Default)]
pub struct Form {
	fields: Vec<Box<dyn FormField>>,
	clean_functions: Vec<CleanFunction>,
	errors: ValidationReport,
}

impl std::fmt::Debug for Form {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Form")
			.field("fields", &self.fields)
			.field("clean_functions", &self.clean_functions.len())
			.field("errors", &self.errors)
			.finish()
	}
}

impl Form {
	/// Create a new empty form
	///
	/// # Examples
	///
	/// ```
	/// use rampart_forms::Form;
	///
	/// let form = Form::new();
	/// assert_eq!(form.field_count(), 0);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `field` under `name`, renaming the field to match.
	///
	/// # Examples
	///
	/// ```
	/// use rampart_forms::{Form, FormField};
	/// use rampart_forms::fields::TextField;
	///
	/// let mut form = Form::new();
	/// form.add_field("title", Box::new(TextField::new("t".to_string()))).unwrap();
	/// assert_eq!(form.get_field("title").unwrap().name(), "title");
	/// assert!(form.add_field("title", Box::new(TextField::new("t".to_string()))).is_err());
	/// ```
	pub fn add_field(&mut self, name: &str, mut field: Box<dyn FormField>) -> FormResult<()> {
		if name.is_empty() {
			return Err(FormError::EmptyFieldName);
		}
		if self.get_field(name).is_some() {
			return Err(FormError::DuplicateField(name.to_string()));
		}
		field.set_name(name).map_err(|error| FormError::Field {
			field: name.to_string(),
			error,
		})?;
		if field.label().is_empty() {
			field.base_mut().label = name.to_string();
		}
		self.fields.push(field);
		Ok(())
	}

	pub fn fields(&self) -> &[Box<dyn FormField>] {
		&self.fields
	}

	pub fn get_field(&self, name: &str) -> Option<&dyn FormField> {
		self.fields
			.iter()
			.find(|f| f.name() == name)
			.map(|f| f.as_ref())
	}

	pub fn get_field_mut(&mut self, name: &str) -> Option<&mut Box<dyn FormField>> {
		self.fields.iter_mut().find(|f| f.name() == name)
	}

	pub fn field_count(&self) -> usize {
		self.fields.len()
	}

	/// Registers a cross-field validator run after every field validator.
	///
	/// # Examples
	///
	/// ```
	/// use rampart_forms::Form;
	///
	/// let mut form = Form::new();
	/// form.add_clean_function(|data| {
	/// 	if data.get("password") != data.get("confirm_password") {
	/// 		Ok(vec!["Passwords do not match".to_string()])
	/// 	} else {
	/// 		Ok(vec![])
	/// 	}
	/// });
	/// ```
	pub fn add_clean_function<F>(&mut self, f: F)
	where
		F: Fn(&HashMap<String, Value>) -> FormResult<Vec<String>> + Send + Sync + 'static,
	{
		self.clean_functions.push(Arc::new(f));
	}

	/// Sets each named field's initial value. Unknown names are ignored.
	pub fn set_initial_values(&mut self, values: &HashMap<String, Value>) {
		for field in &mut self.fields {
			if let Some(value) = values.get(field.name()) {
				field.set_initial(value.clone());
			}
		}
	}

	/// Converts submitted wire values into native values.
	///
	/// A field without a submitted value is converted from the empty string.
	/// The first conversion failure aborts with that field's error.
	pub fn clean(&self, wire: &HashMap<String, String>) -> FormResult<HashMap<String, Value>> {
		let mut clean = HashMap::with_capacity(self.fields.len());
		for field in &self.fields {
			let raw = wire.get(field.name()).map(String::as_str).unwrap_or("");
			let value = field.from_wire(raw).map_err(|error| FormError::Field {
				field: field.name().to_string(),
				error,
			})?;
			clean.insert(field.name().to_string(), value);
		}
		Ok(clean)
	}

	/// Runs field validators then form-level validators.
	///
	/// User-facing messages are aggregated; an internal validator error
	/// aborts immediately.
	pub fn validate(&self, values: &HashMap<String, Value>) -> FormResult<ValidationReport> {
		let mut report = ValidationReport::default();
		for field in &self.fields {
			let value = values.get(field.name()).unwrap_or(&Value::Null);
			let errors = field.validate(value).map_err(|error| FormError::Field {
				field: field.name().to_string(),
				error,
			})?;
			if !errors.is_empty() {
				report.field_errors.insert(field.name().to_string(), errors);
			}
		}
		for clean in &self.clean_functions {
			report.form_errors.extend(clean(values)?);
		}
		Ok(report)
	}

	/// Errors shown inline by the render methods.
	pub fn set_errors(&mut self, errors: ValidationReport) {
		self.errors = errors;
	}

	pub fn errors(&self) -> &ValidationReport {
		&self.errors
	}

	/// Renders each field wrapped in `<p>`.
	pub fn as_p(&self) -> FormResult<String> {
		self.render(|label, errors, input| format!("{}<p>{} {}</p>", errors, label, input))
	}

	/// Renders each field as a `<li>`. The caller supplies the `<ul>`.
	pub fn as_ul(&self) -> FormResult<String> {
		self.render(|label, errors, input| format!("<li>{}{} {}</li>", errors, label, input))
	}

	/// Renders each field as a table row. The caller supplies the `<table>`.
	pub fn as_table(&self) -> FormResult<String> {
		self.render(|label, errors, input| {
			format!("<tr><th>{}</th><td>{}{}</td></tr>", label, errors, input)
		})
	}

	fn render<F>(&self, row: F) -> FormResult<String>
	where
		F: Fn(&str, &str, &str) -> String,
	{
		let mut html = error_list(&self.errors.form_errors);
		for field in &self.fields {
			let input = field.html().map_err(|error| FormError::Field {
				field: field.name().to_string(),
				error,
			})?;
			let label = format!(
				r#"<label for="{}">{}:</label>"#,
				escape_html(field.name()),
				escape_html(field.label())
			);
			let errors = error_list(self.errors.field(field.name()));
			html.push_str(&row(&label, &errors, &input));
		}
		Ok(html)
	}
}

fn error_list(errors: &[String]) -> String {
	if errors.is_empty() {
		return String::new();
	}
	let items: String = errors
		.iter()
		.map(|e| format!("<li>{}</li>", escape_html(e)))
		.collect();
	format!(r#"<ul class="errorlist">{}</ul>"#, items)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fields::{BooleanField, IntegerField, TextField};
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn signup_form() -> Form {
		let mut form = Form::new();
		form.add_field(
			"username",
			Box::new(TextField::new(String::new()).required().with_max_length(5)),
		)
		.unwrap();
		form.add_field("age", Box::new(IntegerField::new(String::new()).with_min_value(18)))
			.unwrap();
		form.add_field("terms", Box::new(BooleanField::new(String::new())))
			.unwrap();
		form
	}

	#[rstest]
	fn test_add_field_rejects_empty_name() {
		let mut form = Form::new();

		let result = form.add_field("", Box::new(TextField::new("x".to_string())));

		assert!(matches!(result, Err(FormError::EmptyFieldName)));
		assert_eq!(form.field_count(), 0);
	}

	#[rstest]
	fn test_add_field_rejects_duplicate(mut signup_form: Form) {
		let result = signup_form.add_field("age", Box::new(IntegerField::new("age".to_string())));

		assert!(matches!(result, Err(FormError::DuplicateField(name)) if name == "age"));
		assert_eq!(signup_form.field_count(), 3);
	}

	#[rstest]
	fn test_clean_treats_missing_as_empty(signup_form: Form) {
		// Arrange
		let wire = HashMap::from([("username".to_string(), "bob".to_string())]);

		// Act
		let clean = signup_form.clean(&wire).unwrap();

		// Assert
		assert_eq!(clean["username"], json!("bob"));
		assert_eq!(clean["age"], Value::Null);
		assert_eq!(clean["terms"], json!(false));
	}

	#[rstest]
	fn test_clean_aborts_on_conversion_error(signup_form: Form) {
		let wire = HashMap::from([("age".to_string(), "old".to_string())]);

		let result = signup_form.clean(&wire);

		assert!(matches!(result, Err(FormError::Field { field, .. }) if field == "age"));
	}

	#[rstest]
	fn test_validate_aggregates_all_errors(mut signup_form: Form) {
		// Arrange
		signup_form.add_clean_function(|data| {
			if data.get("terms") == Some(&json!(true)) {
				Ok(vec![])
			} else {
				Ok(vec!["terms must be accepted".to_string()])
			}
		});
		let values = HashMap::from([
			("username".to_string(), json!("toolong")),
			("age".to_string(), json!(12)),
		]);

		// Act
		let report = signup_form.validate(&values).unwrap();

		// Assert
		assert!(!report.is_valid());
		assert_eq!(report.field("username").len(), 1);
		assert_eq!(report.field("age").len(), 1);
		assert!(report.field("terms").is_empty());
		assert_eq!(report.form_errors, vec!["terms must be accepted".to_string()]);
		assert_eq!(report.to_error_map().len(), 3);
	}

	#[rstest]
	fn test_validate_aborts_on_internal_error(signup_form: Form) {
		let values = HashMap::from([("username".to_string(), json!(42))]);

		let result = signup_form.validate(&values);

		assert!(matches!(result, Err(FormError::Field { field, .. }) if field == "username"));
	}

	#[rstest]
	fn test_validate_accepts_good_values(signup_form: Form) {
		let values = HashMap::from([
			("username".to_string(), json!("bob")),
			("age".to_string(), json!(30)),
			("terms".to_string(), json!(true)),
		]);

		assert!(signup_form.validate(&values).unwrap().is_valid());
	}

	#[rstest]
	fn test_as_p_inlines_errors(mut signup_form: Form) {
		let values = HashMap::from([("username".to_string(), json!(""))]);
		let report = signup_form.validate(&values).unwrap();
		signup_form.set_errors(report);

		let html = signup_form.as_p().unwrap();

		assert!(html.starts_with(
			r#"<ul class="errorlist"><li>field is required</li></ul><p><label for="username">username:</label>"#
		));
		assert_eq!(html.matches("<p>").count(), 3);
	}

	#[rstest]
	fn test_as_table_and_ul(signup_form: Form) {
		assert_eq!(signup_form.as_table().unwrap().matches("<tr>").count(), 3);
		assert_eq!(signup_form.as_ul().unwrap().matches("<li>").count(), 3);
	}

	#[rstest]
	fn test_set_initial_values(mut signup_form: Form) {
		signup_form.set_initial_values(&HashMap::from([("age".to_string(), json!(21))]));

		assert_eq!(
			signup_form.get_field("age").unwrap().initial(),
			Some(&json!(21))
		);
		assert!(signup_form.get_field("username").unwrap().initial().is_none());
	}
}
