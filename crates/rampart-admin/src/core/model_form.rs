//! Add and edit forms bound to a registered model

use super::model::Model;
use super::schema::{FormMode, Record};
use crate::types::{AdminError, AdminResult};
use rampart_forms::{Form, convert_form_data};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A [`Form`] built from a model's add-form or edit-form field bindings.
///
/// Fields are cloned from the model's field configs, so every form
/// instance starts without initial values or errors.
#[derive(Debug)]
pub struct ModelForm {
	model: Arc<Model>,
	mode: FormMode,
	form: Form,
	primary_key: Option<Value>,
}

impl ModelForm {
	/// Empty add form.
	pub fn add(model: &Arc<Model>) -> AdminResult<Self> {
		Self::build(model, FormMode::Add, None)
	}

	/// Edit form for the instance with primary key `id`.
	pub fn edit(model: &Arc<Model>, id: Value) -> AdminResult<Self> {
		Self::build(model, FormMode::Edit, Some(id))
	}

	fn build(model: &Arc<Model>, mode: FormMode, primary_key: Option<Value>) -> AdminResult<Self> {
		let mut form = Form::new();
		for config in model.fields() {
			if let Some(field) = config.form_field(mode) {
				form.add_field(&config.name, field.clone_box())?;
			}
		}
		Ok(Self {
			model: Arc::clone(model),
			mode,
			form,
			primary_key,
		})
	}

	pub fn mode(&self) -> FormMode {
		self.mode
	}

	pub fn form(&self) -> &Form {
		&self.form
	}

	pub fn form_mut(&mut self) -> &mut Form {
		&mut self.form
	}

	pub fn primary_key(&self) -> Option<&Value> {
		self.primary_key.as_ref()
	}

	/// Pre-populates initial values from a persisted record.
	pub fn set_initial_from_record(&mut self, record: &Record) {
		let values: HashMap<String, Value> = record
			.iter()
			.map(|(name, value)| (name.clone(), value.clone()))
			.collect();
		self.form.set_initial_values(&values);
	}

	/// Cleans and validates a submission.
	///
	/// Returns the clean native values when the submission is valid. When
	/// it is not, the submitted values become the form's initial values,
	/// the errors are attached for inline rendering, and `None` is
	/// returned. Unconvertible input is an error, not a validation failure.
	pub fn submit(
		&mut self,
		data: &HashMap<String, Vec<String>>,
	) -> AdminResult<Option<HashMap<String, Value>>> {
		let wire = convert_form_data(data);
		let clean = self.form.clean(&wire)?;
		let report = self.form.validate(&clean)?;
		if report.is_valid() {
			return Ok(Some(clean));
		}
		self.form.set_initial_values(&clean);
		self.form.set_errors(report);
		Ok(None)
	}

	/// Assigns clean values onto the model's zero-value template.
	///
	/// `null` leaves the zero value in place. Values are coerced to the
	/// attribute's native type.
	pub fn assign(&self, clean: &HashMap<String, Value>) -> AdminResult<Record> {
		let schema = self.model.schema();
		let mut record = schema.template().clone();
		for (name, value) in clean {
			if value.is_null() {
				continue;
			}
			let attribute = schema.attribute(name).ok_or_else(|| AdminError::Assignment {
				attribute: name.clone(),
				reason: format!("no such attribute on {}", schema.type_name()),
			})?;
			let native = attribute
				.native_type
				.coerce(value)
				.map_err(|reason| AdminError::Assignment {
					attribute: name.clone(),
					reason,
				})?;
			record.insert(name.clone(), native);
		}
		Ok(record)
	}

	/// Persists clean values through the model's ORM integrator.
	///
	/// Only attributes bound to this form's mode are written. Returns the
	/// record as stored.
	pub async fn save(&self, clean: &HashMap<String, Value>) -> AdminResult<Record> {
		let record = self.assign(clean)?;
		let fields = self.model.form_fields(self.mode);
		let orm = self.model.orm()?;
		let schema = self.model.schema();
		match (self.mode, &self.primary_key) {
			(FormMode::Edit, Some(id)) => orm
				.update_instance_only_fields(schema, record, &fields, id)
				.await
				.map_err(AdminError::integrator("failed to update instance")),
			(FormMode::Edit, None) => Err(AdminError::BadRequest(
				"instance id is required".to_string(),
			)),
			(FormMode::Add, _) => orm
				.create_instance_only_fields(schema, record, &fields)
				.await
				.map_err(AdminError::integrator("failed to create instance")),
		}
	}

	/// Renders the bound fields as paragraphs.
	pub fn html(&self) -> AdminResult<String> {
		Ok(self.form.as_p()?)
	}

	/// Display names of the rendered fields, in form order.
	pub fn labels(&self) -> Vec<&str> {
		self.model
			.fields()
			.iter()
			.filter(|config| config.form_field(self.mode).is_some())
			.map(|config| config.display_name.as_str())
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::descriptor::build_field_configs;
	use crate::core::schema::{Attribute, ModelHooks, ModelSchema, NativeType};
	use rstest::{fixture, rstest};
	use serde_json::json;
	use std::sync::Weak;

	#[fixture]
	fn model() -> Arc<Model> {
		let schema = ModelSchema::new(
			"Book",
			vec![
				Attribute::new("id", NativeType::I64).annotated("addForm:exclude;editForm:exclude"),
				Attribute::new("title", NativeType::String).annotated("required;maxLength:20"),
				Attribute::new("pages", NativeType::U32).annotated("min:1"),
				Attribute::new("in_print", NativeType::Bool),
			],
		);
		let fields = build_field_configs(&schema, &ModelHooks::default()).unwrap();
		Arc::new(Model {
			name: "Book".to_string(),
			display_name: "Book".to_string(),
			schema,
			fields,
			primary_key_type: NativeType::I64,
			orm: None,
			app_name: "library".to_string(),
			app_display_name: "Library".to_string(),
			app: Weak::new(),
			panel: Weak::new(),
		})
	}

	fn submission(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), vec![v.to_string()]))
			.collect()
	}

	#[rstest]
	fn test_binds_only_included_fields(model: Arc<Model>) {
		let form = ModelForm::add(&model).unwrap();

		let names: Vec<&str> = form.form().fields().iter().map(|f| f.name()).collect();
		assert_eq!(names, vec!["title", "pages", "in_print"]);
		assert_eq!(form.labels(), vec!["Title", "Pages", "In Print"]);
	}

	#[rstest]
	fn test_valid_submission(model: Arc<Model>) {
		// Arrange
		let mut form = ModelForm::add(&model).unwrap();

		// Act
		let clean = form
			.submit(&submission(&[("title", "Dune"), ("pages", "412"), ("in_print", "on")]))
			.unwrap()
			.unwrap();

		// Assert
		assert_eq!(clean["title"], json!("Dune"));
		assert_eq!(clean["pages"], json!(412));
		assert_eq!(clean["in_print"], json!(true));
	}

	#[rstest]
	fn test_invalid_submission_keeps_input(model: Arc<Model>) {
		// Arrange
		let mut form = ModelForm::add(&model).unwrap();

		// Act
		let clean = form.submit(&submission(&[("title", ""), ("pages", "0")])).unwrap();

		// Assert
		assert!(clean.is_none());
		let errors = form.form().errors();
		assert!(!errors.field("title").is_empty());
		assert!(!errors.field("pages").is_empty());
		assert_eq!(form.form().get_field("pages").unwrap().initial(), Some(&json!(0)));
	}

	#[rstest]
	fn test_unconvertible_input_is_bad_request(model: Arc<Model>) {
		let mut form = ModelForm::add(&model).unwrap();

		let result = form.submit(&submission(&[("title", "Dune"), ("pages", "many")]));

		let error = result.unwrap_err();
		assert_eq!(error.status_code().as_u16(), 400);
	}

	#[rstest]
	fn test_assign_starts_from_template(model: Arc<Model>) {
		let form = ModelForm::add(&model).unwrap();
		let clean = HashMap::from([
			("title".to_string(), json!("Dune")),
			("pages".to_string(), Value::Null),
		]);

		let record = form.assign(&clean).unwrap();

		assert_eq!(record["id"], json!(0));
		assert_eq!(record["title"], json!("Dune"));
		assert_eq!(record["pages"], json!(0));
		assert_eq!(record["in_print"], json!(false));
	}

	#[rstest]
	#[case("pages", json!(-3))]
	#[case("missing", json!("x"))]
	fn test_assign_rejects(model: Arc<Model>, #[case] name: &str, #[case] value: Value) {
		let form = ModelForm::add(&model).unwrap();
		let clean = HashMap::from([(name.to_string(), value)]);

		let result = form.assign(&clean);

		assert!(matches!(result, Err(AdminError::Assignment { attribute, .. }) if attribute == name));
	}

	#[rstest]
	fn test_edit_form_initial_values(model: Arc<Model>) {
		let mut form = ModelForm::edit(&model, json!(3)).unwrap();
		let mut record = Record::new();
		record.insert("title".to_string(), json!("Emma"));

		form.set_initial_from_record(&record);

		assert_eq!(form.primary_key(), Some(&json!(3)));
		assert!(form.html().unwrap().contains("value=\"Emma\""));
	}
}
