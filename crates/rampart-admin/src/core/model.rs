//! Registered models

use super::app::App;
use super::descriptor::FieldConfig;
use super::instance::display_value;
use super::panel::AdminPanel;
use super::schema::{FormMode, ModelSchema, NativeType, Record};
use crate::adapters::OrmIntegrator;
use crate::types::{AdminError, AdminResult};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};

/// A data shape registered with an [`App`], with its derived field configs.
///
/// Field configs are computed once at registration and never change.
pub struct Model {
	pub(crate) name: String,
	pub(crate) display_name: String,
	pub(crate) schema: ModelSchema,
	pub(crate) fields: Vec<FieldConfig>,
	pub(crate) primary_key_type: NativeType,
	pub(crate) orm: Option<Arc<dyn OrmIntegrator>>,
	pub(crate) app_name: String,
	pub(crate) app_display_name: String,
	pub(crate) app: Weak<App>,
	pub(crate) panel: Weak<AdminPanel>,
}

impl fmt::Debug for Model {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Model")
			.field("name", &self.name)
			.field("display_name", &self.display_name)
			.field("app", &self.app_name)
			.field("primary_key_type", &self.primary_key_type)
			.field("fields", &self.fields.len())
			.field("orm", &self.orm.is_some())
			.finish()
	}
}

impl Model {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	pub fn app_name(&self) -> &str {
		&self.app_name
	}

	pub fn schema(&self) -> &ModelSchema {
		&self.schema
	}

	pub fn fields(&self) -> &[FieldConfig] {
		&self.fields
	}

	pub fn field(&self, name: &str) -> Option<&FieldConfig> {
		self.fields.iter().find(|f| f.name == name)
	}

	pub fn primary_key_type(&self) -> &NativeType {
		&self.primary_key_type
	}

	pub fn panel(&self) -> AdminResult<Arc<AdminPanel>> {
		self.panel.upgrade().ok_or(AdminError::PanelUnavailable)
	}

	/// The model's own integrator, else its app's, else the panel's.
	pub fn orm(&self) -> AdminResult<Arc<dyn OrmIntegrator>> {
		if let Some(orm) = &self.orm {
			return Ok(Arc::clone(orm));
		}
		let app = self.app.upgrade().ok_or(AdminError::PanelUnavailable)?;
		app.orm()
	}

	/// `"App | Model"` label used in audit log entries.
	pub fn content_type(&self) -> String {
		format!("{} | {}", self.app_display_name, self.display_name)
	}

	/// Attribute names matching `include`.
	pub fn field_names(&self, include: impl Fn(&FieldConfig) -> bool) -> Vec<String> {
		self.fields
			.iter()
			.filter(|f| include(f))
			.map(|f| f.name.clone())
			.collect()
	}

	pub fn list_fetch_fields(&self) -> Vec<String> {
		self.field_names(|f| f.include_in_list_fetch)
	}

	pub fn search_fields(&self) -> Vec<String> {
		self.field_names(|f| f.include_in_search)
	}

	pub fn instance_view_fields(&self) -> Vec<String> {
		self.field_names(|f| f.include_in_instance_view)
	}

	pub fn form_fields(&self, mode: FormMode) -> Vec<String> {
		self.field_names(|f| f.form_field(mode).is_some())
	}

	/// Parses a URL path segment into the primary key's native value.
	pub fn parse_primary_key(&self, raw: &str) -> AdminResult<Value> {
		self.primary_key_type
			.parse(raw)
			.map_err(|reason| AdminError::BadRequest(format!("invalid instance id '{}': {}", raw, reason)))
	}

	pub fn primary_key_value(&self, record: &Record) -> AdminResult<Value> {
		self.orm()?
			.primary_key_value(&self.schema, record)
			.map_err(AdminError::integrator("failed to read primary key"))
	}

	/// Panel-relative link of the list view.
	pub fn link(&self) -> String {
		format!("/a/{}/{}", self.app_name, self.name)
	}

	pub fn add_link(&self) -> String {
		format!("{}/add", self.link())
	}

	pub fn instance_link(&self, id: &Value) -> String {
		format!("{}/{}", self.link(), display_value(id))
	}

	pub fn instance_view_link(&self, id: &Value) -> String {
		format!("{}/view", self.instance_link(id))
	}

	pub fn instance_edit_link(&self, id: &Value) -> String {
		format!("{}/edit", self.instance_link(id))
	}

	/// Display representation of one instance.
	pub fn instance_repr(&self, id: &Value) -> String {
		format!("{} {}", self.display_name, display_value(id))
	}
}
