//! Per-request view of one record

use super::model::Model;
use super::permissions::{PermissionChecker, Permissions};
use super::schema::Record;
use crate::adapters::RequestContext;
use crate::types::AdminResult;
use serde_json::Value;
use std::sync::Arc;

/// One fetched or saved record of a model, together with the requester's
/// permissions on it
#[derive(Debug, Clone)]
pub struct Instance {
	pub id: Value,
	pub data: Record,
	pub model: Arc<Model>,
	pub permissions: Permissions,
}

impl Instance {
	pub fn new(model: &Arc<Model>, id: Value, data: Record) -> Self {
		Self {
			id,
			data,
			model: Arc::clone(model),
			permissions: Permissions::default(),
		}
	}

	/// Wraps `data`, reading its primary key through the model's integrator.
	pub fn from_record(model: &Arc<Model>, data: Record) -> AdminResult<Self> {
		let id = model.primary_key_value(&data)?;
		Ok(Self::new(model, id, data))
	}

	pub fn with_permissions(mut self, permissions: Permissions) -> Self {
		self.permissions = permissions;
		self
	}

	/// Computes update and delete permissions for this instance.
	///
	/// Read is granted, since the instance was already fetched for the
	/// requester. Create does not apply to an existing instance.
	pub fn load_permissions(
		&mut self,
		checker: &PermissionChecker,
		ctx: &RequestContext,
	) -> AdminResult<()> {
		let (app, model) = (self.model.app_name(), self.model.name());
		self.permissions = Permissions {
			read: true,
			create: false,
			update: checker.has_instance_update_permission(app, model, &self.id, ctx)?,
			delete: checker.has_instance_delete_permission(app, model, &self.id, ctx)?,
		};
		Ok(())
	}

	/// The primary key as it appears in URLs.
	pub fn id_segment(&self) -> String {
		display_value(&self.id)
	}

	pub fn value(&self, attribute: &str) -> Option<&Value> {
		self.data.get(attribute)
	}

	pub fn repr(&self) -> String {
		self.model.instance_repr(&self.id)
	}

	/// Panel-relative link of the detail view.
	pub fn view_link(&self) -> String {
		self.model.instance_view_link(&self.id)
	}

	/// Panel-relative link of the edit form.
	pub fn edit_link(&self) -> String {
		self.model.instance_edit_link(&self.id)
	}
}

/// Renders a native value as plain text: strings unquoted, null as empty.
pub fn display_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::descriptor::build_field_configs;
	use crate::core::schema::{Attribute, ModelHooks, ModelSchema, NativeType};
	use crate::types::{Action, PermissionRequest};
	use rstest::{fixture, rstest};
	use serde_json::json;
	use std::sync::Weak;

	#[fixture]
	fn model() -> Arc<Model> {
		let schema = ModelSchema::new(
			"Ticket",
			vec![
				Attribute::new("id", NativeType::I64),
				Attribute::new("subject", NativeType::String),
			],
		);
		let fields = build_field_configs(&schema, &ModelHooks::default()).unwrap();
		Arc::new(Model {
			name: "Ticket".to_string(),
			display_name: "Ticket".to_string(),
			schema,
			fields,
			primary_key_type: NativeType::I64,
			orm: None,
			app_name: "support".to_string(),
			app_display_name: "Support".to_string(),
			app: Weak::new(),
			panel: Weak::new(),
		})
	}

	#[rstest]
	#[case(json!(null), "")]
	#[case(json!("abc"), "abc")]
	#[case(json!(42), "42")]
	#[case(json!(true), "true")]
	#[case(json!(["a", "b"]), r#"["a","b"]"#)]
	fn test_display_value(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(display_value(&value), expected);
	}

	#[rstest]
	fn test_links_and_repr_come_from_model(model: Arc<Model>) {
		let instance = Instance::new(&model, json!(7), Record::new());

		assert_eq!(instance.id_segment(), "7");
		assert_eq!(instance.repr(), "Ticket 7");
		assert_eq!(instance.view_link(), "/a/support/Ticket/7/view");
		assert_eq!(instance.edit_link(), "/a/support/Ticket/7/edit");
		assert_eq!(instance.permissions, Permissions::default());
	}

	#[rstest]
	fn test_load_permissions_checks_this_instance(model: Arc<Model>) {
		// Arrange
		let checker = PermissionChecker::new(|request: &PermissionRequest, _: &RequestContext| {
			assert_eq!(request.app_name.as_deref(), Some("support"));
			assert_eq!(request.model_name.as_deref(), Some("Ticket"));
			assert_eq!(request.instance_id, Some(json!(3)));
			Ok(request.action == Action::Update)
		});
		let ctx: RequestContext = Arc::new(());
		let mut instance = Instance::new(&model, json!(3), Record::new());

		// Act
		instance.load_permissions(&checker, &ctx).unwrap();

		// Assert
		assert_eq!(
			instance.permissions,
			Permissions {
				read: true,
				create: false,
				update: true,
				delete: false,
			}
		);
	}

	#[rstest]
	fn test_load_permissions_propagates_errors(model: Arc<Model>) {
		let checker = PermissionChecker::new(|_, _| Err("backend down".into()));
		let ctx: RequestContext = Arc::new(());
		let mut instance = Instance::new(&model, json!(3), Record::new());

		assert!(instance.load_permissions(&checker, &ctx).is_err());
	}
}
