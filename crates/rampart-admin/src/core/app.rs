//! Apps group related models

use super::descriptor::build_field_configs;
use super::model::Model;
use super::panel::AdminPanel;
use super::permissions::Permissions;
use super::schema::{AdminModel, ModelHooks, ModelSchema};
use super::utils::{humanize_name, is_url_safe};
use crate::adapters::{OrmIntegrator, RequestContext};
use crate::server;
use crate::types::{AdminError, AdminResult, RegistrationError};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::info;

/// A named group of models. Models keep their registration order.
pub struct App {
	pub(crate) name: String,
	pub(crate) display_name: String,
	pub(crate) orm: Option<Arc<dyn OrmIntegrator>>,
	pub(crate) models: RwLock<IndexMap<String, Arc<Model>>>,
	pub(crate) panel: Weak<AdminPanel>,
}

impl fmt::Debug for App {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("App")
			.field("name", &self.name)
			.field("display_name", &self.display_name)
			.field("models", &self.models.read().keys().collect::<Vec<_>>())
			.field("orm", &self.orm.is_some())
			.finish()
	}
}

/// A readable model and what the requester may do with it
#[derive(Debug, Clone)]
pub struct ModelAccess {
	pub model: Arc<Model>,
	pub permissions: Permissions,
}

impl App {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	/// Panel-relative link of the app page.
	pub fn link(&self) -> String {
		format!("/a/{}", self.name)
	}

	pub fn panel(&self) -> AdminResult<Arc<AdminPanel>> {
		self.panel.upgrade().ok_or(AdminError::PanelUnavailable)
	}

	/// The app's own integrator, else the panel's.
	pub fn orm(&self) -> AdminResult<Arc<dyn OrmIntegrator>> {
		match &self.orm {
			Some(orm) => Ok(Arc::clone(orm)),
			None => Ok(self.panel()?.orm()),
		}
	}

	/// Registered models in registration order.
	pub fn models(&self) -> Vec<Arc<Model>> {
		self.models.read().values().cloned().collect()
	}

	pub fn model(&self, name: &str) -> Option<Arc<Model>> {
		self.models.read().get(name).cloned()
	}

	pub fn model_count(&self) -> usize {
		self.models.read().len()
	}

	/// Registers a typed model.
	pub fn register_model<T: AdminModel>(
		self: &Arc<Self>,
		orm: Option<Arc<dyn OrmIntegrator>>,
	) -> Result<Arc<Model>, RegistrationError> {
		let schema = ModelSchema::of::<T>()?;
		self.register_schema(schema, ModelHooks::of::<T>(), orm)
	}

	/// Registers a model from an explicit schema.
	///
	/// Either the model and all of its routes are registered, or nothing is.
	pub fn register_schema(
		self: &Arc<Self>,
		schema: ModelSchema,
		hooks: ModelHooks,
		orm: Option<Arc<dyn OrmIntegrator>>,
	) -> Result<Arc<Model>, RegistrationError> {
		let name = hooks
			.admin_name
			.clone()
			.unwrap_or_else(|| schema.type_name().to_string());
		if !is_url_safe(&name) {
			return Err(RegistrationError::UnsafeModelName(name));
		}
		let display_name = hooks
			.admin_display_name
			.clone()
			.unwrap_or_else(|| humanize_name(&name));

		if self.models.read().contains_key(&name) {
			return Err(RegistrationError::DuplicateModel {
				app: self.name.clone(),
				model: name,
			});
		}

		let panel = self.panel.upgrade().ok_or(RegistrationError::PanelDropped)?;
		let fields = build_field_configs(&schema, &hooks)?;

		let resolved_orm = orm
			.clone()
			.or_else(|| self.orm.clone())
			.unwrap_or_else(|| panel.orm());
		let primary_key_type = resolved_orm.primary_key_type(&schema).map_err(|source| {
			RegistrationError::MissingPrimaryKey {
				model: name.clone(),
				source,
			}
		})?;

		let model = Arc::new(Model {
			name: name.clone(),
			display_name,
			schema,
			fields,
			primary_key_type,
			orm,
			app_name: self.name.clone(),
			app_display_name: self.display_name.clone(),
			app: Arc::downgrade(self),
			panel: Arc::downgrade(&panel),
		});

		{
			let mut models = self.models.write();
			if models.contains_key(&name) {
				return Err(RegistrationError::DuplicateModel {
					app: self.name.clone(),
					model: name,
				});
			}
			models.insert(name.clone(), Arc::clone(&model));
		}

		server::register_model_routes(&panel, &model);
		info!(
			"Registered admin model '{}' in app '{}' with {} fields",
			name,
			self.name,
			model.fields.len()
		);
		Ok(model)
	}

	/// Models the requester may read, with their model-level permissions.
	pub fn models_with_read_permission(&self, ctx: &RequestContext) -> AdminResult<Vec<ModelAccess>> {
		let permissions = self.panel()?.permissions().clone();
		let mut readable = Vec::new();
		for model in self.models() {
			if !permissions.has_model_read_permission(&self.name, &model.name, ctx)? {
				continue;
			}
			let access = Permissions {
				read: true,
				create: permissions.has_model_create_permission(&self.name, &model.name, ctx)?,
				update: permissions.has_model_update_permission(&self.name, &model.name, ctx)?,
				delete: permissions.has_model_delete_permission(&self.name, &model.name, ctx)?,
			};
			readable.push(ModelAccess {
				model,
				permissions: access,
			});
		}
		Ok(readable)
	}
}
