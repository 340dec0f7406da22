//! The admin panel root aggregate

use super::app::{App, ModelAccess};
use super::config::AdminConfig;
use super::permissions::PermissionChecker;
use super::utils::is_url_safe;
use crate::adapters::{OrmIntegrator, RequestContext, WebIntegrator};
use crate::audit::{LogEntry, LogStoreLevel};
use crate::server;
use crate::templates::{self, TemplateRenderer};
use crate::types::{AdminError, AdminResult, RegistrationError};
use chrono::Utc;
use http::Method;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Panel-relative base link of audit log entries
pub const LOG_BASE_LINK: &str = "/i/log";

/// Number of recent log entries shown on the dashboard
pub const DASHBOARD_LOG_ENTRIES: usize = 20;

/// An app the requester may read, with its readable models
#[derive(Debug, Clone)]
pub struct AppAccess {
	pub app: Arc<App>,
	pub models: Vec<ModelAccess>,
}

/// Owns the apps, the integrators, the permission checker and the
/// configuration. Routes are wired at construction and registration time.
pub struct AdminPanel {
	config: AdminConfig,
	permissions: PermissionChecker,
	orm: Arc<dyn OrmIntegrator>,
	web: Arc<dyn WebIntegrator>,
	apps: RwLock<IndexMap<String, Arc<App>>>,
}

impl fmt::Debug for AdminPanel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdminPanel")
			.field("config", &self.config)
			.field("apps", &self.apps.read().keys().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

impl AdminPanel {
	/// Creates a panel and registers its templates, assets, the dashboard
	/// route and the log route.
	pub fn new(
		config: AdminConfig,
		orm: Arc<dyn OrmIntegrator>,
		web: Arc<dyn WebIntegrator>,
		permissions: PermissionChecker,
	) -> AdminResult<Arc<Self>> {
		let renderer = Arc::clone(&config.renderer);
		templates::register_defaults(renderer.as_ref())?;

		let link_base = config.link("");
		renderer.register_link_func(Arc::new(move |path| format!("{}{}", link_base, path)));
		let asset_base = format!("{}{}", config.group_prefix, config.assets_path());
		renderer.register_assets_func(Arc::new(move |file| format!("{}/{}", asset_base, file)));

		web.serve_assets(&config.assets_prefix, renderer);

		let panel = Arc::new(Self {
			config,
			permissions,
			orm,
			web,
			apps: RwLock::new(IndexMap::new()),
		});

		let prefix = panel.config.prefix_path();
		panel.web.handle_route(
			Method::GET,
			&prefix,
			server::handler(&panel, server::dashboard::root),
		);
		panel.web.handle_route(
			Method::GET,
			&format!("{}{}/:id", prefix, LOG_BASE_LINK),
			server::handler(&panel, server::log::view_log),
		);

		info!(
			"Admin panel '{}' mounted at '{}'",
			panel.config.name,
			panel.config.link("")
		);
		Ok(panel)
	}

	pub fn config(&self) -> &AdminConfig {
		&self.config
	}

	pub fn permissions(&self) -> &PermissionChecker {
		&self.permissions
	}

	pub fn orm(&self) -> Arc<dyn OrmIntegrator> {
		Arc::clone(&self.orm)
	}

	pub fn web(&self) -> &dyn WebIntegrator {
		self.web.as_ref()
	}

	pub fn renderer(&self) -> &dyn TemplateRenderer {
		self.config.renderer.as_ref()
	}

	/// Registered apps in registration order.
	pub fn apps(&self) -> Vec<Arc<App>> {
		self.apps.read().values().cloned().collect()
	}

	pub fn app(&self, name: &str) -> Option<Arc<App>> {
		self.apps.read().get(name).cloned()
	}

	/// Registers an app and its page route.
	///
	/// `orm` overrides the panel's integrator for every model of the app
	/// that does not bring its own.
	pub fn register_app(
		self: &Arc<Self>,
		name: &str,
		display_name: &str,
		orm: Option<Arc<dyn OrmIntegrator>>,
	) -> Result<Arc<App>, RegistrationError> {
		if !is_url_safe(name) {
			return Err(RegistrationError::UnsafeAppName(name.to_string()));
		}

		let app = Arc::new(App {
			name: name.to_string(),
			display_name: display_name.to_string(),
			orm,
			models: RwLock::new(IndexMap::new()),
			panel: Arc::downgrade(self),
		});

		{
			let mut apps = self.apps.write();
			if apps.contains_key(name) {
				return Err(RegistrationError::DuplicateApp(name.to_string()));
			}
			apps.insert(name.to_string(), Arc::clone(&app));
		}

		self.web.handle_route(
			Method::GET,
			&format!("{}{}", self.config.prefix_path(), app.link()),
			server::handler(&app, server::dashboard::app_page),
		);
		info!("Registered admin app '{}'", name);
		Ok(app)
	}

	/// Records an audit log entry, unless the configured level filters it out.
	pub async fn create_log(
		&self,
		ctx: &RequestContext,
		action: LogStoreLevel,
		content_type: &str,
		object_id: Option<Value>,
		object_repr: &str,
		message: &str,
	) -> AdminResult<()> {
		if !self.config.log_store_level.permits(action) {
			debug!(
				"Skipping '{}' audit entry below configured level '{}'",
				action, self.config.log_store_level
			);
			return Ok(());
		}

		let (user_id, user_repr) = match &self.config.user_fetcher {
			Some(fetch) => fetch(ctx).map_err(AdminError::UserFetch)?,
			None => (None, String::new()),
		};

		let entry = LogEntry {
			id: Uuid::new_v4(),
			action_time: Utc::now(),
			user_id,
			user_repr,
			content_type: content_type.to_string(),
			object_id,
			object_repr: object_repr.to_string(),
			action_flag: action,
			message: message.to_string(),
		};
		self.config
			.log_store
			.insert_log_entry(entry)
			.await
			.map_err(AdminError::LogStore)
	}

	/// Up to `max` newest entries the requester may view.
	///
	/// Store failures yield no entries; entries whose permission check fails
	/// are skipped.
	pub async fn log_entries(&self, ctx: &RequestContext, max: usize) -> Vec<LogEntry> {
		let entries = match self.config.log_store.get_log_entries().await {
			Ok(entries) => entries,
			Err(e) => {
				warn!("Failed to read audit log entries: {}", e);
				return Vec::new();
			}
		};

		entries
			.into_iter()
			.take(max)
			.filter(|entry| match self.permissions.has_log_view_permission(entry.id, ctx) {
				Ok(allowed) => allowed,
				Err(e) => {
					debug!("Skipping audit entry {}: {}", entry.id, e);
					false
				}
			})
			.collect()
	}

	/// Apps the requester may read, each with its readable models.
	pub fn apps_with_read_permission(&self, ctx: &RequestContext) -> AdminResult<Vec<AppAccess>> {
		let mut readable = Vec::new();
		for app in self.apps() {
			if !self.permissions.has_app_read_permission(&app.name, ctx)? {
				continue;
			}
			let models = app.models_with_read_permission(ctx)?;
			readable.push(AppAccess { app, models });
		}
		Ok(readable)
	}
}
