//! Route handlers
//!
//! Every handler is an `async fn(Arc<T>, RequestContext)` returning
//! [`AdminResult<HandlerResponse>`](crate::types::AdminResult). [`handler`]
//! adapts one into the integrator-facing [`Handler`] shape, turning errors
//! into formatted error pages.

pub mod create;
pub mod dashboard;
pub mod delete;
pub mod detail;
pub mod error;
pub mod list;
pub mod log;
pub mod update;

pub use error::{error_html, error_response};

use crate::adapters::{Handler, RequestContext};
use crate::audit::LogEntry;
use crate::core::{
	AdminConfig, AdminPanel, AppAccess, Instance, LOG_BASE_LINK, Model, ModelForm, Permissions,
	display_value,
};
use crate::templates::{
	AppEntry, FormPageContext, InstanceRow, LogEntryView, ModelEntry, PageContext, render_context,
};
use crate::types::{AdminError, AdminResult, HandlerResponse};
use futures::future::BoxFuture;
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Wraps `f` into a route handler bound to `target`.
///
/// Only a weak reference to `target` is kept; once it is dropped the
/// handler answers with a 500 page.
pub(crate) fn handler<T, F, Fut>(target: &Arc<T>, f: F) -> Handler
where
	T: Send + Sync + 'static,
	F: Fn(Arc<T>, RequestContext) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = AdminResult<HandlerResponse>> + Send + 'static,
{
	let target = Arc::downgrade(target);
	let f = Arc::new(f);
	Arc::new(move |ctx: RequestContext| -> BoxFuture<'static, HandlerResponse> {
		let target = target.clone();
		let f = Arc::clone(&f);
		Box::pin(async move {
			let result = match target.upgrade() {
				Some(target) => f(target, ctx).await,
				None => Err(AdminError::PanelUnavailable),
			};
			result.unwrap_or_else(|e| {
				if e.status_code().is_server_error() {
					error!("Admin handler failed: {}", e);
				} else {
					warn!("Admin request rejected: {}", e);
				}
				error_response(&e)
			})
		})
	})
}

/// Registers the list, detail, delete, add and edit routes of `model`.
pub(crate) fn register_model_routes(panel: &Arc<AdminPanel>, model: &Arc<Model>) {
	let base = format!("{}{}", panel.config().prefix_path(), model.link());
	let web = panel.web();

	web.handle_route(Method::GET, &base, handler(model, list::list));
	web.handle_route(
		Method::GET,
		&format!("{}/:id/view", base),
		handler(model, detail::view),
	);
	web.handle_route(
		Method::DELETE,
		&format!("{}/:id/view", base),
		handler(model, delete::delete),
	);
	for method in [Method::GET, Method::POST] {
		web.handle_route(method.clone(), &format!("{}/add", base), handler(model, create::add));
		web.handle_route(method, &format!("{}/:id/edit", base), handler(model, update::edit));
	}
	debug!("Registered routes under '{}'", base);
}

/// Turns a denied permission check into a 403.
pub(crate) fn ensure(allowed: bool, message: &str) -> AdminResult<()> {
	if allowed {
		Ok(())
	} else {
		Err(AdminError::PermissionDenied(message.to_string()))
	}
}

/// The `:id` path parameter, which must be present and non-empty.
pub(crate) fn path_id(panel: &AdminPanel, ctx: &RequestContext) -> AdminResult<String> {
	panel
		.web()
		.path_param(ctx, "id")
		.filter(|id| !id.is_empty())
		.ok_or_else(|| AdminError::BadRequest("instance id is required".to_string()))
}

/// The submitted form body, which must be readable.
pub(crate) fn form_data(
	panel: &AdminPanel,
	ctx: &RequestContext,
) -> AdminResult<HashMap<String, Vec<String>>> {
	panel
		.web()
		.form_data(ctx)
		.ok_or_else(|| AdminError::BadRequest("form data is required".to_string()))
}

/// Renders an add or edit form page.
pub(crate) fn form_page(
	panel: &AdminPanel,
	ctx: &RequestContext,
	model: &Model,
	form: &ModelForm,
	instance: Option<InstanceRow>,
	action_link: String,
) -> AdminResult<HandlerResponse> {
	let (template, title) = match &instance {
		Some(instance) => ("edit_instance", format!("Edit {}", instance.repr)),
		None => ("new_instance", format!("Add {}", model.display_name())),
	};
	let config = panel.config();
	let context = FormPageContext {
		page: page_context(panel, ctx, title)?,
		model: model_entry(config, model, Permissions::default()),
		instance,
		action_link,
		form_html: form.html()?,
	};
	Ok(HandlerResponse::ok(render_context(
		panel.renderer(),
		template,
		&context,
	)?))
}

/// Audit message of a create or update: the clean data as a JSON object.
pub(crate) fn clean_data_message(clean: &HashMap<String, Value>) -> String {
	Value::Object(clean.clone().into_iter().collect()).to_string()
}

pub(crate) fn page_context(
	panel: &AdminPanel,
	ctx: &RequestContext,
	title: impl Into<String>,
) -> AdminResult<PageContext> {
	let config = panel.config();
	let apps = panel
		.apps_with_read_permission(ctx)?
		.iter()
		.map(|access| app_entry(config, access))
		.collect();
	Ok(PageContext {
		site_name: config.name.clone(),
		title: title.into(),
		root_link: config.link(""),
		nav_bar_items: config.nav_bar_items(ctx),
		apps,
	})
}

pub(crate) fn app_entry(config: &AdminConfig, access: &AppAccess) -> AppEntry {
	AppEntry {
		name: access.app.name().to_string(),
		display_name: access.app.display_name().to_string(),
		link: config.link(&access.app.link()),
		models: access
			.models
			.iter()
			.map(|m| model_entry(config, &m.model, m.permissions))
			.collect(),
	}
}

pub(crate) fn model_entry(config: &AdminConfig, model: &Model, permissions: Permissions) -> ModelEntry {
	ModelEntry {
		name: model.name().to_string(),
		display_name: model.display_name().to_string(),
		link: config.link(&model.link()),
		add_link: config.link(&model.add_link()),
		permissions,
	}
}

/// Renders `columns` of the instance as plain-text cells.
pub(crate) fn instance_row(config: &AdminConfig, instance: &Instance, columns: &[String]) -> InstanceRow {
	InstanceRow {
		id: instance.id_segment(),
		repr: instance.repr(),
		cells: columns
			.iter()
			.map(|name| instance.value(name).map(display_value).unwrap_or_default())
			.collect(),
		view_link: config.link(&instance.view_link()),
		edit_link: config.link(&instance.edit_link()),
		permissions: instance.permissions,
	}
}

pub(crate) fn log_entry_view(config: &AdminConfig, entry: &LogEntry) -> LogEntryView {
	LogEntryView {
		id: entry.id.to_string(),
		link: config.link(&format!("{}/{}", LOG_BASE_LINK, entry.id)),
		action_time: entry.action_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
		action_flag: entry.action_flag.to_string(),
		user_repr: entry.user_repr.clone(),
		content_type: entry.content_type.clone(),
		object_id: entry.object_id.as_ref().map(display_value).unwrap_or_default(),
		repr: entry.repr().to_string(),
		message: entry.message.clone(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_clean_data_message_is_sorted_json() {
		let clean = HashMap::from([
			("title".to_string(), json!("Dune")),
			("pages".to_string(), json!(412)),
		]);

		assert_eq!(clean_data_message(&clean), r#"{"pages":412,"title":"Dune"}"#);
	}

	#[rstest]
	#[case(true, true)]
	#[case(false, false)]
	fn test_ensure(#[case] allowed: bool, #[case] ok: bool) {
		let result = ensure(allowed, "forbidden");

		assert_eq!(result.is_ok(), ok);
		if let Err(e) = result {
			assert_eq!(e.status_code().as_u16(), 403);
		}
	}
}
