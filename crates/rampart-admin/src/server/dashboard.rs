//! Root dashboard and app pages

use super::{app_entry, ensure, log_entry_view, page_context};
use crate::adapters::RequestContext;
use crate::audit::LogStoreLevel;
use crate::core::{AdminPanel, App, AppAccess, DASHBOARD_LOG_ENTRIES};
use crate::templates::{AppPageContext, RootPageContext, render_context};
use crate::types::{AdminResult, HandlerResponse};
use std::sync::Arc;
use tracing::debug;

/// `GET {prefix}`: readable apps and the most recent visible log entries.
pub async fn root(panel: Arc<AdminPanel>, ctx: RequestContext) -> AdminResult<HandlerResponse> {
	debug!("Rendering admin dashboard");
	ensure(panel.permissions().has_read_permission(&ctx)?, "forbidden")?;

	let config = panel.config();
	let page = page_context(&panel, &ctx, config.name.clone())?;
	let logs = panel
		.log_entries(&ctx, DASHBOARD_LOG_ENTRIES)
		.await
		.iter()
		.map(|entry| log_entry_view(config, entry))
		.collect();

	let html = render_context(panel.renderer(), "root", &RootPageContext { page, logs })?;
	panel
		.create_log(&ctx, LogStoreLevel::PanelView, "", None, "", "")
		.await?;
	Ok(HandlerResponse::ok(html))
}

/// `GET {prefix}/a/{app}`: the app's readable models.
pub async fn app_page(app: Arc<App>, ctx: RequestContext) -> AdminResult<HandlerResponse> {
	debug!("Rendering admin app '{}'", app.name());
	let panel = app.panel()?;
	ensure(
		panel.permissions().has_app_read_permission(app.name(), &ctx)?,
		"forbidden",
	)?;

	let page = page_context(&panel, &ctx, app.display_name())?;
	let access = AppAccess {
		models: app.models_with_read_permission(&ctx)?,
		app: Arc::clone(&app),
	};
	let context = AppPageContext {
		page,
		app: app_entry(panel.config(), &access),
	};

	let html = render_context(panel.renderer(), "app", &context)?;
	panel
		.create_log(&ctx, LogStoreLevel::PanelView, app.display_name(), None, "", "")
		.await?;
	Ok(HandlerResponse::ok(html))
}
