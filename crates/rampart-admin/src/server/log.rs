//! Audit log entry page

use super::{log_entry_view, page_context, path_id};
use crate::adapters::RequestContext;
use crate::audit::LogStoreLevel;
use crate::core::AdminPanel;
use crate::templates::{LogPageContext, render_context};
use crate::types::{AdminError, AdminResult, HandlerResponse};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Content type recorded when a log entry is viewed
pub const LOG_VIEW_CONTENT_TYPE: &str = "Admin | LogView";

/// `GET {prefix}/i/log/:id`.
pub async fn view_log(panel: Arc<AdminPanel>, ctx: RequestContext) -> AdminResult<HandlerResponse> {
	let raw = path_id(&panel, &ctx)?;
	let log_id = Uuid::parse_str(&raw)
		.map_err(|e| AdminError::BadRequest(format!("invalid log entry id '{}': {}", raw, e)))?;

	let entry = panel
		.config()
		.log_store
		.get_log_entry(log_id)
		.await
		.map_err(AdminError::LogStore)?
		.ok_or_else(|| AdminError::NotFound("log entry not found".to_string()))?;

	if !panel.permissions().has_log_view_permission(log_id, &ctx)? {
		return Err(AdminError::PermissionDenied(
			"you are not allowed to view this log entry".to_string(),
		));
	}

	let view = log_entry_view(panel.config(), &entry);
	let context = LogPageContext {
		page: page_context(&panel, &ctx, format!("Log entry {}", view.id))?,
		entry: view,
	};
	let html = render_context(panel.renderer(), "log", &context)?;

	panel
		.create_log(
			&ctx,
			LogStoreLevel::PanelView,
			LOG_VIEW_CONTENT_TYPE,
			Some(Value::String(entry.id.to_string())),
			entry.repr(),
			"",
		)
		.await?;
	Ok(HandlerResponse::ok(html))
}
