//! Instance deletion

use super::{ensure, path_id};
use crate::adapters::RequestContext;
use crate::audit::LogStoreLevel;
use crate::core::Model;
use crate::types::{AdminError, AdminResult, HandlerResponse};
use std::sync::Arc;
use tracing::info;

/// `DELETE .../:id/view`: deletes the instance and redirects to the list.
pub async fn delete(model: Arc<Model>, ctx: RequestContext) -> AdminResult<HandlerResponse> {
	let panel = model.panel()?;
	let id = model.parse_primary_key(&path_id(&panel, &ctx)?)?;

	ensure(
		panel
			.permissions()
			.has_instance_delete_permission(model.app_name(), model.name(), &id, &ctx)?,
		"forbidden",
	)?;

	model
		.orm()?
		.delete_instance(model.schema(), &id)
		.await
		.map_err(AdminError::integrator("failed to delete instance"))?;
	info!("Deleted '{}' instance {}", model.name(), id);

	panel
		.create_log(
			&ctx,
			LogStoreLevel::Delete,
			&model.content_type(),
			Some(id.clone()),
			&model.instance_repr(&id),
			"",
		)
		.await?;
	Ok(HandlerResponse::redirect(panel.config().link(&model.link())))
}
