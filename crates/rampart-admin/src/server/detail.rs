//! Instance detail view

use super::{ensure, instance_row, model_entry, page_context, path_id};
use crate::adapters::RequestContext;
use crate::audit::LogStoreLevel;
use crate::core::{Instance, Model, Permissions, display_value};
use crate::templates::{FieldValue, InstancePageContext, render_context};
use crate::types::{AdminError, AdminResult, HandlerResponse};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// `GET .../:id/view`: the instance-view attributes of one instance.
pub async fn view(model: Arc<Model>, ctx: RequestContext) -> AdminResult<HandlerResponse> {
	let panel = model.panel()?;
	let id = model.parse_primary_key(&path_id(&panel, &ctx)?)?;
	debug!("Viewing '{}' instance {}", model.name(), id);

	let permissions = panel.permissions();
	let app_name = model.app_name();
	ensure(
		permissions.has_instance_read_permission(app_name, model.name(), &id, &ctx)?,
		"forbidden",
	)?;
	let page = page_context(&panel, &ctx, model.instance_repr(&id))?;

	let view_fields = model.instance_view_fields();
	let record = model
		.orm()?
		.fetch_instance_only_fields(model.schema(), &id, &view_fields)
		.await
		.map_err(AdminError::integrator("failed to fetch instance"))?
		.ok_or_else(|| AdminError::NotFound("instance not found".to_string()))?;

	let mut instance = Instance::new(&model, id.clone(), record);
	instance.load_permissions(permissions, &ctx)?;
	let fields = model
		.fields()
		.iter()
		.filter(|f| f.include_in_instance_view)
		.map(|f| FieldValue {
			display_name: f.display_name.clone(),
			value: display_value(instance.value(&f.name).unwrap_or(&Value::Null)),
		})
		.collect();

	let config = panel.config();
	let context = InstancePageContext {
		page,
		model: model_entry(config, &model, Permissions::default()),
		instance: instance_row(config, &instance, &[]),
		fields,
	};

	let html = render_context(panel.renderer(), "instance", &context)?;
	panel
		.create_log(
			&ctx,
			LogStoreLevel::InstanceView,
			&model.content_type(),
			Some(id.clone()),
			&instance.repr(),
			"",
		)
		.await?;
	Ok(HandlerResponse::ok(html))
}
