//! Edit form

use super::{clean_data_message, ensure, form_data, form_page, instance_row, path_id};
use crate::adapters::RequestContext;
use crate::audit::LogStoreLevel;
use crate::core::{FormMode, Instance, Model, ModelForm, Permissions, Record};
use crate::types::{AdminError, AdminResult, HandlerResponse};
use http::Method;
use std::sync::Arc;
use tracing::{debug, info};

/// `GET|POST .../:id/edit`.
///
/// A GET renders the form pre-populated from the stored instance. POST
/// follows the add flow, updating only the edit-form attributes.
pub async fn edit(model: Arc<Model>, ctx: RequestContext) -> AdminResult<HandlerResponse> {
	let panel = model.panel()?;
	let id = model.parse_primary_key(&path_id(&panel, &ctx)?)?;
	ensure(
		panel
			.permissions()
			.has_instance_update_permission(model.app_name(), model.name(), &id, &ctx)?,
		"forbidden",
	)?;

	let config = panel.config();
	let action_link = config.link(&model.instance_edit_link(&id));
	let instance = Instance::new(&model, id.clone(), Record::new()).with_permissions(Permissions {
		read: true,
		update: true,
		..Permissions::default()
	});
	let row = instance_row(config, &instance, &[]);
	let mut form = ModelForm::edit(&model, id.clone())?;
	let method = panel.web().request_method(&ctx);
	match method {
		Method::GET => {
			let record = model
				.orm()?
				.fetch_instance_only_fields(model.schema(), &id, &model.form_fields(FormMode::Edit))
				.await
				.map_err(AdminError::integrator("failed to fetch instance"))?
				.ok_or_else(|| AdminError::NotFound("instance not found".to_string()))?;
			form.set_initial_from_record(&record);
			form_page(&panel, &ctx, &model, &form, Some(row), action_link)
		}
		Method::POST => {
			let data = form_data(&panel, &ctx)?;
			let Some(clean) = form.submit(&data)? else {
				debug!("Edit form for '{}' {} failed validation", model.name(), id);
				return form_page(&panel, &ctx, &model, &form, Some(row), action_link);
			};

			form.save(&clean).await?;
			info!("Updated '{}' instance {}", model.name(), id);

			panel
				.create_log(
					&ctx,
					LogStoreLevel::Update,
					&model.content_type(),
					Some(id.clone()),
					&model.instance_repr(&id),
					&clean_data_message(&clean),
				)
				.await?;
			Ok(HandlerResponse::redirect(
				config.link(&model.instance_view_link(&id)),
			))
		}
		other => Err(AdminError::MethodNotAllowed(other.to_string())),
	}
}
