//! Add form

use super::{clean_data_message, ensure, form_data, form_page};
use crate::adapters::RequestContext;
use crate::audit::LogStoreLevel;
use crate::core::{Model, ModelForm};
use crate::types::{AdminError, AdminResult, HandlerResponse};
use http::Method;
use std::sync::Arc;
use tracing::{debug, info};

/// `GET|POST .../add`.
///
/// A GET renders the empty form. A valid POST creates the instance and
/// redirects to its detail page; an invalid one re-renders the form with
/// the submitted values and inline errors.
pub async fn add(model: Arc<Model>, ctx: RequestContext) -> AdminResult<HandlerResponse> {
	let panel = model.panel()?;
	ensure(
		panel
			.permissions()
			.has_model_create_permission(model.app_name(), model.name(), &ctx)?,
		"forbidden",
	)?;

	let config = panel.config();
	let action_link = config.link(&model.add_link());
	let mut form = ModelForm::add(&model)?;
	let method = panel.web().request_method(&ctx);
	match method {
		Method::GET => form_page(&panel, &ctx, &model, &form, None, action_link),
		Method::POST => {
			let data = form_data(&panel, &ctx)?;
			let Some(clean) = form.submit(&data)? else {
				debug!("Add form for '{}' failed validation", model.name());
				return form_page(&panel, &ctx, &model, &form, None, action_link);
			};

			let record = form.save(&clean).await?;
			let id = model.primary_key_value(&record)?;
			info!("Created '{}' instance {}", model.name(), id);

			panel
				.create_log(
					&ctx,
					LogStoreLevel::Create,
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
