//! Model list view

use super::{ensure, instance_row, model_entry, page_context};
use crate::adapters::RequestContext;
use crate::audit::LogStoreLevel;
use crate::core::{Instance, Model, Permissions};
use crate::templates::{Column, ModelPageContext, render_context};
use crate::types::{AdminError, AdminResult, HandlerResponse, ListQueryParams};
use std::sync::Arc;
use tracing::debug;
use url::form_urlencoded;

/// `GET {prefix}/a/{app}/{model}`: paginated, searchable instance list.
///
/// Rows the requester may not read are dropped before paginating. A page
/// past the end renders no rows.
pub async fn list(model: Arc<Model>, ctx: RequestContext) -> AdminResult<HandlerResponse> {
	let panel = model.panel()?;
	let config = panel.config();
	let web = panel.web();
	let params = ListQueryParams::parse(
		web.query_param(&ctx, "page").as_deref(),
		web.query_param(&ctx, "perPage").as_deref(),
		web.query_param(&ctx, "search").as_deref(),
	);
	let page = params.page();
	let per_page = params.per_page(config.default_instances_per_page);
	debug!(
		"Listing '{}' page {} ({} per page)",
		model.name(),
		page,
		per_page
	);

	let permissions = panel.permissions();
	let app_name = model.app_name();
	ensure(
		permissions.has_model_read_permission(app_name, model.name(), &ctx)?,
		"forbidden",
	)?;
	let page_ctx = page_context(&panel, &ctx, model.display_name())?;

	let orm = model.orm()?;
	let fetch_fields = model.list_fetch_fields();
	let records = match &params.search {
		Some(query) => {
			orm.fetch_instances_only_fields_with_search(
				model.schema(),
				&fetch_fields,
				query,
				&model.search_fields(),
			)
			.await
		}
		None => {
			orm.fetch_instances_only_fields(model.schema(), &fetch_fields)
				.await
		}
	}
	.map_err(AdminError::integrator("failed to fetch instances"))?;

	let mut readable = Vec::with_capacity(records.len());
	for record in records {
		let instance = Instance::from_record(&model, record)?;
		if permissions.has_instance_read_permission(app_name, model.name(), &instance.id, &ctx)? {
			readable.push(instance);
		}
	}

	let total_count = readable.len() as u64;
	let total_pages = total_count.div_ceil(per_page);
	let start = (page - 1).saturating_mul(per_page).min(total_count) as usize;
	let end = (start as u64).saturating_add(per_page).min(total_count) as usize;

	let columns: Vec<Column> = model
		.fields()
		.iter()
		.filter(|f| f.include_in_list_display)
		.map(|f| Column {
			name: f.name.clone(),
			display_name: f.display_name.clone(),
		})
		.collect();
	let column_names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();

	let mut instances = Vec::with_capacity(end - start);
	for instance in &mut readable[start..end] {
		instance.load_permissions(permissions, &ctx)?;
		instances.push(instance_row(config, instance, &column_names));
	}

	let model_permissions = Permissions {
		read: true,
		create: permissions.has_model_create_permission(app_name, model.name(), &ctx)?,
		..Permissions::default()
	};
	let base = config.link(&model.link());
	let search = params.search.clone().unwrap_or_default();
	let context = ModelPageContext {
		page: page_ctx,
		model: model_entry(config, &model, model_permissions),
		columns,
		instances,
		total_count,
		total_pages,
		current_page: page,
		per_page,
		previous_page_link: (page > 1).then(|| page_link(&base, page - 1, per_page, &search)),
		next_page_link: (page < total_pages).then(|| page_link(&base, page + 1, per_page, &search)),
		search,
	};

	let html = render_context(panel.renderer(), "model", &context)?;
	panel
		.create_log(
			&ctx,
			LogStoreLevel::ListView,
			&model.content_type(),
			None,
			"",
			"",
		)
		.await?;
	Ok(HandlerResponse::ok(html))
}

fn page_link(base: &str, page: u64, per_page: u64, search: &str) -> String {
	let mut query = form_urlencoded::Serializer::new(String::new());
	query.append_pair("page", &page.to_string());
	query.append_pair("perPage", &per_page.to_string());
	if !search.is_empty() {
		query.append_pair("search", search);
	}
	format!("{}?{}", base, query.finish())
}
