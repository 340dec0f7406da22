//! Template rendering for the admin interface
//!
//! Pages are rendered through the [`TemplateRenderer`] contract. The
//! default implementation, [`TeraRenderer`], uses Tera (Jinja2-style
//! templates). A page may be a single template or a composite: an ordered
//! list of templates whose first entry is rendered and may extend or
//! include the others.
//!
//! Two helper functions are exposed to templates:
//! - `link(path="/a/blog")` builds a panel link
//! - `asset(file="admin.css")` builds an asset link

use crate::core::{Permissions, RenderedNavBarItem};
use crate::types::{AdminError, AdminResult};
use parking_lot::RwLock;
use rampart_forms::escape_html;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tera::Tera;

/// Data handed to a template
pub type TemplateData = Map<String, Value>;

/// Maps a path or file name to a full link
pub type LinkFunc = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Page templates registered by every panel, each composed with `page.html`
pub const DEFAULT_PAGES: [&str; 7] = [
	"root",
	"app",
	"model",
	"instance",
	"edit_instance",
	"new_instance",
	"log",
];

/// Shared layout every default page extends
pub const LAYOUT_TEMPLATE: &str = "page.html";

const DEFAULT_TEMPLATES: [(&str, &str); 8] = [
	("page.html", include_str!("../templates/page.html")),
	("root.html", include_str!("../templates/root.html")),
	("app.html", include_str!("../templates/app.html")),
	("model.html", include_str!("../templates/model.html")),
	("instance.html", include_str!("../templates/instance.html")),
	("edit_instance.html", include_str!("../templates/edit_instance.html")),
	("new_instance.html", include_str!("../templates/new_instance.html")),
	("log.html", include_str!("../templates/log.html")),
];

const DEFAULT_ASSETS: [(&str, &str); 1] = [("admin.css", include_str!("../assets/admin.css"))];

/// Rendering contract consumed by the panel.
///
/// Custom templates and assets always win over defaults of the same name.
pub trait TemplateRenderer: Send + Sync {
	fn render_template(&self, name: &str, data: &TemplateData) -> AdminResult<String>;

	fn register_default_template(&self, name: &str, content: &str);

	/// Registers `name` as the composition of `parts`; `parts[0]` is rendered.
	fn register_composite_default_template(&self, name: &str, parts: &[&str]) -> AdminResult<()>;

	/// Data merged under every render call's own data.
	fn register_default_data(&self, data: TemplateData);

	fn add_custom_template(&self, name: &str, content: &str);

	fn add_custom_composite_template(&self, name: &str, parts: &[&str]) -> AdminResult<()>;

	fn register_default_asset(&self, name: &str, content: Vec<u8>);

	fn add_custom_asset(&self, name: &str, content: Vec<u8>);

	fn asset(&self, name: &str) -> Option<Vec<u8>>;

	fn register_link_func(&self, func: LinkFunc);

	fn register_assets_func(&self, func: LinkFunc);
}

/// Registers the bundled templates, page composites and stylesheet.
pub fn register_defaults(renderer: &dyn TemplateRenderer) -> AdminResult<()> {
	for (name, content) in DEFAULT_TEMPLATES {
		renderer.register_default_template(name, content);
	}
	for (name, content) in DEFAULT_ASSETS {
		renderer.register_default_asset(name, content.as_bytes().to_vec());
	}
	for page in DEFAULT_PAGES {
		let entry = format!("{}.html", page);
		renderer.register_composite_default_template(page, &[entry.as_str(), LAYOUT_TEMPLATE])?;
	}
	Ok(())
}

/// Serializes `context` and renders template `name` with it.
pub fn render_context<T: Serialize>(
	renderer: &dyn TemplateRenderer,
	name: &str,
	context: &T,
) -> AdminResult<String> {
	match serde_json::to_value(context) {
		Ok(Value::Object(data)) => renderer.render_template(name, &data),
		Ok(_) => Err(AdminError::TemplateError(format!(
			"context for template {} is not a map",
			name
		))),
		Err(e) => Err(AdminError::TemplateError(format!(
			"context for template {} could not be serialized: {}",
			name, e
		))),
	}
}

fn validate_parts(name: &str, parts: &[&str]) -> AdminResult<Vec<String>> {
	if parts.is_empty() {
		return Err(AdminError::TemplateError(format!(
			"composite template {} needs at least one part",
			name
		)));
	}
	Ok(parts.iter().map(|p| p.to_string()).collect())
}

fn escape(input: &str) -> String {
	escape_html(input).into_owned()
}

#[derive(Default)]
struct RendererState {
	default_templates: HashMap<String, String>,
	custom_templates: HashMap<String, String>,
	default_composites: HashMap<String, Vec<String>>,
	custom_composites: HashMap<String, Vec<String>>,
	default_data: TemplateData,
	default_assets: HashMap<String, Vec<u8>>,
	custom_assets: HashMap<String, Vec<u8>>,
	link_func: Option<LinkFunc>,
	assets_func: Option<LinkFunc>,
}

impl RendererState {
	/// Template actually rendered for `name`.
	fn entry_name(&self, name: &str) -> Option<String> {
		if self.custom_templates.contains_key(name) {
			return Some(name.to_string());
		}
		if let Some(parts) = self.custom_composites.get(name) {
			return parts.first().cloned();
		}
		if let Some(parts) = self.default_composites.get(name) {
			return parts.first().cloned();
		}
		self.default_templates
			.contains_key(name)
			.then(|| name.to_string())
	}

	fn build(&self) -> AdminResult<Tera> {
		let mut sources = self.default_templates.clone();
		sources.extend(self.custom_templates.clone());

		let mut tera = Tera::default();
		tera.set_escape_fn(escape);
		tera.add_raw_templates(sources)
			.map_err(|e| AdminError::TemplateError(format!("templates could not be combined: {}", e)))?;

		let link = self.link_func.clone();
		tera.register_function("link", move |args: &HashMap<String, Value>| -> tera::Result<Value> {
			let path = args.get("path").and_then(Value::as_str).unwrap_or_default();
			Ok(Value::String(match &link {
				Some(func) => func(path),
				None => path.to_string(),
			}))
		});
		let asset = self.assets_func.clone();
		tera.register_function("asset", move |args: &HashMap<String, Value>| -> tera::Result<Value> {
			let file = args.get("file").and_then(Value::as_str).unwrap_or_default();
			Ok(Value::String(match &asset {
				Some(func) => func(file),
				None => file.to_string(),
			}))
		});
		Ok(tera)
	}
}

/// Tera-backed [`TemplateRenderer`].
///
/// Templates are compiled on first render after any registration.
#[derive(Default)]
pub struct TeraRenderer {
	state: RwLock<RendererState>,
	compiled: RwLock<Option<Arc<Tera>>>,
}

impl TeraRenderer {
	pub fn new() -> Self {
		Self::default()
	}

	fn invalidate(&self) {
		*self.compiled.write() = None;
	}

	fn compiled(&self) -> AdminResult<Arc<Tera>> {
		if let Some(tera) = self.compiled.read().as_ref() {
			return Ok(Arc::clone(tera));
		}
		let mut compiled = self.compiled.write();
		if let Some(tera) = compiled.as_ref() {
			return Ok(Arc::clone(tera));
		}
		let tera = Arc::new(self.state.read().build()?);
		*compiled = Some(Arc::clone(&tera));
		Ok(tera)
	}
}

impl std::fmt::Debug for TeraRenderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.read();
		f.debug_struct("TeraRenderer")
			.field("default_templates", &state.default_templates.len())
			.field("custom_templates", &state.custom_templates.len())
			.field("assets", &(state.default_assets.len() + state.custom_assets.len()))
			.finish()
	}
}

impl TemplateRenderer for TeraRenderer {
	fn render_template(&self, name: &str, data: &TemplateData) -> AdminResult<String> {
		let tera = self.compiled()?;
		let (entry, mut merged) = {
			let state = self.state.read();
			let entry = state
				.entry_name(name)
				.ok_or_else(|| AdminError::TemplateError(format!("template {} not found", name)))?;
			(entry, state.default_data.clone())
		};
		merged.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));

		let context = tera::Context::from_value(Value::Object(merged))
			.map_err(|e| AdminError::TemplateError(e.to_string()))?;
		tera.render(&entry, &context).map_err(|e| {
			AdminError::TemplateError(format!("error executing template {}: {}", name, e))
		})
	}

	fn register_default_template(&self, name: &str, content: &str) {
		self.state
			.write()
			.default_templates
			.insert(name.to_string(), content.to_string());
		self.invalidate();
	}

	fn register_composite_default_template(&self, name: &str, parts: &[&str]) -> AdminResult<()> {
		let parts = validate_parts(name, parts)?;
		self.state
			.write()
			.default_composites
			.insert(name.to_string(), parts);
		Ok(())
	}

	fn register_default_data(&self, data: TemplateData) {
		self.state.write().default_data.extend(data);
	}

	fn add_custom_template(&self, name: &str, content: &str) {
		self.state
			.write()
			.custom_templates
			.insert(name.to_string(), content.to_string());
		self.invalidate();
	}

	fn add_custom_composite_template(&self, name: &str, parts: &[&str]) -> AdminResult<()> {
		let parts = validate_parts(name, parts)?;
		self.state
			.write()
			.custom_composites
			.insert(name.to_string(), parts);
		Ok(())
	}

	fn register_default_asset(&self, name: &str, content: Vec<u8>) {
		self.state
			.write()
			.default_assets
			.insert(name.to_string(), content);
	}

	fn add_custom_asset(&self, name: &str, content: Vec<u8>) {
		self.state
			.write()
			.custom_assets
			.insert(name.to_string(), content);
	}

	fn asset(&self, name: &str) -> Option<Vec<u8>> {
		let state = self.state.read();
		state
			.custom_assets
			.get(name)
			.or_else(|| state.default_assets.get(name))
			.cloned()
	}

	fn register_link_func(&self, func: LinkFunc) {
		self.state.write().link_func = Some(func);
		self.invalidate();
	}

	fn register_assets_func(&self, func: LinkFunc) {
		self.state.write().assets_func = Some(func);
		self.invalidate();
	}
}

/// Model summary shown in the sidebar and on dashboard pages
#[derive(Debug, Clone, Serialize)]
pub struct ModelEntry {
	pub name: String,
	pub display_name: String,
	pub link: String,
	pub add_link: String,
	pub permissions: Permissions,
}

/// App summary with the models the requester may read
#[derive(Debug, Clone, Serialize)]
pub struct AppEntry {
	pub name: String,
	pub display_name: String,
	pub link: String,
	pub models: Vec<ModelEntry>,
}

/// Data shared by every page: site name, navigation and sidebar
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
	pub site_name: String,
	pub title: String,
	pub root_link: String,
	pub nav_bar_items: Vec<RenderedNavBarItem>,
	pub apps: Vec<AppEntry>,
}

/// Column header of the list view
#[derive(Debug, Clone, Serialize)]
pub struct Column {
	pub name: String,
	pub display_name: String,
}

/// One instance as rendered in the list and detail views
#[derive(Debug, Clone, Serialize)]
pub struct InstanceRow {
	pub id: String,
	pub repr: String,
	pub cells: Vec<String>,
	pub view_link: String,
	pub edit_link: String,
	pub permissions: Permissions,
}

/// Attribute shown on the detail page
#[derive(Debug, Clone, Serialize)]
pub struct FieldValue {
	pub display_name: String,
	pub value: String,
}

/// Audit log entry prepared for display
#[derive(Debug, Clone, Serialize)]
pub struct LogEntryView {
	pub id: String,
	pub link: String,
	pub action_time: String,
	pub action_flag: String,
	pub user_repr: String,
	pub content_type: String,
	pub object_id: String,
	pub repr: String,
	pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RootPageContext {
	#[serde(flatten)]
	pub page: PageContext,
	pub logs: Vec<LogEntryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppPageContext {
	#[serde(flatten)]
	pub page: PageContext,
	pub app: AppEntry,
}

/// List view of one model
#[derive(Debug, Clone, Serialize)]
pub struct ModelPageContext {
	#[serde(flatten)]
	pub page: PageContext,
	pub model: ModelEntry,
	pub columns: Vec<Column>,
	pub instances: Vec<InstanceRow>,
	pub total_count: u64,
	pub total_pages: u64,
	pub current_page: u64,
	pub per_page: u64,
	pub search: String,
	pub previous_page_link: Option<String>,
	pub next_page_link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstancePageContext {
	#[serde(flatten)]
	pub page: PageContext,
	pub model: ModelEntry,
	pub instance: InstanceRow,
	pub fields: Vec<FieldValue>,
}

/// Add or edit form page
#[derive(Debug, Clone, Serialize)]
pub struct FormPageContext {
	#[serde(flatten)]
	pub page: PageContext,
	pub model: ModelEntry,
	/// Set on edit pages only
	pub instance: Option<InstanceRow>,
	pub action_link: String,
	pub form_html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogPageContext {
	#[serde(flatten)]
	pub page: PageContext,
	pub entry: LogEntryView,
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn renderer() -> TeraRenderer {
		let renderer = TeraRenderer::new();
		renderer.register_default_template("layout.html", "<main>{% block body %}{% endblock %}</main>");
		renderer.register_default_template(
			"hello.html",
			r#"{% extends "layout.html" %}{% block body %}Hello {{ name }}{% endblock %}"#,
		);
		renderer
			.register_composite_default_template("hello", &["hello.html", "layout.html"])
			.unwrap();
		renderer
	}

	fn data(value: Value) -> TemplateData {
		match value {
			Value::Object(map) => map,
			_ => TemplateData::new(),
		}
	}

	#[rstest]
	fn test_renders_composite_entry(renderer: TeraRenderer) {
		let html = renderer
			.render_template("hello", &data(json!({"name": "Ada"})))
			.unwrap();

		assert_eq!(html, "<main>Hello Ada</main>");
	}

	#[rstest]
	fn test_custom_template_wins(renderer: TeraRenderer) {
		// Arrange
		renderer.add_custom_template(
			"hello.html",
			r#"{% extends "layout.html" %}{% block body %}Hi {{ name }}{% endblock %}"#,
		);

		// Act
		let html = renderer
			.render_template("hello", &data(json!({"name": "Ada"})))
			.unwrap();

		// Assert
		assert_eq!(html, "<main>Hi Ada</main>");
	}

	#[rstest]
	fn test_default_data_is_overridden_by_call_data(renderer: TeraRenderer) {
		renderer.register_default_data(data(json!({"name": "default"})));

		let fallback = renderer.render_template("hello", &TemplateData::new()).unwrap();
		let explicit = renderer
			.render_template("hello", &data(json!({"name": "Grace"})))
			.unwrap();

		assert_eq!(fallback, "<main>Hello default</main>");
		assert_eq!(explicit, "<main>Hello Grace</main>");
	}

	#[rstest]
	fn test_values_are_escaped(renderer: TeraRenderer) {
		let html = renderer
			.render_template("hello", &data(json!({"name": "<script>"})))
			.unwrap();

		assert_eq!(html, "<main>Hello &lt;script&gt;</main>");
	}

	#[rstest]
	fn test_link_and_asset_functions() {
		// Arrange
		let renderer = TeraRenderer::new();
		renderer.register_link_func(Arc::new(|path| format!("/admin{}", path)));
		renderer.register_assets_func(Arc::new(|file| format!("/admin-assets/{}", file)));
		renderer.add_custom_template(
			"links.html",
			r#"{{ link(path="/a/blog") }} {{ asset(file="admin.css") }}"#,
		);

		// Act
		let html = renderer.render_template("links.html", &TemplateData::new()).unwrap();

		// Assert
		assert_eq!(html, "/admin/a/blog /admin-assets/admin.css");
	}

	#[rstest]
	fn test_unknown_template(renderer: TeraRenderer) {
		let result = renderer.render_template("missing", &TemplateData::new());

		assert!(matches!(result, Err(AdminError::TemplateError(msg)) if msg.contains("not found")));
	}

	#[rstest]
	fn test_empty_composite_is_rejected(renderer: TeraRenderer) {
		assert!(renderer.add_custom_composite_template("empty", &[]).is_err());
	}

	#[rstest]
	fn test_custom_asset_wins(renderer: TeraRenderer) {
		renderer.register_default_asset("admin.css", b"default".to_vec());
		renderer.add_custom_asset("admin.css", b"custom".to_vec());

		assert_eq!(renderer.asset("admin.css"), Some(b"custom".to_vec()));
		assert_eq!(renderer.asset("missing.css"), None);
	}

	#[rstest]
	fn test_bundled_pages_compile() {
		let renderer = TeraRenderer::new();
		register_defaults(&renderer).unwrap();

		assert!(renderer.compiled().is_ok());
		assert!(renderer.asset("admin.css").is_some());
	}
}
