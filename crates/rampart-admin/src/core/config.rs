//! Admin panel configuration
//!
//! [`AdminConfig`] is built once by the embedding application and handed to
//! [`AdminPanel::new`](crate::core::AdminPanel::new). Plain scalar options can
//! also be loaded from TOML through [`AdminSettings`].

use super::navbar::{NavBarGenerator, NavBarItem, RenderedNavBarItem, nav_bar_items};
use crate::adapters::RequestContext;
use crate::audit::{InMemoryLogStore, LogStore, LogStoreLevel};
use crate::templates::{TemplateRenderer, TeraRenderer};
use crate::types::BoxError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Resolves the acting user's id and display representation from a request
pub type UserFetcher =
	Arc<dyn Fn(&RequestContext) -> Result<(Option<Value>, String), BoxError> + Send + Sync>;

/// Failure while loading [`AdminSettings`]
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("failed to read admin settings file: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid admin settings: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Scalar options that can live in a settings file.
///
/// ```toml
/// name = "Back Office"
/// prefix = "staff"
/// default_instances_per_page = 25
/// log_store_level = "update"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
	pub name: String,
	pub prefix: String,
	pub assets_prefix: String,
	pub group_prefix: String,
	pub default_instances_per_page: u64,
	/// Capacity of the default in-memory log store
	pub log_capacity: usize,
	pub log_store_level: LogStoreLevel,
}

impl Default for AdminSettings {
	fn default() -> Self {
		Self {
			name: "Site Administration".to_string(),
			prefix: "admin".to_string(),
			assets_prefix: "admin-assets".to_string(),
			group_prefix: String::new(),
			default_instances_per_page: 10,
			log_capacity: InMemoryLogStore::DEFAULT_CAPACITY,
			log_store_level: LogStoreLevel::PanelView,
		}
	}
}

impl AdminSettings {
	pub fn from_toml(source: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(source)?)
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let source = std::fs::read_to_string(path)?;
		Self::from_toml(&source)
	}
}

/// Admin panel configuration
#[derive(Clone)]
pub struct AdminConfig {
	/// Site name shown in page titles
	pub name: String,
	/// URL prefix of every panel route, without slashes
	pub prefix: String,
	/// URL prefix assets are served under, without slashes
	pub assets_prefix: String,
	/// Prefix of the router group the panel is mounted in
	pub group_prefix: String,
	pub default_instances_per_page: u64,
	pub renderer: Arc<dyn TemplateRenderer>,
	pub nav_bar_generators: Vec<NavBarGenerator>,
	pub user_fetcher: Option<UserFetcher>,
	pub log_store: Arc<dyn LogStore>,
	/// Actions ranked above this level are not logged
	pub log_store_level: LogStoreLevel,
}

impl Default for AdminConfig {
	fn default() -> Self {
		Self::from_settings(AdminSettings::default())
	}
}

impl fmt::Debug for AdminConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdminConfig")
			.field("name", &self.name)
			.field("prefix", &self.prefix)
			.field("assets_prefix", &self.assets_prefix)
			.field("group_prefix", &self.group_prefix)
			.field("default_instances_per_page", &self.default_instances_per_page)
			.field("nav_bar_generators", &self.nav_bar_generators.len())
			.field("user_fetcher", &self.user_fetcher.is_some())
			.field("log_store_level", &self.log_store_level)
			.finish()
	}
}

fn default_nav_bar_generators() -> Vec<NavBarGenerator> {
	vec![
		Arc::new(|_: &RequestContext| NavBarItem::new("Welcome, User. ").bold()),
		Arc::new(|_: &RequestContext| NavBarItem::new("View Site").with_link("/")),
	]
}

impl AdminConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a configuration from scalar settings, with the default
	/// renderer, navigation bar and an in-memory log store.
	pub fn from_settings(settings: AdminSettings) -> Self {
		Self {
			name: settings.name,
			prefix: settings.prefix,
			assets_prefix: settings.assets_prefix,
			group_prefix: settings.group_prefix,
			default_instances_per_page: settings.default_instances_per_page,
			renderer: Arc::new(TeraRenderer::new()),
			nav_bar_generators: default_nav_bar_generators(),
			user_fetcher: None,
			log_store: Arc::new(InMemoryLogStore::new(settings.log_capacity)),
			log_store_level: settings.log_store_level,
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	pub fn with_assets_prefix(mut self, assets_prefix: impl Into<String>) -> Self {
		self.assets_prefix = assets_prefix.into();
		self
	}

	pub fn with_group_prefix(mut self, group_prefix: impl Into<String>) -> Self {
		self.group_prefix = group_prefix.into();
		self
	}

	pub fn with_default_instances_per_page(mut self, per_page: u64) -> Self {
		self.default_instances_per_page = per_page;
		self
	}

	pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
		self.renderer = renderer;
		self
	}

	/// Replaces the navigation bar generators.
	pub fn with_nav_bar_generators(mut self, generators: Vec<NavBarGenerator>) -> Self {
		self.nav_bar_generators = generators;
		self
	}

	pub fn with_user_fetcher<F>(mut self, fetcher: F) -> Self
	where
		F: Fn(&RequestContext) -> Result<(Option<Value>, String), BoxError> + Send + Sync + 'static,
	{
		self.user_fetcher = Some(Arc::new(fetcher));
		self
	}

	pub fn with_log_store(mut self, log_store: Arc<dyn LogStore>) -> Self {
		self.log_store = log_store;
		self
	}

	pub fn with_log_store_level(mut self, level: LogStoreLevel) -> Self {
		self.log_store_level = level;
		self
	}

	/// `/{prefix}`, or empty when no prefix is configured.
	pub fn prefix_path(&self) -> String {
		leading_slash(&self.prefix)
	}

	/// `/{assets_prefix}`, or empty when no assets prefix is configured.
	pub fn assets_path(&self) -> String {
		leading_slash(&self.assets_prefix)
	}

	/// Full link to a panel-relative path.
	///
	/// # Examples
	///
	/// ```
	/// use rampart_admin::core::AdminConfig;
	///
	/// let config = AdminConfig::new().with_group_prefix("/backoffice");
	/// assert_eq!(config.link("/a/blog"), "/backoffice/admin/a/blog");
	/// ```
	pub fn link(&self, path: &str) -> String {
		format!("{}{}{}", self.group_prefix, self.prefix_path(), path)
	}

	/// Full link to a bundled or custom asset.
	pub fn asset_link(&self, file: &str) -> String {
		format!("{}{}/{}", self.group_prefix, self.assets_path(), file)
	}

	pub fn nav_bar_items(&self, ctx: &RequestContext) -> Vec<RenderedNavBarItem> {
		nav_bar_items(&self.nav_bar_generators, ctx)
	}
}

fn leading_slash(segment: &str) -> String {
	if segment.is_empty() {
		String::new()
	} else {
		format!("/{}", segment)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let config = AdminConfig::default();

		assert_eq!(config.name, "Site Administration");
		assert_eq!(config.prefix, "admin");
		assert_eq!(config.assets_prefix, "admin-assets");
		assert_eq!(config.default_instances_per_page, 10);
		assert_eq!(config.log_store_level, LogStoreLevel::PanelView);
		assert!(config.user_fetcher.is_none());
	}

	#[rstest]
	#[case("admin", "", "/x", "/admin/x")]
	#[case("", "", "/x", "/x")]
	#[case("admin", "/api", "", "/api/admin")]
	fn test_link(
		#[case] prefix: &str,
		#[case] group_prefix: &str,
		#[case] path: &str,
		#[case] expected: &str,
	) {
		let config = AdminConfig::new()
			.with_prefix(prefix)
			.with_group_prefix(group_prefix);

		assert_eq!(config.link(path), expected);
	}

	#[rstest]
	#[case("admin-assets", "/admin-assets/admin.css")]
	#[case("", "/admin.css")]
	fn test_asset_link(#[case] assets_prefix: &str, #[case] expected: &str) {
		let config = AdminConfig::new().with_assets_prefix(assets_prefix);

		assert_eq!(config.asset_link("admin.css"), expected);
	}

	#[rstest]
	fn test_default_nav_bar() {
		let ctx: RequestContext = Arc::new(());

		let items = AdminConfig::default().nav_bar_items(&ctx);

		assert_eq!(items.len(), 2);
		assert!(items[0].html.contains("<h2"));
		assert!(!items[0].append_slash);
		assert_eq!(items[1].html, r#"<a class="link" href="/">View Site</a>"#);
	}

	#[rstest]
	fn test_settings_from_toml() {
		// Arrange
		let source = r#"
			name = "Back Office"
			prefix = "staff"
			default_instances_per_page = 25
			log_capacity = 5
			log_store_level = "update"
		"#;

		// Act
		let settings = AdminSettings::from_toml(source).unwrap();
		let config = AdminConfig::from_settings(settings.clone());

		// Assert
		assert_eq!(settings.assets_prefix, "admin-assets");
		assert_eq!(config.name, "Back Office");
		assert_eq!(config.link("/"), "/staff/");
		assert_eq!(config.default_instances_per_page, 25);
		assert_eq!(config.log_store_level, LogStoreLevel::Update);
	}

	#[rstest]
	fn test_settings_reject_unknown_level() {
		let result = AdminSettings::from_toml(r#"log_store_level = "verbose""#);

		assert!(matches!(result, Err(SettingsError::Parse(_))));
	}
}
