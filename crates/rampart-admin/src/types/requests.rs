//! Request types for admin panel handlers

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Action a permission request asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	Read,
	Create,
	Update,
	Delete,
	LogView,
}

impl Action {
	pub fn as_str(&self) -> &'static str {
		match self {
			Action::Read => "read",
			Action::Create => "create",
			Action::Update => "update",
			Action::Delete => "delete",
			Action::LogView => "log_view",
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The single unit of authorization context handed to the permission function.
///
/// Unset scope fields widen the request: no app name means the whole panel,
/// an app name without a model means the app, and so on down to a single
/// instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRequest {
	pub app_name: Option<String>,
	pub model_name: Option<String>,
	pub instance_id: Option<Value>,
	pub action: Action,
}

impl PermissionRequest {
	pub fn panel(action: Action) -> Self {
		Self {
			app_name: None,
			model_name: None,
			instance_id: None,
			action,
		}
	}

	pub fn app(app_name: impl Into<String>, action: Action) -> Self {
		Self {
			app_name: Some(app_name.into()),
			..Self::panel(action)
		}
	}

	pub fn model(app_name: impl Into<String>, model_name: impl Into<String>, action: Action) -> Self {
		Self {
			model_name: Some(model_name.into()),
			..Self::app(app_name, action)
		}
	}

	pub fn instance(
		app_name: impl Into<String>,
		model_name: impl Into<String>,
		instance_id: Value,
		action: Action,
	) -> Self {
		Self {
			instance_id: Some(instance_id),
			..Self::model(app_name, model_name, action)
		}
	}
}

/// Query parameters accepted by the model list view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQueryParams {
	/// Page number (1-indexed)
	pub page: Option<u64>,
	/// Items per page
	pub per_page: Option<u64>,
	/// Search query, OR-matched across searchable attributes
	pub search: Option<String>,
}

impl ListQueryParams {
	/// Smallest page size the list view will use.
	pub const MIN_PER_PAGE: u64 = 10;

	/// Parses raw query values. Unparseable numbers fall back to defaults.
	pub fn parse(page: Option<&str>, per_page: Option<&str>, search: Option<&str>) -> Self {
		Self {
			page: page.and_then(|p| p.trim().parse().ok()),
			per_page: per_page.and_then(|p| p.trim().parse().ok()),
			search: search.filter(|s| !s.is_empty()).map(str::to_string),
		}
	}

	pub fn page(&self) -> u64 {
		self.page.unwrap_or(1).max(1)
	}

	pub fn per_page(&self, default: u64) -> u64 {
		self.per_page.unwrap_or(default).max(Self::MIN_PER_PAGE)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_instance_request_fills_every_scope() {
		let request = PermissionRequest::instance("blog", "Post", json!(7), Action::Delete);

		assert_eq!(request.app_name.as_deref(), Some("blog"));
		assert_eq!(request.model_name.as_deref(), Some("Post"));
		assert_eq!(request.instance_id, Some(json!(7)));
		assert_eq!(request.action, Action::Delete);
	}

	#[rstest]
	#[case(None, None, 1, 10)]
	#[case(Some("3"), Some("25"), 3, 25)]
	#[case(Some("0"), Some("2"), 1, 10)]
	#[case(Some("x"), Some("y"), 1, 10)]
	#[case(Some("-4"), Some("50"), 1, 50)]
	fn test_list_query_defaults_and_floors(
		#[case] page: Option<&str>,
		#[case] per_page: Option<&str>,
		#[case] expected_page: u64,
		#[case] expected_per_page: u64,
	) {
		let params = ListQueryParams::parse(page, per_page, None);

		assert_eq!(params.page(), expected_page);
		assert_eq!(params.per_page(10), expected_per_page);
	}

	#[rstest]
	fn test_empty_search_is_none() {
		assert_eq!(ListQueryParams::parse(None, None, Some("")).search, None);
	}
}
