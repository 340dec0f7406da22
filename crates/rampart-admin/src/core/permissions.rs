//! Permission engine
//!
//! A single [`PermissionFunc`] decides every access. The `has_*` helpers only
//! fill in the scope of the [`PermissionRequest`]; no scope implies another,
//! and nothing is cached.

use crate::adapters::RequestContext;
use crate::types::{Action, AdminError, AdminResult, BoxError, PermissionRequest};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Decides whether the requester in `ctx` may perform `request`
pub type PermissionFunc =
	Arc<dyn Fn(&PermissionRequest, &RequestContext) -> Result<bool, BoxError> + Send + Sync>;

/// Computed permissions of the requester on a model or instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Permissions {
	pub read: bool,
	pub create: bool,
	pub update: bool,
	pub delete: bool,
}

/// Typed front end to the permission function
#[derive(Clone)]
pub struct PermissionChecker {
	func: PermissionFunc,
}

impl fmt::Debug for PermissionChecker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PermissionChecker").finish_non_exhaustive()
	}
}

impl PermissionChecker {
	pub fn new<F>(func: F) -> Self
	where
		F: Fn(&PermissionRequest, &RequestContext) -> Result<bool, BoxError> + Send + Sync + 'static,
	{
		Self {
			func: Arc::new(func),
		}
	}

	pub fn from_func(func: PermissionFunc) -> Self {
		Self { func }
	}

	/// Grants everything. Useful for tests and trusted deployments.
	pub fn allow_all() -> Self {
		Self::new(|_, _| Ok(true))
	}

	/// Runs the permission function. Its errors are never treated as a deny.
	pub fn check(&self, request: &PermissionRequest, ctx: &RequestContext) -> AdminResult<bool> {
		(self.func)(request, ctx).map_err(AdminError::PermissionCheck)
	}

	pub fn has_read_permission(&self, ctx: &RequestContext) -> AdminResult<bool> {
		self.check(&PermissionRequest::panel(Action::Read), ctx)
	}

	pub fn has_app_read_permission(&self, app: &str, ctx: &RequestContext) -> AdminResult<bool> {
		self.check(&PermissionRequest::app(app, Action::Read), ctx)
	}

	pub fn has_model_read_permission(
		&self,
		app: &str,
		model: &str,
		ctx: &RequestContext,
	) -> AdminResult<bool> {
		self.check(&PermissionRequest::model(app, model, Action::Read), ctx)
	}

	pub fn has_model_create_permission(
		&self,
		app: &str,
		model: &str,
		ctx: &RequestContext,
	) -> AdminResult<bool> {
		self.check(&PermissionRequest::model(app, model, Action::Create), ctx)
	}

	pub fn has_model_update_permission(
		&self,
		app: &str,
		model: &str,
		ctx: &RequestContext,
	) -> AdminResult<bool> {
		self.check(&PermissionRequest::model(app, model, Action::Update), ctx)
	}

	pub fn has_model_delete_permission(
		&self,
		app: &str,
		model: &str,
		ctx: &RequestContext,
	) -> AdminResult<bool> {
		self.check(&PermissionRequest::model(app, model, Action::Delete), ctx)
	}

	pub fn has_instance_read_permission(
		&self,
		app: &str,
		model: &str,
		id: &Value,
		ctx: &RequestContext,
	) -> AdminResult<bool> {
		self.check(
			&PermissionRequest::instance(app, model, id.clone(), Action::Read),
			ctx,
		)
	}

	pub fn has_instance_update_permission(
		&self,
		app: &str,
		model: &str,
		id: &Value,
		ctx: &RequestContext,
	) -> AdminResult<bool> {
		self.check(
			&PermissionRequest::instance(app, model, id.clone(), Action::Update),
			ctx,
		)
	}

	pub fn has_instance_delete_permission(
		&self,
		app: &str,
		model: &str,
		id: &Value,
		ctx: &RequestContext,
	) -> AdminResult<bool> {
		self.check(
			&PermissionRequest::instance(app, model, id.clone(), Action::Delete),
			ctx,
		)
	}

	/// Log entries are panel-scoped; the entry id travels as the instance id.
	pub fn has_log_view_permission(&self, log_id: Uuid, ctx: &RequestContext) -> AdminResult<bool> {
		let request = PermissionRequest {
			instance_id: Some(Value::String(log_id.to_string())),
			..PermissionRequest::panel(Action::LogView)
		};
		self.check(&request, ctx)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use parking_lot::Mutex;
	use rstest::rstest;
	use serde_json::json;

	fn recording() -> (PermissionChecker, Arc<Mutex<Vec<PermissionRequest>>>) {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&seen);
		let checker = PermissionChecker::new(move |request, _| {
			sink.lock().push(request.clone());
			Ok(request.action != Action::Delete)
		});
		(checker, seen)
	}

	#[rstest]
	fn test_wrappers_fill_scope() {
		// Arrange
		let (checker, seen) = recording();
		let ctx: RequestContext = Arc::new(());

		// Act
		checker.has_read_permission(&ctx).unwrap();
		checker.has_app_read_permission("blog", &ctx).unwrap();
		checker.has_model_create_permission("blog", "Post", &ctx).unwrap();
		checker
			.has_instance_update_permission("blog", "Post", &json!(3), &ctx)
			.unwrap();

		// Assert
		let seen = seen.lock();
		assert_eq!(seen[0], PermissionRequest::panel(Action::Read));
		assert_eq!(seen[1], PermissionRequest::app("blog", Action::Read));
		assert_eq!(seen[2], PermissionRequest::model("blog", "Post", Action::Create));
		assert_eq!(
			seen[3],
			PermissionRequest::instance("blog", "Post", json!(3), Action::Update)
		);
	}

	#[rstest]
	fn test_log_view_request() {
		let (checker, seen) = recording();
		let ctx: RequestContext = Arc::new(());
		let id = Uuid::new_v4();

		checker.has_log_view_permission(id, &ctx).unwrap();

		let request = seen.lock()[0].clone();
		assert_eq!(request.action, Action::LogView);
		assert_eq!(request.app_name, None);
		assert_eq!(request.instance_id, Some(json!(id.to_string())));
	}

	#[rstest]
	fn test_errors_are_not_denials() {
		let checker = PermissionChecker::new(|_, _| Err("directory offline".into()));
		let ctx: RequestContext = Arc::new(());

		let result = checker.has_read_permission(&ctx);

		assert!(matches!(result, Err(AdminError::PermissionCheck(_))));
	}
}
