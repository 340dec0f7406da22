//! Request context used by [`MockWeb`](crate::web::MockWeb)

use http::Method;
use rampart_admin::RequestContext;
use std::collections::HashMap;
use std::sync::Arc;

/// A fake inbound request.
///
/// Path parameters are filled in by the router when the request is
/// dispatched.
#[derive(Debug, Clone)]
pub struct TestRequest {
	pub method: Method,
	pub path: String,
	pub query: HashMap<String, String>,
	pub path_params: HashMap<String, String>,
	pub form: Option<HashMap<String, Vec<String>>>,
	/// Name of the signed-in user, if any
	pub user: Option<String>,
}

impl TestRequest {
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: HashMap::new(),
			path_params: HashMap::new(),
			form: None,
			user: None,
		}
	}

	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// POST with an empty form body.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path).with_form(&[])
	}

	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	pub fn with_query(mut self, name: &str, value: &str) -> Self {
		self.query.insert(name.to_string(), value.to_string());
		self
	}

	/// Replaces the form body with single-valued fields.
	pub fn with_form(mut self, fields: &[(&str, &str)]) -> Self {
		self.form = Some(
			fields
				.iter()
				.map(|(k, v)| (k.to_string(), vec![v.to_string()]))
				.collect(),
		);
		self
	}

	/// Drops the form body, as if it could not be parsed.
	pub fn without_form(mut self) -> Self {
		self.form = None;
		self
	}

	pub fn with_user(mut self, user: &str) -> Self {
		self.user = Some(user.to_string());
		self
	}

	pub fn into_context(self) -> RequestContext {
		Arc::new(self)
	}

	/// The request behind a context created by this crate.
	pub fn from_context(ctx: &RequestContext) -> Option<&TestRequest> {
		ctx.downcast_ref::<TestRequest>()
	}
}
