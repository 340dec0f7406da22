//! Recording web integrator

use crate::request::TestRequest;
use http::{Method, StatusCode};
use parking_lot::RwLock;
use rampart_admin::{
	Handler, HandlerResponse, RequestContext, TemplateRenderer, WebIntegrator, error_html,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

struct Route {
	method: Method,
	pattern: String,
	handler: Handler,
}

/// Records registered routes and dispatches [`TestRequest`]s to them.
///
/// Patterns use `:name` segments for path parameters.
#[derive(Default)]
pub struct MockWeb {
	routes: RwLock<Vec<Route>>,
	assets: RwLock<Option<(String, Arc<dyn TemplateRenderer>)>>,
}

impl fmt::Debug for MockWeb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MockWeb")
			.field("routes", &self.routes())
			.finish_non_exhaustive()
	}
}

/// Matches `path` against `pattern`, returning the captured parameters.
fn match_path(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
	let pattern: Vec<&str> = pattern.split('/').collect();
	let path: Vec<&str> = path.split('/').collect();
	if pattern.len() != path.len() {
		return None;
	}
	let mut params = HashMap::new();
	for (expected, actual) in pattern.iter().zip(path.iter()) {
		match expected.strip_prefix(':') {
			Some(name) => {
				params.insert(name.to_string(), actual.to_string());
			}
			None if expected == actual => {}
			None => return None,
		}
	}
	Some(params)
}

impl MockWeb {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registered `(method, pattern)` pairs in registration order.
	pub fn routes(&self) -> Vec<(Method, String)> {
		self.routes
			.read()
			.iter()
			.map(|r| (r.method.clone(), r.pattern.clone()))
			.collect()
	}

	pub fn has_route(&self, method: &Method, pattern: &str) -> bool {
		self.routes
			.read()
			.iter()
			.any(|r| &r.method == method && r.pattern == pattern)
	}

	/// Prefix assets are served under, once the panel registered it.
	pub fn assets_prefix(&self) -> Option<String> {
		self.assets.read().as_ref().map(|(prefix, _)| prefix.clone())
	}

	/// Serves `file` from the registered renderer.
	pub fn asset(&self, file: &str) -> Option<Vec<u8>> {
		let assets = self.assets.read();
		let (_, renderer) = assets.as_ref()?;
		renderer.asset(file)
	}

	fn lookup(&self, method: &Method, path: &str) -> Option<(Handler, HashMap<String, String>)> {
		self.routes
			.read()
			.iter()
			.filter(|r| &r.method == method)
			.find_map(|r| match_path(&r.pattern, path).map(|params| (Arc::clone(&r.handler), params)))
	}

	/// Routes `request` by its own method and path. Unknown routes yield 404.
	pub async fn dispatch(&self, request: TestRequest) -> HandlerResponse {
		let method = request.method.clone();
		self.dispatch_as(&method, request).await
	}

	/// Routes `request` as if it arrived with `route_method`, while the
	/// handler still sees the request's own method.
	pub async fn dispatch_as(&self, route_method: &Method, mut request: TestRequest) -> HandlerResponse {
		match self.lookup(route_method, &request.path) {
			Some((handler, params)) => {
				request.path_params.extend(params);
				handler(request.into_context()).await
			}
			None => HandlerResponse::Html {
				status: StatusCode::NOT_FOUND,
				body: error_html(StatusCode::NOT_FOUND, None),
			},
		}
	}
}

impl WebIntegrator for MockWeb {
	fn handle_route(&self, method: Method, path: &str, handler: Handler) {
		self.routes.write().push(Route {
			method,
			pattern: path.to_string(),
			handler,
		});
	}

	fn serve_assets(&self, prefix: &str, renderer: Arc<dyn TemplateRenderer>) {
		*self.assets.write() = Some((prefix.to_string(), renderer));
	}

	fn query_param(&self, ctx: &RequestContext, name: &str) -> Option<String> {
		TestRequest::from_context(ctx)?.query.get(name).cloned()
	}

	fn path_param(&self, ctx: &RequestContext, name: &str) -> Option<String> {
		TestRequest::from_context(ctx)?.path_params.get(name).cloned()
	}

	fn request_method(&self, ctx: &RequestContext) -> Method {
		TestRequest::from_context(ctx)
			.map(|r| r.method.clone())
			.unwrap_or(Method::GET)
	}

	fn form_data(&self, ctx: &RequestContext) -> Option<HashMap<String, Vec<String>>> {
		TestRequest::from_context(ctx)?.form.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/admin/a/blog/Article/:id/view", "/admin/a/blog/Article/7/view", Some("7"))]
	#[case("/admin/a/blog/Article/:id/view", "/admin/a/blog/Article/7/edit", None)]
	#[case("/admin/a/blog/Article", "/admin/a/blog/Article/7", None)]
	fn test_match_path(#[case] pattern: &str, #[case] path: &str, #[case] id: Option<&str>) {
		let params = match_path(pattern, path);

		match id {
			Some(id) => assert_eq!(params.unwrap().get("id").map(String::as_str), Some(id)),
			None => assert!(params.is_none()),
		}
	}
}
