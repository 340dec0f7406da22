//! rstest fixtures
//!
//! ```rust,ignore
//! use rampart_test::fixtures::*;
//! use rstest::rstest;
//!
//! #[rstest]
//! #[tokio::test]
//! async fn test_list(blog_panel: TestPanel) {
//!     let response = blog_panel.web.dispatch(TestRequest::get("/admin/a/blog/Article")).await;
//!     assert_eq!(response.status().as_u16(), 200);
//! }
//! ```

use crate::models::Article;
use crate::orm::MemoryOrm;
use crate::request::TestRequest;
use crate::web::MockWeb;
use rampart_admin::{
	Action, AdminConfig, AdminPanel, App, InMemoryLogStore, PermissionChecker, PermissionRequest,
	RequestContext,
};
use rstest::fixture;
use std::sync::Arc;

/// A panel wired to in-memory integrators, with handles on each of them
#[derive(Debug, Clone)]
pub struct TestPanel {
	pub panel: Arc<AdminPanel>,
	pub orm: Arc<MemoryOrm>,
	pub web: Arc<MockWeb>,
	pub log_store: Arc<InMemoryLogStore>,
}

impl TestPanel {
	pub fn new(permissions: PermissionChecker) -> Self {
		Self::with_config(AdminConfig::new(), permissions)
	}

	/// Builds a panel from `config`, replacing its log store with an
	/// inspectable one of the default capacity.
	pub fn with_config(config: AdminConfig, permissions: PermissionChecker) -> Self {
		Self::with_log_capacity(config, permissions, InMemoryLogStore::DEFAULT_CAPACITY)
	}

	pub fn with_log_capacity(
		config: AdminConfig,
		permissions: PermissionChecker,
		capacity: usize,
	) -> Self {
		let orm = Arc::new(MemoryOrm::new());
		let web = Arc::new(MockWeb::new());
		let log_store = Arc::new(InMemoryLogStore::new(capacity));
		let config = config.with_log_store(log_store.clone());
		let panel = AdminPanel::new(config, orm.clone(), web.clone(), permissions)
			.expect("admin panel should build with default templates");
		Self {
			panel,
			orm,
			web,
			log_store,
		}
	}

	/// Registers the `blog` app with [`Article`].
	pub fn with_blog(self) -> Self {
		let blog = self.blog_app();
		blog.register_model::<Article>(None)
			.expect("Article should register");
		self
	}

	fn blog_app(&self) -> Arc<App> {
		self.panel
			.app("blog")
			.unwrap_or_else(|| {
				self.panel
					.register_app("blog", "Blog", None)
					.expect("blog app should register")
			})
	}

	/// Seeds `count` articles titled `Article 1..=count`.
	pub fn seed_articles(&self, count: i64) {
		for id in 1..=count {
			self.orm
				.seed("Article", &Article::new(id, &format!("Article {}", id)));
		}
	}

	pub fn log_count(&self) -> usize {
		self.log_store.len()
	}
}

/// Grants every request.
pub fn allow_all() -> PermissionChecker {
	PermissionChecker::allow_all()
}

/// Denies every request.
pub fn deny_all() -> PermissionChecker {
	PermissionChecker::new(|_, _| Ok(false))
}

/// Denies `action` at every scope and grants everything else.
pub fn deny_action(action: Action) -> PermissionChecker {
	PermissionChecker::new(move |request: &PermissionRequest, _: &RequestContext| {
		Ok(request.action != action)
	})
}

/// Fails every check, as a permission backend that is unreachable would.
pub fn failing_permissions() -> PermissionChecker {
	PermissionChecker::new(|_, _| Err("permission backend unavailable".into()))
}

/// Grants only requests made by `user`.
pub fn only_user(user: &'static str) -> PermissionChecker {
	PermissionChecker::new(move |_, ctx| {
		Ok(TestRequest::from_context(ctx).and_then(|r| r.user.as_deref()) == Some(user))
	})
}

#[fixture]
pub fn memory_orm() -> Arc<MemoryOrm> {
	Arc::new(MemoryOrm::new())
}

#[fixture]
pub fn mock_web() -> Arc<MockWeb> {
	Arc::new(MockWeb::new())
}

/// Panel with no apps, granting everything
#[fixture]
pub fn empty_panel() -> TestPanel {
	TestPanel::new(allow_all())
}

/// Panel with the `blog` app and [`Article`] registered, granting everything
#[fixture]
pub fn blog_panel() -> TestPanel {
	TestPanel::new(allow_all()).with_blog()
}
