//! Admin Audit Integration Tests
//!
//! Tests for the audit trail as seen through the panel: log levels, the
//! bounded in-memory store, user attribution, the dashboard and the log
//! entry view.

use http::StatusCode;
use rampart_admin::{AdminConfig, LogStore, LogStoreLevel};
use rampart_test::fixtures::{TestPanel, allow_all, blog_panel, only_user};
use rampart_test::TestRequest;
use rstest::rstest;
use serde_json::json;

/// Test intent: Actions ranked above the configured level are not stored.
#[rstest]
#[tokio::test]
async fn test_log_level_filters_views() {
	// Arrange
	let config = AdminConfig::new().with_log_store_level(LogStoreLevel::Create);
	let test_panel = TestPanel::with_config(config, allow_all()).with_blog();
	test_panel.seed_articles(1);

	// Act
	test_panel.web.dispatch(TestRequest::get("/admin")).await;
	test_panel
		.web
		.dispatch(TestRequest::get("/admin/a/blog/Article/1/view"))
		.await;
	test_panel
		.web
		.dispatch(TestRequest::delete("/admin/a/blog/Article/1/view"))
		.await;

	// Assert
	let entries = test_panel.log_store.get_log_entries().await.unwrap();
	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].action_flag, LogStoreLevel::Delete);
}

/// Test intent: The in-memory store keeps only the newest entries once its
/// capacity is reached.
#[rstest]
#[tokio::test]
async fn test_log_store_evicts_oldest() {
	// Arrange
	let test_panel = TestPanel::with_log_capacity(AdminConfig::new(), allow_all(), 3).with_blog();
	test_panel.seed_articles(5);

	// Act
	for id in 1..=5 {
		test_panel
			.web
			.dispatch(TestRequest::get(format!("/admin/a/blog/Article/{}/view", id)))
			.await;
	}

	// Assert
	let entries = test_panel.log_store.get_log_entries().await.unwrap();
	let ids: Vec<_> = entries.iter().map(|e| e.object_id.clone()).collect();
	assert_eq!(ids, vec![Some(json!(5)), Some(json!(4)), Some(json!(3))]);
}

/// Test intent: Entries are attributed to the user returned by the
/// configured fetcher.
#[rstest]
#[tokio::test]
async fn test_user_fetcher_attribution() {
	// Arrange
	let config = AdminConfig::new().with_user_fetcher(|ctx| {
		let user = TestRequest::from_context(ctx)
			.and_then(|r| r.user.clone())
			.ok_or("no user")?;
		Ok((Some(json!(user.len())), user))
	});
	let test_panel = TestPanel::with_config(config, allow_all()).with_blog();

	// Act
	let response = test_panel
		.web
		.dispatch(TestRequest::get("/admin/a/blog").with_user("ada"))
		.await;

	// Assert
	assert_eq!(response.status(), StatusCode::OK);
	let entries = test_panel.log_store.get_log_entries().await.unwrap();
	assert_eq!(entries[0].user_repr, "ada");
	assert_eq!(entries[0].user_id, Some(json!(3)));
	assert_eq!(entries[0].content_type, "Blog");
}

/// Test intent: A failing user fetcher fails the request instead of storing
/// an anonymous entry.
#[rstest]
#[tokio::test]
async fn test_user_fetcher_failure() {
	// Arrange
	let config = AdminConfig::new().with_user_fetcher(|_| Err("session expired".into()));
	let test_panel = TestPanel::with_config(config, allow_all()).with_blog();

	// Act
	let response = test_panel.web.dispatch(TestRequest::get("/admin/a/blog")).await;

	// Assert
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(test_panel.log_count(), 0);
}

/// Test intent: The dashboard lists readable apps and recent entries with
/// links to their log pages.
#[rstest]
#[tokio::test]
async fn test_dashboard_lists_recent_entries(blog_panel: TestPanel) {
	// Arrange
	blog_panel.seed_articles(1);
	blog_panel
		.web
		.dispatch(TestRequest::get("/admin/a/blog/Article/1/view"))
		.await;
	let logged = blog_panel.log_store.get_log_entries().await.unwrap();

	// Act
	let response = blog_panel.web.dispatch(TestRequest::get("/admin")).await;

	// Assert
	assert_eq!(response.status(), StatusCode::OK);
	let body = response.body();
	assert!(body.contains("Site Administration"));
	assert!(body.contains("/admin/a/blog"));
	assert!(body.contains(&format!("/admin/i/log/{}", logged[0].id)));
	assert_eq!(blog_panel.log_count(), 2);
}

/// Test intent: The log view renders a stored entry and records the visit.
#[rstest]
#[tokio::test]
async fn test_view_log_entry(blog_panel: TestPanel) {
	// Arrange
	blog_panel.seed_articles(1);
	blog_panel
		.web
		.dispatch(TestRequest::delete("/admin/a/blog/Article/1/view"))
		.await;
	let entry = blog_panel.log_store.get_log_entries().await.unwrap()[0].clone();

	// Act
	let response = blog_panel
		.web
		.dispatch(TestRequest::get(format!("/admin/i/log/{}", entry.id)))
		.await;

	// Assert
	assert_eq!(response.status(), StatusCode::OK);
	assert!(response.body().contains("Article 1"));
	let newest = blog_panel.log_store.get_log_entries().await.unwrap()[0].clone();
	assert_eq!(newest.action_flag, LogStoreLevel::PanelView);
	assert_eq!(newest.object_id, Some(json!(entry.id.to_string())));
}

/// Test intent: Malformed log ids are rejected and unknown ones are not
/// found.
#[rstest]
#[case("not-a-uuid", StatusCode::BAD_REQUEST)]
#[case("8c0f6b7e-5a3b-4f6e-9d2c-1b2a3c4d5e6f", StatusCode::NOT_FOUND)]
#[tokio::test]
async fn test_view_log_errors(
	blog_panel: TestPanel,
	#[case] id: &str,
	#[case] expected: StatusCode,
) {
	// Act
	let response = blog_panel
		.web
		.dispatch(TestRequest::get(format!("/admin/i/log/{}", id)))
		.await;

	// Assert
	assert_eq!(response.status(), expected);
}

/// Test intent: Only requesters passing the permission function can open
/// the panel.
#[rstest]
#[case(Some("ada"), StatusCode::OK)]
#[case(Some("eve"), StatusCode::FORBIDDEN)]
#[case(None, StatusCode::FORBIDDEN)]
#[tokio::test]
async fn test_dashboard_per_user(#[case] user: Option<&str>, #[case] expected: StatusCode) {
	// Arrange
	let test_panel = TestPanel::new(only_user("ada")).with_blog();
	let mut request = TestRequest::get("/admin");
	if let Some(user) = user {
		request = request.with_user(user);
	}

	// Act
	let response = test_panel.web.dispatch(request).await;

	// Assert
	assert_eq!(response.status(), expected);
}
