//! Error pages

use crate::types::{AdminError, HandlerResponse};
use http::StatusCode;
use rampart_forms::escape_html;

/// Short error body: `Code: 404. Error: not found`, or `Code: 404.` when
/// there is no message.
pub fn error_html(status: StatusCode, message: Option<&str>) -> String {
	match message.filter(|m| !m.is_empty()) {
		Some(message) => format!("Code: {}. Error: {}", status.as_u16(), escape_html(message)),
		None => format!("Code: {}.", status.as_u16()),
	}
}

/// Formats `error` as an HTML response with its status code.
pub fn error_response(error: &AdminError) -> HandlerResponse {
	let status = error.status_code();
	HandlerResponse::Html {
		status,
		body: error_html(status, Some(&error.to_string())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(StatusCode::NOT_FOUND, Some("log entry not found"), "Code: 404. Error: log entry not found")]
	#[case(StatusCode::FORBIDDEN, None, "Code: 403.")]
	#[case(StatusCode::BAD_REQUEST, Some(""), "Code: 400.")]
	#[case(StatusCode::INTERNAL_SERVER_ERROR, Some("<b>"), "Code: 500. Error: &lt;b&gt;")]
	fn test_error_html(
		#[case] status: StatusCode,
		#[case] message: Option<&str>,
		#[case] expected: &str,
	) {
		assert_eq!(error_html(status, message), expected);
	}

	#[rstest]
	fn test_error_response_uses_status() {
		let response = error_response(&AdminError::forbidden());

		assert_eq!(response.status(), StatusCode::FORBIDDEN);
		assert_eq!(response.body(), "Code: 403. Error: forbidden");
	}
}
