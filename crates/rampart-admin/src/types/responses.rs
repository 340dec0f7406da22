//! Response types for admin panel handlers

use http::StatusCode;

/// What a handler hands back to the web integrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
	Html { status: StatusCode, body: String },
	Redirect { status: StatusCode, location: String },
}

impl HandlerResponse {
	/// 200 with an HTML body
	pub fn ok(body: impl Into<String>) -> Self {
		HandlerResponse::Html {
			status: StatusCode::OK,
			body: body.into(),
		}
	}

	/// 303 See Other, so the browser follows with a GET
	pub fn redirect(location: impl Into<String>) -> Self {
		HandlerResponse::Redirect {
			status: StatusCode::SEE_OTHER,
			location: location.into(),
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			HandlerResponse::Html { status, .. } | HandlerResponse::Redirect { status, .. } => {
				*status
			}
		}
	}

	/// HTML body, or the redirect target
	pub fn body(&self) -> &str {
		match self {
			HandlerResponse::Html { body, .. } => body,
			HandlerResponse::Redirect { location, .. } => location,
		}
	}

	pub fn is_redirect(&self) -> bool {
		matches!(self, HandlerResponse::Redirect { .. })
	}
}
