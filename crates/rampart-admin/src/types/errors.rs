//! Error types for admin panel

use http::StatusCode;
use rampart_forms::{FieldError, FormError};
use thiserror::Error;

/// Error returned by integrators, permission functions and user fetchers
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure while registering an app or a model.
///
/// Registration never partially mutates the panel: when one of these is
/// returned, the app or model was not added.
#[derive(Debug, Error)]
pub enum RegistrationError {
	#[error("admin app '{0}' already exists. Apps cannot be registered more than once")]
	DuplicateApp(String),

	#[error(
		"admin model '{model}' already exists in app '{app}'. Models cannot be registered more than once"
	)]
	DuplicateModel { app: String, model: String },

	#[error("admin app name '{0}' is not URL safe")]
	UnsafeAppName(String),

	#[error("admin model '{0}' name is not URL safe")]
	UnsafeModelName(String),

	#[error("admin model '{0}' must describe a struct")]
	NotAStruct(String),

	#[error("invalid value for '{key}' tag: {value}")]
	InvalidTagValue { key: String, value: String },

	#[error("error converting value '{value}' to type '{native_type}': {reason}")]
	InvalidTagConversion {
		value: String,
		native_type: String,
		reason: String,
	},

	#[error("admin model '{model}' has no usable primary key: {source}")]
	MissingPrimaryKey {
		model: String,
		#[source]
		source: BoxError,
	},

	#[error("invalid form field for attribute '{attribute}': {source}")]
	FormField {
		attribute: String,
		#[source]
		source: FieldError,
	},

	#[error("admin panel is no longer available")]
	PanelDropped,
}

/// Admin panel error type
#[derive(Debug, Error)]
pub enum AdminError {
	#[error(transparent)]
	Registration(#[from] RegistrationError),

	/// Malformed path parameter or missing form body
	#[error("{0}")]
	BadRequest(String),

	#[error("{0}")]
	PermissionDenied(String),

	#[error("{0}")]
	NotFound(String),

	#[error("method {0} not allowed")]
	MethodNotAllowed(String),

	/// The permission function itself failed
	#[error("permission check failed: {0}")]
	PermissionCheck(#[source] BoxError),

	/// An ORM integrator call failed
	#[error("{context}: {source}")]
	Integrator {
		context: String,
		#[source]
		source: BoxError,
	},

	#[error("failed to fetch user: {0}")]
	UserFetch(#[source] BoxError),

	#[error("log store error: {0}")]
	LogStore(#[source] BoxError),

	#[error("Template rendering error: {0}")]
	TemplateError(String),

	#[error(transparent)]
	Form(#[from] FormError),

	/// A native value could not be assigned to a model attribute
	#[error("cannot assign attribute '{attribute}': {reason}")]
	Assignment { attribute: String, reason: String },

	#[error("admin panel is no longer available")]
	PanelUnavailable,
}

impl AdminError {
	pub fn forbidden() -> Self {
		AdminError::PermissionDenied("forbidden".to_string())
	}

	pub(crate) fn integrator(context: impl Into<String>) -> impl FnOnce(BoxError) -> Self {
		let context = context.into();
		move |source| AdminError::Integrator { context, source }
	}

	/// HTTP status this error is reported with
	pub fn status_code(&self) -> StatusCode {
		match self {
			AdminError::BadRequest(_) => StatusCode::BAD_REQUEST,
			AdminError::PermissionDenied(_) => StatusCode::FORBIDDEN,
			AdminError::NotFound(_) => StatusCode::NOT_FOUND,
			AdminError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
			// Unparseable submissions are the client's fault.
			AdminError::Form(FormError::Field {
				error: FieldError::Invalid(_),
				..
			}) => StatusCode::BAD_REQUEST,
			AdminError::Registration(_)
			| AdminError::PermissionCheck(_)
			| AdminError::Integrator { .. }
			| AdminError::UserFetch(_)
			| AdminError::LogStore(_)
			| AdminError::TemplateError(_)
			| AdminError::Form(_)
			| AdminError::Assignment { .. }
			| AdminError::PanelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

/// Result type for admin panel operations
pub type AdminResult<T> = Result<T, AdminError>;
