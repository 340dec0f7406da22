//! # Rampart Admin
//!
//! Embeddable admin panel generator. Register data shapes with an
//! [`AdminPanel`] and it derives list, detail, add, edit and delete pages
//! for them, gated by a single permission function and recorded in an
//! audit log.
//!
//! ## Overview
//!
//! The panel owns no persistence and no HTTP server. It talks to the
//! embedding application through three contracts:
//!
//! - [`OrmIntegrator`] fetches and saves records
//! - [`WebIntegrator`] registers routes and reads request data
//! - [`TemplateRenderer`] renders pages ([`TeraRenderer`] by default)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rampart_admin::{AdminConfig, AdminPanel, PermissionChecker};
//!
//! let panel = AdminPanel::new(
//!     AdminConfig::new().with_name("Back Office"),
//!     orm,
//!     web,
//!     PermissionChecker::allow_all(),
//! )?;
//! let blog = panel.register_app("blog", "Blog", None)?;
//! blog.register_model::<Post>(None)?;
//! ```
//!
//! ## Annotations
//!
//! Each [`Attribute`] may carry an annotation such as
//! `"listDisplay:exclude;required;maxLength:200"`; see [`descriptor`](crate::core::descriptor)
//! for the recognized keys.

pub mod adapters;
pub mod audit;
pub mod core;
pub mod server;
pub mod templates;
pub mod types;

pub use adapters::{Handler, OrmIntegrator, RequestContext, WebIntegrator};
pub use audit::{InMemoryLogStore, LogEntry, LogStore, LogStoreLevel};
pub use crate::core::{
	AdminConfig, AdminModel, AdminPanel, AdminSettings, App, Attribute, FieldConfig, FormMode,
	Instance, Model, ModelForm, ModelHooks, ModelSchema, NativeType, NavBarItem, PermissionChecker,
	Permissions, Record, humanize_name, is_url_safe,
};
pub use server::{error_html, error_response};
pub use templates::{TemplateData, TemplateRenderer, TeraRenderer};
pub use types::{
	Action, AdminError, AdminResult, BoxError, HandlerResponse, ListQueryParams, PermissionRequest,
	RegistrationError,
};
