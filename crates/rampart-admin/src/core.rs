//! Registration graph of the admin panel
//!
//! An [`AdminPanel`] owns [`App`]s, each owning [`Model`]s. Models are
//! described by a [`ModelSchema`] whose attribute annotations are turned
//! into [`FieldConfig`]s once, at registration.

pub mod app;
pub mod config;
pub mod descriptor;
pub mod instance;
pub mod model;
pub mod model_form;
pub mod navbar;
pub mod panel;
pub mod permissions;
pub mod schema;
pub mod utils;

pub use app::{App, ModelAccess};
pub use config::{AdminConfig, AdminSettings, SettingsError, UserFetcher};
pub use descriptor::{FieldConfig, build_field_config, build_field_configs};
pub use instance::{Instance, display_value};
pub use model::Model;
pub use model_form::ModelForm;
pub use navbar::{NavBarGenerator, NavBarItem, RenderedNavBarItem};
pub use panel::{AdminPanel, AppAccess, DASHBOARD_LOG_ENTRIES, LOG_BASE_LINK};
pub use permissions::{PermissionChecker, PermissionFunc, Permissions};
pub use schema::{
	AdminModel, Attribute, FormFieldHook, FormMode, ModelHooks, ModelSchema, NativeType, Record,
};
pub use utils::{humanize_name, is_url_safe};
