//! # Rampart
//!
//! An embeddable admin panel generator for Rust web applications.
//!
//! Rampart turns annotated model types into a browsable, permission-checked
//! CRUD interface. It owns no web server and no database: the host
//! application plugs in its router, its ORM and its permission policy
//! through small integrator traits.
//!
//! ## Feature Flags
//!
//! - `forms` - Typed form fields with validation and HTML rendering
//! - `admin` (default) - The admin panel, its routes, templates and audit log
//! - `test` - In-memory integrators and rstest fixtures
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rampart::admin::{AdminConfig, AdminPanel, PermissionChecker};
//! use std::sync::Arc;
//!
//! let panel = AdminPanel::new(
//!     AdminConfig::new(),
//!     Arc::new(my_orm),
//!     Arc::new(my_router),
//!     PermissionChecker::allow_all(),
//! )?;
//! let blog = panel.register_app("blog", "Blog", None)?;
//! blog.register_model::<Post>(None)?;
//! ```

#[cfg(feature = "admin")]
pub mod admin;
#[cfg(feature = "forms")]
pub mod forms;
#[cfg(feature = "test")]
pub mod test;

#[cfg(feature = "admin")]
pub use rampart_admin::{AdminConfig, AdminError, AdminModel, AdminPanel, PermissionChecker};
#[cfg(feature = "forms")]
pub use rampart_forms::{Form, FormField};
