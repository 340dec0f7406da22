//! # Rampart Test
//!
//! Testing utilities for the Rampart admin panel.
//!
//! ## Features
//!
//! - **[`MemoryOrm`]**: in-memory [`OrmIntegrator`](rampart_admin::OrmIntegrator)
//!   with auto-increment ids and substring search
//! - **[`MockWeb`]**: [`WebIntegrator`](rampart_admin::WebIntegrator) that
//!   records routes and dispatches [`TestRequest`]s to them
//! - **Sample models**: [`Article`] and [`Author`]
//! - **Fixtures**: rstest fixtures building a ready [`TestPanel`]

pub mod fixtures;
pub mod models;
pub mod orm;
pub mod request;
pub mod web;

pub use fixtures::{TestPanel, allow_all, deny_action, deny_all, failing_permissions, only_user};
pub use models::{Article, Author};
pub use orm::MemoryOrm;
pub use request::TestRequest;
pub use web::MockWeb;
