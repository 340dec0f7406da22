//! Admin panel functionality
//!
//! Unified imports of the admin panel from the `rampart::admin` namespace.
//!
//! ## Architecture
//!
//! - **core**: Panel, apps, models, permissions and configuration
//! - **server**: Route handlers for the dashboard, CRUD views and log view
//! - **adapters**: Integrator traits implemented by the host application
//! - **audit**: Audit log entries and stores
//! - **templates**: Template rendering
//! - **types**: Shared request, response and error types

pub mod adapters {
	pub use rampart_admin::adapters::*;
}

pub mod audit {
	pub use rampart_admin::audit::*;
}

pub mod core {
	pub use rampart_admin::core::*;
}

pub mod server {
	pub use rampart_admin::server::*;
}

pub mod templates {
	pub use rampart_admin::templates::*;
}

pub mod types {
	pub use rampart_admin::types::*;
}

// Also re-export at top level for convenience
pub use rampart_admin::*;
