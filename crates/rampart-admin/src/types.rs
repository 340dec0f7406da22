//! Shared type definitions for the admin panel

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{AdminError, AdminResult, BoxError, RegistrationError};
pub use requests::{Action, ListQueryParams, PermissionRequest};
pub use responses::HandlerResponse;
