//! Testing utilities
//!
//! In-memory integrators, sample models and rstest fixtures for exercising a
//! panel without a web server or database.

pub use rampart_test::*;
