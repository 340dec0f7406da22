//! Form fields and forms
//!
//! Re-exports [`rampart_forms`] under `rampart::forms`.

pub use rampart_forms::*;
