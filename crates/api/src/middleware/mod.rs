//! Authentication and authorization extractors.
//!
//! - [`auth::AuthStaff`] -- Extracts the signed-in staff member from a JWT Bearer token.
//! - [`rbac::RequireManager`] -- Requires the `MANAGER` or `ADMIN` role.

pub mod auth;
pub mod rbac;
