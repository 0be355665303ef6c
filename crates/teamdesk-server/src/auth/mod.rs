//! Admin authentication.
//!
//! Admins log in with a username and password checked against a stored
//! SHA-256 hash. A successful login yields an HMAC-signed bearer token that
//! [`middleware::require_admin`] checks on every admin route.

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{bearer_token, require_admin};
pub use password::hash_password;
pub use token::{AdminClaims, TokenSigner, ADMIN_ROLE};
