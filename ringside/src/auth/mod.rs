//! Role-based permission capabilities.
//!
//! Authorization is an explicit value: every operation that needs a grant
//! takes a [`Permissions`] argument and calls [`Permissions::require`]. There
//! is no ambient "current user" lookup anywhere in the crate.
//!
//! ## Example
//!
//! ```
//! use ringside::auth::{Permission, Permissions, Role};
//!
//! let clerk = Permissions::for_role(Role::Cashier);
//! assert!(clerk.require(Permission::PlaceBets).is_ok());
//! assert!(clerk.require(Permission::DeclareResults).is_err());
//! ```

pub mod errors;
pub mod models;

pub use errors::{PermissionError, PermissionResult};
pub use models::{Permission, Permissions, Role};
