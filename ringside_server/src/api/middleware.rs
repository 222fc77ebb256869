//! Role resolution middleware.
//!
//! Authentication happens upstream; the gateway forwards the caller's staff
//! role in the `x-ringside-role` header. This middleware turns it into a
//! [`Permissions`] value and injects both into request extensions, so
//! handlers pass an explicit capability set into the managers.
//!
//! Requests without the header are treated as `viewer`.
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use ringside::auth::Permissions;
//!
//! async fn handler(Extension(permissions): Extension<Permissions>) -> String {
//!     format!("{permissions:?}")
//! }
//! # let _ = handler;
//! ```

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use ringside::auth::{Permissions, Role};

use super::error::ApiError;

/// Header carrying the caller's role
pub const ROLE_HEADER: &str = "x-ringside-role";

/// Resolve the role header into request extensions.
///
/// # Behavior
///
/// - **Missing header**: `viewer`
/// - **Known role**: injects `Role` and its `Permissions`
/// - **Unknown role**: `403 Forbidden`
/// - **Non-ASCII header**: `400 Bad Request`
pub async fn role_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let role = match request.headers().get(ROLE_HEADER) {
        None => Role::Viewer,
        Some(value) => value
            .to_str()
            .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Malformed role header"))?
            .parse::<Role>()?,
    };

    request.extensions_mut().insert(role);
    request
        .extensions_mut()
        .insert(Permissions::for_role(role));
    Ok(next.run(request).await)
}
