//! Identity context and access guards.
//!
//! Token verification happens upstream; these guards only inspect the
//! already-decoded identity attached to a request.

use crate::error::{JoblyError, JoblyResult};
use serde::{Deserialize, Serialize};

/// Decoded identity of the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl AuthContext {
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: false,
        }
    }

    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: true,
        }
    }

    fn is_identified(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Require a logged-in caller.
pub fn ensure_logged_in(ctx: Option<&AuthContext>) -> JoblyResult<&AuthContext> {
    match ctx {
        Some(ctx) if ctx.is_identified() => Ok(ctx),
        _ => Err(JoblyError::unauthorized("login required")),
    }
}

/// Require a logged-in admin.
pub fn ensure_admin(ctx: Option<&AuthContext>) -> JoblyResult<&AuthContext> {
    let ctx = ensure_logged_in(ctx)?;
    if !ctx.is_admin {
        return Err(JoblyError::unauthorized("admin required"));
    }
    Ok(ctx)
}

/// Require an admin, or the user named by the route.
pub fn ensure_admin_or_correct_user<'a>(
    ctx: Option<&'a AuthContext>,
    username: &str,
) -> JoblyResult<&'a AuthContext> {
    let ctx = ensure_logged_in(ctx)?;
    if !ctx.is_admin && ctx.username != username {
        return Err(JoblyError::unauthorized(format!(
            "not permitted to act as {username}"
        )));
    }
    Ok(ctx)
}
