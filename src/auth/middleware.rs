use axum::{
    extract::{FromRef, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::auth::jwt::JwtKeys;
use crate::state::AppState;
use crate::users::repo::{User, UserRole};

/// Header carrying the bearer token. Header lookup is case-insensitive by
/// HTTP semantics, so any casing the client sends resolves here.
pub const AUTH_HEADER: &str = "x-jwt";

/// Runs on every request: resolve the caller's identity if a valid token is
/// presented, otherwise leave the request anonymous. Never rejects — role
/// enforcement is a separate, per-route concern.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(user) = identify(&state, req.headers()).await {
        req.extensions_mut().insert(user);
    }
    next.run(req).await
}

async fn identify(state: &AppState, headers: &axum::http::HeaderMap) -> Option<User> {
    let token = headers.get(AUTH_HEADER)?.to_str().ok()?;
    let keys = JwtKeys::from_ref(state);
    let claims = match keys.verify(token) {
        Ok(c) => c,
        Err(_) => {
            debug!("invalid token, treating request as anonymous");
            return None;
        }
    };
    // A validated token for a user that no longer exists carries no identity.
    match User::find_by_id(&state.db, claims.sub).await {
        Ok(found) => found,
        Err(e) => {
            debug!(error = %e, "identity lookup failed, treating request as anonymous");
            None
        }
    }
}

/// Role requirement declared on a route at definition time. Routes without
/// one are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Any authenticated identity, role irrelevant.
    Any,
    Only(UserRole),
}

/// Pure enforcement decision over (declared requirement, resolved identity).
pub fn access_allowed(requirement: RoleRequirement, user: Option<&User>) -> bool {
    match (requirement, user) {
        (_, None) => false,
        (RoleRequirement::Any, Some(_)) => true,
        (RoleRequirement::Only(role), Some(u)) => u.role == role,
    }
}

/// Route layer enforcing a declared requirement against the identity the
/// global middleware resolved.
pub async fn enforce(requirement: RoleRequirement, req: Request, next: Next) -> Response {
    let user = req.extensions().get::<User>();
    if !access_allowed(requirement, user) {
        return (StatusCode::FORBIDDEN, "Forbidden resource").into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "owner@eats.test".into(),
            password_hash: "hash".into(),
            role,
            verified: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn anonymous_is_rejected_for_every_requirement() {
        assert!(!access_allowed(RoleRequirement::Any, None));
        assert!(!access_allowed(RoleRequirement::Only(UserRole::Client), None));
        assert!(!access_allowed(RoleRequirement::Only(UserRole::Owner), None));
        assert!(!access_allowed(RoleRequirement::Only(UserRole::Delivery), None));
    }

    #[test]
    fn any_accepts_every_role() {
        for role in [UserRole::Client, UserRole::Owner, UserRole::Delivery] {
            assert!(access_allowed(RoleRequirement::Any, Some(&user(role))));
        }
    }

    #[test]
    fn role_requirement_matches_exactly() {
        let owner = user(UserRole::Owner);
        assert!(access_allowed(RoleRequirement::Only(UserRole::Owner), Some(&owner)));
        assert!(!access_allowed(
            RoleRequirement::Only(UserRole::Client),
            Some(&owner)
        ));
        assert!(!access_allowed(
            RoleRequirement::Only(UserRole::Delivery),
            Some(&owner)
        ));
    }
}
