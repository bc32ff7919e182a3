use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo::{User, UserRole};

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginOutput {
    pub ok: bool,
    pub error: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub code: String,
}

/// Public part of a user returned to clients.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub verified: bool,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            role: u.role,
            verified: u.verified,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserProfileOutput {
    pub ok: bool,
    pub error: Option<String>,
    pub user: Option<PublicUser>,
}
