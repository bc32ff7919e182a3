use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password_if_present, verify_password};
use crate::error::AppError;
use crate::mail;
use crate::state::AppState;
use crate::users::dto::{CreateAccountRequest, EditProfileRequest, LoginRequest};
use crate::users::repo::{User, Verification};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn create_account(state: &AppState, payload: CreateAccountRequest) -> Result<(), AppError> {
    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Validation(
            "There is a user with that email already".into(),
        ));
    }

    // Hash before persistence; an empty password stores no digest.
    let hash = hash_password_if_present(Some(&payload.password))?.unwrap_or_default();
    let user = User::create(&state.db, &email, &hash, payload.role).await?;

    let verification = Verification::replace_for_user(&state.db, user.id).await?;
    mail::send_verification(state, user.email.clone(), verification.code);

    info!(user_id = %user.id, email = %user.email, "account created");
    Ok(())
}

pub async fn login(state: &AppState, payload: LoginRequest) -> Result<String, AppError> {
    let email = normalize_email(&payload.email);

    // The distinct messages below leak whether an email is registered;
    // existing clients depend on the exact strings.
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::InvalidCredentials("User not found".into()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials("Wrong password".into()));
    }

    let token = JwtKeys::from_ref(state).sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

pub async fn user_profile(state: &AppState, user_id: Uuid) -> Result<User, AppError> {
    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

pub async fn edit_profile(
    state: &AppState,
    caller: User,
    payload: EditProfileRequest,
) -> Result<(), AppError> {
    let mut email = caller.email.clone();
    let mut verified = caller.verified;
    let mut email_changed = false;

    if let Some(new_email) = payload.email {
        let new_email = normalize_email(&new_email);
        if !is_valid_email(&new_email) {
            return Err(AppError::Validation("Invalid email".into()));
        }
        if new_email != caller.email {
            if User::find_by_email(&state.db, &new_email).await?.is_some() {
                return Err(AppError::Validation(
                    "There is a user with that email already".into(),
                ));
            }
            email = new_email;
            // A new address is unproven until verified again.
            verified = false;
            email_changed = true;
        }
    }

    let hash = hash_password_if_present(payload.password.as_deref())?
        .unwrap_or_else(|| caller.password_hash.clone());

    let user = User::update_profile(&state.db, caller.id, &email, &hash, verified).await?;

    if email_changed {
        let verification = Verification::replace_for_user(&state.db, user.id).await?;
        mail::send_verification(state, user.email.clone(), verification.code);
    }

    info!(user_id = %user.id, email_changed, "profile edited");
    Ok(())
}

/// Outcome of presenting a code. The store deletes a code on consumption,
/// so a spent code and one that never existed both arrive here as `None`
/// and must stay indistinguishable to the caller.
fn verification_outcome(consumed: Option<Uuid>) -> Result<Uuid, AppError> {
    consumed.ok_or_else(|| AppError::NotFound("Verification not found".into()))
}

pub async fn verify_email(state: &AppState, code: &str) -> Result<(), AppError> {
    let user_id = verification_outcome(Verification::consume(&state.db, code).await?)?;
    info!(%user_id, "email verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("user.name+tag@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Nico@Kas.Com "), "nico@kas.com");
    }

    #[test]
    fn consuming_a_code_resolves_to_its_user() {
        let user_id = Uuid::new_v4();
        assert_eq!(verification_outcome(Some(user_id)).ok(), Some(user_id));
    }

    #[test]
    fn missing_codes_all_fail_the_same_way() {
        // A spent code and a never-issued one both surface as an absent row,
        // so the caller sees one message for both.
        match verification_outcome(None) {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Verification not found"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
