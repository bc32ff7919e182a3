use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Hash only when a non-empty password was supplied. An absent or empty
/// password means "no credential change", never a fabricated digest.
pub fn hash_password_if_present(plain: Option<&str>) -> anyhow::Result<Option<String>> {
    match plain {
        Some(p) if !p.is_empty() => Ok(Some(hash_password(p)?)),
        _ => Ok(None),
    }
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    // An account that never stored a digest can match nothing.
    if hash.is_empty() {
        return Ok(false);
    }
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn empty_stored_hash_matches_nothing() {
        assert!(!verify_password("anything", "").expect("empty hash is not an error"));
    }

    #[test]
    fn empty_password_is_not_hashed() {
        assert!(hash_password_if_present(Some("")).unwrap().is_none());
        assert!(hash_password_if_present(None).unwrap().is_none());
        assert!(hash_password_if_present(Some("pw")).unwrap().is_some());
    }
}
