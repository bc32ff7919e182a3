use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Coarse capability class. Checked independently of resource ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    Client,
    Owner,
    Delivery,
}

/// User record. The password digest never leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub verified: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, verified, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, verified, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, role, verified, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Persist profile fields. Callers decide the final values, including
    /// the verified flag reset that accompanies an email change.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        email: &str,
        password_hash: &str,
        verified: bool,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, verified = $4
            WHERE id = $1
            RETURNING id, email, password_hash, role, verified, created_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .bind(verified)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}

/// Pending proof of email ownership. At most one live code per user; the
/// unique index on user_id backs that invariant up at the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Verification {
    pub id: Uuid,
    pub code: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}

impl Verification {
    /// A new opaque code. Drawn from the process CSPRNG, never derived from
    /// the user it will belong to.
    pub(crate) fn fresh_code() -> String {
        Uuid::new_v4().to_string()
    }

    /// Issue a fresh code for the user, atomically superseding any live
    /// predecessor. Delete-then-insert runs in one transaction so two
    /// concurrent email changes can never leave two valid codes behind.
    pub async fn replace_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Verification> {
        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM verifications WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let verification = sqlx::query_as::<_, Verification>(
            r#"
            INSERT INTO verifications (code, user_id)
            VALUES ($1, $2)
            RETURNING id, code, user_id, created_at
            "#,
        )
        .bind(Self::fresh_code())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(verification)
    }

    /// Consume a code exactly once: mark its user verified and delete the
    /// row in one transaction. Returns the verified user id, or None when
    /// the code does not exist — consumed and never-issued codes are
    /// indistinguishable on purpose.
    pub async fn consume(db: &PgPool, code: &str) -> anyhow::Result<Option<Uuid>> {
        let mut tx = db.begin().await?;

        let found = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT id, user_id FROM verifications WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((id, user_id)) = found else {
            return Ok(None);
        };

        sqlx::query("UPDATE users SET verified = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM verifications WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "super-secret-digest".into(),
            role: UserRole::Client,
            verified: false,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("super-secret-digest"));
        assert!(json.contains("a@b.com"));
    }

    #[test]
    fn successive_codes_never_repeat() {
        // Replacing a code always yields a new one, so a superseded code can
        // never match what the store holds.
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(Verification::fresh_code()));
        }
    }

    #[test]
    fn codes_reveal_nothing_about_their_user() {
        let user_id = Uuid::new_v4();
        let code = Verification::fresh_code();
        // Opaque and well-formed, with no trace of the owning id.
        assert!(Uuid::parse_str(&code).is_ok());
        assert_ne!(code, user_id.to_string());
        assert!(!code.is_empty());
    }

    #[test]
    fn role_round_trips_through_serde() {
        for (role, text) in [
            (UserRole::Client, "\"Client\""),
            (UserRole::Owner, "\"Owner\""),
            (UserRole::Delivery, "\"Delivery\""),
        ] {
            assert_eq!(serde_json::to_string(&role).unwrap(), text);
            assert_eq!(serde_json::from_str::<UserRole>(text).unwrap(), role);
        }
    }
}
