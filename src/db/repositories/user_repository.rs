use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::error::DbResult;
use crate::db::models::{NewUser, User};

/// Salted SHA-256 digest, hex encoded. The salt is stored alongside the
/// digest, one per user.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

pub struct UserRepository;

impl UserRepository {
    pub async fn create(pool: &PgPool, new_user: &NewUser) -> DbResult<User> {
        let salt = Uuid::new_v4().simple().to_string();
        let password_hash = hash_password(new_user.password.expose_secret(), &salt);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, password_salt, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, password_salt, role, created_at
            "#,
        )
        .bind(&new_user.name)
        .bind(new_user.email.to_lowercase())
        .bind(&password_hash)
        .bind(&salt)
        .bind(new_user.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, password_salt, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn authenticate(
        pool: &PgPool,
        email: &str,
        password: &SecretString,
    ) -> DbResult<Option<User>> {
        let Some(user) = Self::find_by_email(pool, email).await? else {
            return Ok(None);
        };

        if verify_password(
            password.expose_secret(),
            &user.password_salt,
            &user.password_hash,
        ) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_for_same_inputs() {
        let a = hash_password("hunter2", "salt-a");
        let b = hash_password("hunter2", "salt-a");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn digest_depends_on_salt() {
        assert_ne!(hash_password("hunter2", "salt-a"), hash_password("hunter2", "salt-b"));
    }

    #[test]
    fn verify_accepts_correct_and_rejects_wrong_password() {
        let hash = hash_password("correct horse", "pepper");
        assert!(verify_password("correct horse", "pepper", &hash));
        assert!(!verify_password("battery staple", "pepper", &hash));
    }
}
