use rocket_db_pools::sqlx::{self, PgPool, Row};

use crate::models::User;
use crate::session::{PasswordService, SessionResult};

/// Account persistence: user rows plus their password hashes.
///
/// Hashes never leave this store. Callers get a `User` or a yes/no answer,
/// so nothing upstream can end up serializing credential material into a
/// response or a token.
#[derive(Clone)]
pub struct CredentialStore {
    pool: PgPool,
    passwords: PasswordService,
}

impl CredentialStore {
    pub fn new(pool: PgPool, passwords: PasswordService) -> Self {
        Self { pool, passwords }
    }

    /// Creates the user row and its credential row in one transaction.
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> SessionResult<User> {
        let password_hash = self.passwords.hash_password(password)?;

        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, first_name, last_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, first_name, last_name, created_on_date
            "#,
        )
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO user_credentials (user_id, password_hash, last_login_date) VALUES ($1, $2, now())",
        )
        .bind(user.id)
        .bind(&password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Checks a login attempt. Unknown email and wrong password collapse into
    /// the same `None`. A successful check stamps `last_login_date`.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> SessionResult<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT u.id, c.password_hash
            FROM users u
            JOIN user_credentials c ON c.user_id = u.id
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let user_id: i32 = row.try_get("id")?;
        let password_hash: String = row.try_get("password_hash")?;

        if !self.passwords.verify_password(password, &password_hash)? {
            return Ok(None);
        }

        sqlx::query("UPDATE user_credentials SET last_login_date = now() WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, first_name, last_name, created_on_date FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(user))
    }

    pub async fn fetch_user(&self, user_id: i32) -> SessionResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, first_name, last_name, created_on_date FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update_profile(
        &self,
        user_id: i32,
        first_name: &str,
        last_name: &str,
    ) -> SessionResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET first_name = $1, last_name = $2
            WHERE id = $3
            RETURNING id, email, first_name, last_name, created_on_date
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Replaces the password hash, but only when `current` verifies against
    /// the stored hash. The update is scoped by the old hash as well, so it
    /// touches at most the row that was just verified.
    pub async fn update_password(
        &self,
        user_id: i32,
        current: &str,
        replacement: &str,
    ) -> SessionResult<bool> {
        let mut tx = self.pool.begin().await?;

        let stored: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM user_credentials WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        let stored = match stored {
            Some(stored) => stored,
            None => return Ok(false),
        };

        if !self.passwords.verify_password(current, &stored)? {
            return Ok(false);
        }

        let new_hash = self.passwords.hash_password(replacement)?;

        let result = sqlx::query(
            "UPDATE user_credentials SET password_hash = $2 WHERE user_id = $1 AND password_hash = $3",
        )
        .bind(user_id)
        .bind(&new_hash)
        .bind(&stored)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() == 1)
    }
}
