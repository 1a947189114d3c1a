//! SQLite implementation of [`PasswordResetRepository`].
//!
//! Redeeming a token touches two tables (`password_resets`, `users`); both
//! writes share one transaction so a failure leaves the token unused and
//! the old password in place.

use chrono::{DateTime, Utc};
use gudang_core::error::GudangResult;
use gudang_core::models::password_reset::{CreatePasswordReset, PasswordReset, Redemption};
use gudang_core::repository::PasswordResetRepository;
use sqlx::SqlitePool;

use super::user::hash_password;
use crate::error::DbError;

const COLUMNS: &str = "id, email, token_hash, expires_at, used, created_at";

#[derive(Debug, sqlx::FromRow)]
struct PasswordResetRow {
    id: i64,
    email: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    used: bool,
    created_at: DateTime<Utc>,
}

impl From<PasswordResetRow> for PasswordReset {
    fn from(row: PasswordResetRow) -> Self {
        PasswordReset {
            id: row.id,
            email: row.email,
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            used: row.used,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct SqlitePasswordResetRepository {
    pool: SqlitePool,
    /// Must match the pepper of the user repository.
    pepper: Option<String>,
}

impl SqlitePasswordResetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, pepper: None }
    }

    pub fn with_pepper(pool: SqlitePool, pepper: String) -> Self {
        Self {
            pool,
            pepper: Some(pepper),
        }
    }
}

impl PasswordResetRepository for SqlitePasswordResetRepository {
    async fn issue(&self, input: CreatePasswordReset) -> GudangResult<PasswordReset> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        sqlx::query("DELETE FROM password_resets WHERE email = ? AND used = 0")
            .bind(&input.email)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        let row: PasswordResetRow = sqlx::query_as(&format!(
            "INSERT INTO password_resets (email, token_hash, expires_at, used, created_at) \
             VALUES (?, ?, ?, 0, ?) RETURNING {COLUMNS}"
        ))
        .bind(input.email)
        .bind(input.token_hash)
        .bind(input.expires_at)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        Ok(row.into())
    }

    async fn redeem(
        &self,
        token_hash: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> GudangResult<Redemption> {
        // Hash outside the transaction; it is slow and may fail on its own.
        let password_hash = hash_password(new_password, self.pepper.as_deref())?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let row: Option<PasswordResetRow> = sqlx::query_as(&format!(
            "UPDATE password_resets SET used = 1 \
             WHERE token_hash = ? AND used = 0 RETURNING {COLUMNS}"
        ))
        .bind(token_hash)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(DbError::from)?;
            return Err(DbError::not_found("password reset", "token").into());
        };
        let reset = PasswordReset::from(row);

        if reset.is_expired_at(now) {
            // Burn the expired token without touching the password.
            tx.commit().await.map_err(DbError::from)?;
            return Ok(Redemption::Expired(reset));
        }

        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE email = ?")
            .bind(password_hash)
            .bind(&reset.email)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(DbError::from)?;
            return Err(DbError::not_found("user", format!("email={}", reset.email)).into());
        }

        tx.commit().await.map_err(DbError::from)?;
        Ok(Redemption::Completed(reset))
    }
}
