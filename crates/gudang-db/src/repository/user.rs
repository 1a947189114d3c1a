//! SQLite implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use gudang_core::error::GudangResult;
use gudang_core::models::user::{CreateUser, Role, User};
use gudang_core::repository::UserRepository;
use sqlx::SqlitePool;

use crate::error::DbError;

const COLUMNS: &str = "id, name, email, password_hash, role, created_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    s.parse().map_err(DbError::InvalidRow)
}

impl UserRow {
    fn into_user(self) -> Result<User, DbError> {
        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            created_at: self.created_at,
        })
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
pub fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Hash(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Hash(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SQLite implementation of the User repository.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl SqliteUserRepository {
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

impl UserRepository for SqliteUserRepository {
    async fn create(&self, input: CreateUser) -> GudangResult<User> {
        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (name, email, password_hash, role, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(input.name)
        .bind(input.email)
        .bind(password_hash)
        .bind(input.role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::unique_violation(e, "user", "email already registered"))?;

        Ok(row.into_user()?)
    }

    async fn get_by_id(&self, id: i64) -> GudangResult<User> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::from)?;

        let row = row.ok_or_else(|| DbError::not_found("user", id))?;
        Ok(row.into_user()?)
    }

    async fn get_by_email(&self, email: &str) -> GudangResult<User> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::from)?;

        let row = row.ok_or_else(|| DbError::not_found("user", format!("email={email}")))?;
        Ok(row.into_user()?)
    }

    async fn delete(&self, id: i64) -> GudangResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", id).into());
        }
        Ok(())
    }

    async fn list(&self) -> GudangResult<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(DbError::from)?;

        let users = rows
            .into_iter()
            .map(UserRow::into_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}
