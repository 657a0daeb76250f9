//! Identity records and the two role tables hanging off them.
use anyhow::Context;
use chrono::Utc;
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::authentication::{compute_password_hash, CurrentUser};
use crate::domain::{AdminNumber, ContactNumber, NewAccount, UserName, UserType};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::error_chain_fmt;

const UNIQUE_VIOLATION: &str = "23505";

/// Customer profile, one per user at most.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Customer {
    pub user_id: Uuid,
    pub username: String,
    pub phone_number: Option<String>,
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}

/// Admin profile, one per user at most.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminUser {
    pub user_id: Uuid,
    pub username: String,
    pub admin_number: Option<String>,
}

impl std::fmt::Display for AdminUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}

#[derive(thiserror::Error)]
pub enum RegistrationError {
    #[error("A user with that username already exists.")]
    UsernameTaken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Create the identity record and its customer profile atomically.
#[tracing::instrument(
    name = "Registering a new customer account",
    skip(pool, new_account),
    fields(username = %new_account.username)
)]
pub async fn register_customer(
    pool: &PgPool,
    new_account: NewAccount,
) -> Result<Uuid, RegistrationError> {
    let NewAccount {
        username,
        password,
        phone_number,
    } = new_account;

    let password_hash =
        spawn_blocking_with_tracing(move || compute_password_hash(password))
            .await
            .context("Failed to spawn blocking task.")??;

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let user_id = match insert_user(&mut transaction, &username, password_hash).await {
        Ok(user_id) => user_id,
        Err(e) if is_unique_violation(&e) => return Err(RegistrationError::UsernameTaken),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context("Failed to insert new user in the database.")
                .into())
        }
    };
    insert_customer(&mut transaction, user_id, phone_number.as_ref())
        .await
        .context("Failed to insert the customer profile.")?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store a new account.")?;
    Ok(user_id)
}

#[tracing::instrument(name = "Saving new user in the database", skip_all)]
pub async fn insert_user<'e, E>(
    executor: E,
    username: &UserName,
    password_hash: Secret<String>,
) -> Result<Uuid, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let user_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (user_id, username, password_hash, date_joined)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(username.as_ref())
    .bind(password_hash.expose_secret())
    .bind(Utc::now())
    .execute(executor)
    .await?;
    Ok(user_id)
}

#[tracing::instrument(name = "Attaching a customer profile", skip(executor, phone_number))]
pub async fn insert_customer<'e, E>(
    executor: E,
    user_id: Uuid,
    phone_number: Option<&ContactNumber>,
) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO customers (user_id, phone_number)
        VALUES ($1, $2)
        "#,
    )
    .bind(user_id)
    .bind(phone_number.map(AsRef::<str>::as_ref))
    .execute(executor)
    .await?;
    Ok(())
}

#[tracing::instrument(name = "Attaching an admin profile", skip(executor, admin_number))]
pub async fn insert_admin_user<'e, E>(
    executor: E,
    user_id: Uuid,
    admin_number: Option<&AdminNumber>,
) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO admin_users (user_id, admin_number)
        VALUES ($1, $2)
        "#,
    )
    .bind(user_id)
    .bind(admin_number.map(AsRef::<str>::as_ref))
    .execute(executor)
    .await?;
    Ok(())
}

#[tracing::instrument(skip(pool))]
pub async fn get_username(
    user_id: Uuid,
    pool: &PgPool,
) -> Result<Option<String>, anyhow::Error> {
    let username = sqlx::query_scalar::<_, String>(
        r#"
        SELECT username
        FROM users
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to perform a query to retrieve a username.")?;
    Ok(username)
}

#[tracing::instrument(name = "Recording last login", skip(pool))]
pub async fn record_login(user_id: Uuid, pool: &PgPool) -> Result<(), anyhow::Error> {
    sqlx::query("UPDATE users SET last_login = $1 WHERE user_id = $2")
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to update the last login timestamp.")?;
    Ok(())
}

/// Deleting the identity record cascades to its role records.
#[tracing::instrument(name = "Deleting a user", skip(pool))]
pub async fn delete_user(user_id: Uuid, pool: &PgPool) -> Result<bool, anyhow::Error> {
    let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete user.")?;
    Ok(result.rows_affected() > 0)
}

#[tracing::instrument(skip(pool))]
pub async fn get_customer(
    user_id: Uuid,
    pool: &PgPool,
) -> Result<Option<Customer>, anyhow::Error> {
    sqlx::query_as::<_, Customer>(
        r#"
        SELECT c.user_id, u.username, c.phone_number
        FROM customers c
        JOIN users u ON u.user_id = c.user_id
        WHERE c.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to retrieve customer profile.")
}

#[tracing::instrument(skip(pool))]
pub async fn get_admin_user(
    user_id: Uuid,
    pool: &PgPool,
) -> Result<Option<AdminUser>, anyhow::Error> {
    sqlx::query_as::<_, AdminUser>(
        r#"
        SELECT a.user_id, u.username, a.admin_number
        FROM admin_users a
        JOIN users u ON u.user_id = a.user_id
        WHERE a.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to retrieve admin profile.")
}

async fn is_customer(user_id: Uuid, pool: &PgPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE user_id = $1)")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

async fn is_admin_user(user_id: Uuid, pool: &PgPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM admin_users WHERE user_id = $1)")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Decide which role the caller holds.
///
/// Anonymous callers have none. The customer table is checked first, so a
/// user holding both profiles resolves to `UserType::Customer` and the admin
/// lookup is skipped.
#[tracing::instrument(name = "Resolving user type", skip(pool))]
pub async fn resolve_user_type(
    current_user: &CurrentUser,
    pool: &PgPool,
) -> Result<Option<UserType>, anyhow::Error> {
    let user_id = match current_user.user_id() {
        Some(user_id) => user_id,
        None => return Ok(None),
    };
    if is_customer(user_id, pool)
        .await
        .context("Failed to check for a customer profile.")?
    {
        return Ok(Some(UserType::Customer));
    }
    if is_admin_user(user_id, pool)
        .await
        .context("Failed to check for an admin profile.")?
    {
        return Ok(Some(UserType::Admin));
    }
    Ok(None)
}
