use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use actix_web_flash_messages::FlashMessage;
use anyhow::Context;
use secrecy::Secret;
use sqlx::PgPool;

use crate::accounts::record_login;
use crate::authentication::{validate_credentials, AuthError, Credentials};
use crate::session_state::TypedSession;
use crate::utils::{error_chain_fmt, see_other};

#[derive(serde::Deserialize)]
pub struct FormData {
    username: String,
    password: Secret<String>,
}

#[derive(thiserror::Error)]
pub enum LoginError {
    #[error("Please enter a correct username and password.")]
    AuthError(#[source] anyhow::Error),
    #[error("Something went wrong.")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[tracing::instrument(
    skip(form, pool, session),
    fields(username=tracing::field::Empty, user_id=tracing::field::Empty)
)]
pub async fn login(
    form: web::Form<FormData>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, InternalError<LoginError>> {
    let FormData { username, password } = form.into_inner();
    tracing::Span::current()
        .record("username", &tracing::field::display(&username));
    let credentials = Credentials { username, password };

    match validate_credentials(credentials, &pool).await {
        Ok(user_id) => {
            tracing::Span::current()
                .record("user_id", &tracing::field::display(&user_id));
            start_session(&session, user_id, &pool)
                .await
                .map_err(|e| login_redirect(LoginError::UnexpectedError(e)))?;
            Ok(see_other("/home/"))
        }
        Err(e) => {
            let e = match e {
                AuthError::InvalidCredentials(_) => LoginError::AuthError(e.into()),
                AuthError::UnexpectedError(_) => {
                    LoginError::UnexpectedError(e.into())
                }
            };
            Err(login_redirect(e))
        }
    }
}

/// Bind `user_id` to a fresh session, the way both login and signup finish.
///
/// The session is only written once the login has been recorded, so an
/// error leaves the caller anonymous.
pub async fn start_session(
    session: &TypedSession,
    user_id: uuid::Uuid,
    pool: &PgPool,
) -> Result<(), anyhow::Error> {
    record_login(user_id, pool).await?;
    // A new session id on privilege change prevents session fixation.
    session.renew();
    session
        .insert_user_id(user_id)
        .context("Failed to store the user id in the session.")
}

// Redirect to the login page with an error message.
fn login_redirect(e: LoginError) -> InternalError<LoginError> {
    FlashMessage::error(e.to_string()).send();
    let response = see_other("/");
    InternalError::from_response(e, response)
}
