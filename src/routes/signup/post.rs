use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use actix_web_flash_messages::FlashMessage;
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;

use crate::accounts::{register_customer, RegistrationError};
use crate::domain::{ContactNumber, NewAccount, UserName};
use crate::routes::login::start_session;
use crate::session_state::TypedSession;
use crate::utils::{error_chain_fmt, see_other};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(serde::Deserialize)]
pub struct FormData {
    pub username: String,
    pub password1: Secret<String>,
    pub password2: Secret<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl TryFrom<FormData> for NewAccount {
    type Error = String;

    fn try_from(form: FormData) -> Result<Self, Self::Error> {
        let username = UserName::parse(form.username)?;
        if form.password1.expose_secret() != form.password2.expose_secret() {
            return Err("The two password fields didn't match.".to_string());
        }
        let length = form.password1.expose_secret().chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(format!(
                "This password is too short. It must contain at least {} characters.",
                MIN_PASSWORD_LENGTH
            ));
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(format!(
                "This password is too long. It must contain at most {} characters.",
                MAX_PASSWORD_LENGTH
            ));
        }
        let phone_number = ContactNumber::parse_optional(form.phone_number)?;
        Ok(Self {
            username,
            password: form.password1,
            phone_number,
        })
    }
}

#[derive(thiserror::Error)]
pub enum SignupError {
    #[error("{0}")]
    ValidationError(String),
    #[error("A user with that username already exists.")]
    UsernameTaken,
    #[error("Something went wrong.")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SignupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<RegistrationError> for SignupError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::UsernameTaken => SignupError::UsernameTaken,
            RegistrationError::UnexpectedError(e) => SignupError::UnexpectedError(e),
        }
    }
}

#[tracing::instrument(
    name = "Signing up a new customer",
    skip(form, pool, session),
    fields(username = %form.username, user_id = tracing::field::Empty)
)]
pub async fn signup(
    form: web::Form<FormData>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, InternalError<SignupError>> {
    let new_account: NewAccount = form
        .0
        .try_into()
        .map_err(|e| signup_redirect(SignupError::ValidationError(e)))?;

    let user_id = register_customer(&pool, new_account)
        .await
        .map_err(|e| signup_redirect(e.into()))?;
    tracing::Span::current().record("user_id", &tracing::field::display(&user_id));

    // The account is committed at this point, so a failure here must not
    // send the user back to the signup form.
    if let Err(e) = start_session(&session, user_id, &pool).await {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "Failed to log in a newly created account"
        );
        FlashMessage::info(ACCOUNT_CREATED_MESSAGE).send();
        return Ok(see_other("/"));
    }
    Ok(see_other("/home/"))
}

const ACCOUNT_CREATED_MESSAGE: &str = "Your account was created. Please log in.";

// Back to the signup form, explaining what went wrong.
fn signup_redirect(e: SignupError) -> InternalError<SignupError> {
    FlashMessage::error(e.to_string()).send();
    InternalError::from_response(e, see_other("/signup/"))
}
