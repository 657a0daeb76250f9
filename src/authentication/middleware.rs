use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{web, FromRequest, HttpMessage};
use actix_web_lab::middleware::Next;
use sqlx::PgPool;
use uuid::Uuid;

use crate::accounts::get_username;
use crate::session_state::TypedSession;
use crate::utils::e500;

/// Who is making the request, attached to it by [`load_current_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentUser {
    Anonymous,
    Authenticated { user_id: Uuid, username: String },
}

impl CurrentUser {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            CurrentUser::Anonymous => None,
            CurrentUser::Authenticated { user_id, .. } => Some(*user_id),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            CurrentUser::Anonymous => None,
            CurrentUser::Authenticated { username, .. } => Some(username),
        }
    }
}

/// Resolve the session into a [`CurrentUser`] for downstream handlers.
///
/// A session pointing at a user that no longer exists is purged and the
/// request continues anonymously.
pub async fn load_current_user(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let session = {
        let (http_request, payload) = req.parts_mut();
        TypedSession::from_request(http_request, payload).await
    }?;
    let pool = req
        .app_data::<web::Data<PgPool>>()
        .cloned()
        .ok_or_else(|| e500("The connection pool is not registered."))?;

    let current_user = match session.get_user_id().map_err(e500)? {
        None => CurrentUser::Anonymous,
        Some(user_id) => match get_username(user_id, &pool).await.map_err(e500)? {
            Some(username) => CurrentUser::Authenticated { user_id, username },
            None => {
                tracing::warn!(%user_id, "Session refers to a deleted user");
                session.log_out();
                CurrentUser::Anonymous
            }
        },
    };

    req.extensions_mut().insert(current_user);
    next.call(req).await
}
