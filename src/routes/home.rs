use actix_web::web::{self, ReqData};
use actix_web::HttpResponse;
use askama::Template;
use serde::Serialize;
use sqlx::PgPool;

use crate::accounts::resolve_user_type;
use crate::authentication::CurrentUser;
use crate::domain::UserType;
use crate::utils::{e500, render_html};

/// Context of `home/home.html`; `user_type` is absent unless a role resolved.
#[derive(Template, Serialize, Debug)]
#[template(path = "home/home.html")]
pub struct HomeTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(skip)]
    pub username: Option<String>,
}

impl HomeTemplate {
    pub fn new(current_user: &CurrentUser, user_type: Option<UserType>) -> Self {
        Self {
            user_type,
            username: current_user.username().map(str::to_owned),
        }
    }
}

#[tracing::instrument(
    name = "Rendering the home page",
    skip(current_user, pool),
    fields(user_id = ?current_user.user_id())
)]
pub async fn home(
    current_user: ReqData<CurrentUser>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, actix_web::Error> {
    let current_user = current_user.into_inner();
    let user_type = resolve_user_type(&current_user, &pool)
        .await
        .map_err(e500)?;
    render_html(&HomeTemplate::new(&current_user, user_type))
}
