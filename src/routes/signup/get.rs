use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;
use askama::Template;

use crate::utils::render_html;

#[derive(Template)]
#[template(path = "accounts/signup.html")]
pub struct SignupTemplate {
    pub messages: Vec<String>,
}

pub async fn signup_form(
    flash_messages: IncomingFlashMessages,
) -> Result<HttpResponse, actix_web::Error> {
    let messages = flash_messages
        .iter()
        .map(|m| m.content().to_string())
        .collect();
    render_html(&SignupTemplate { messages })
}
