mod get;
mod post;

pub use get::signup_form;
pub use post::{signup, FormData};
