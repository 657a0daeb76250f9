mod middleware;
mod password;

pub use middleware::{load_current_user, CurrentUser};
pub use password::{
    compute_password_hash, validate_credentials, AuthError, Credentials,
};
