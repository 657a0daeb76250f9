mod health_check;
mod home;
mod login;
mod logout;
mod signup;

pub use health_check::*;
pub use home::*;
pub use login::*;
pub use logout::*;
pub use signup::*;
