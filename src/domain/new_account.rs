use secrecy::Secret;

use crate::domain::ContactNumber;
use crate::domain::UserName;

/// A validated signup: the identity record plus its customer profile.
#[derive(Debug)]
pub struct NewAccount {
    pub username: UserName,
    pub password: Secret<String>,
    pub phone_number: Option<ContactNumber>,
}
