mod admin_number;
mod contact_number;
mod new_account;
mod user_name;
mod user_type;

pub use admin_number::AdminNumber;
pub use contact_number::ContactNumber;
pub use new_account::NewAccount;
pub use user_name::UserName;
pub use user_type::UserType;
