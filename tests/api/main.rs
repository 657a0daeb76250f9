mod accounts;
mod login;
mod signup;
