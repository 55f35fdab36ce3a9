pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod reset_password;
pub mod signup;
pub mod verify_account;
