pub mod account;
pub mod email;
pub mod otp;
pub mod password;
pub mod phone;
pub mod token;
