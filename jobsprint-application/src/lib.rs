pub mod email_body;
pub mod otp_manager;
pub mod use_cases;

pub use otp_manager::OtpManager;

pub use use_cases::{
    forgot_password::{ForgotPasswordError, ForgotPasswordUseCase},
    login::{LoginError, LoginUseCase, TokenPair},
    logout::{LogoutError, LogoutUseCase},
    refresh_token::{RefreshTokenError, RefreshTokenUseCase},
    reset_password::{ResetPasswordError, ResetPasswordUseCase},
    signup::{SignupData, SignupError, SignupUseCase},
    verify_account::{VerifyAccountError, VerifyAccountUseCase},
};
