use askama::Template;
use secrecy::ExposeSecret;

use jobsprint_core::{Email, EmailClient, OtpCode};

pub const OTP_EMAIL_SUBJECT: &str = "Your OTP code";

/// HTML body of an OTP delivery email, addressed by first name with a
/// flow-specific heading.
#[derive(Template)]
#[template(path = "otp_email.html")]
pub struct OtpEmail<'a> {
    pub first_name: &'a str,
    pub code: &'a str,
    pub heading: &'a str,
}

/// Deliver an OTP email without coupling the caller to the transport.
///
/// The send runs on a detached task: the calling flow must neither block on
/// nor fail because of email transport errors, which are logged and dropped.
pub(crate) fn send_otp_email<E>(
    email_client: E,
    recipient: Email,
    first_name: String,
    code: OtpCode,
    heading: &'static str,
) where
    E: EmailClient + 'static,
{
    tokio::spawn(async move {
        let body = OtpEmail {
            first_name: &first_name,
            code: code.as_ref().expose_secret(),
            heading,
        }
        .render();

        let body = match body {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%error, "Failed to render OTP email");
                return;
            }
        };

        if let Err(error) = email_client
            .send_email(&recipient, OTP_EMAIL_SUBJECT, &body)
            .await
        {
            tracing::warn!(%error, "Failed to send OTP email");
        }
    });
}
