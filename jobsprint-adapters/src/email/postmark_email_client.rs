use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

use jobsprint_core::{Email, EmailClient};

/// `EmailClient` over the Postmark REST API.
///
/// Best-effort transport: callers that must not fail on delivery problems
/// are expected to spawn the send and log the error.
#[derive(Clone)]
pub struct PostmarkEmailClient {
    http_client: Client,
    base_url: String,
    sender: Email,
    authorization_token: Secret<String>,
}

impl PostmarkEmailClient {
    pub fn new(
        base_url: String,
        sender: Email,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        }
    }
}

#[async_trait::async_trait]
impl EmailClient for PostmarkEmailClient {
    #[tracing::instrument(name = "Sending email", skip_all)]
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        let base = Url::parse(&self.base_url).map_err(|e| e.to_string())?;
        let url = base.join("/email").map_err(|e| e.to_string())?;

        let request_body = SendEmailRequest {
            from: self.sender.as_ref().expose_secret(),
            to: recipient.as_ref().expose_secret(),
            subject,
            html_body: content,
            message_stream: MESSAGE_STREAM,
        };

        let request = self
            .http_client
            .post(url)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&request_body);

        request
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        Ok(())
    }
}

const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    message_stream: &'a str,
}

#[cfg(test)]
mod tests {
    use fake::{Fake, faker::internet::en::SafeEmail};
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::constants::test as test_constants;

    use super::*;

    fn email() -> Email {
        Email::try_from(Secret::from(SafeEmail().fake::<String>())).unwrap()
    }

    fn client(base_url: String) -> PostmarkEmailClient {
        PostmarkEmailClient::new(
            base_url,
            email(),
            Secret::from("server-token".to_string()),
            Client::builder()
                .timeout(test_constants::email_client::TIMEOUT)
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn sends_the_expected_request() {
        let mock_server = MockServer::start().await;
        let client = client(mock_server.uri());

        Mock::given(header_exists(POSTMARK_AUTH_HEADER))
            .and(header("Content-Type", "application/json"))
            .and(path("/email"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = client
            .send_email(&email(), "Your OTP code", "<p>code</p>")
            .await;
        assert!(outcome.is_ok());
    }

    #[tokio::test]
    async fn fails_when_the_server_errors() {
        let mock_server = MockServer::start().await;
        let client = client(mock_server.uri());

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = client
            .send_email(&email(), "Your OTP code", "<p>code</p>")
            .await;
        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn times_out_when_the_server_hangs() {
        let mock_server = MockServer::start().await;
        let client = client(mock_server.uri());

        let response = ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(60));
        Mock::given(method("POST"))
            .respond_with(response)
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = client
            .send_email(&email(), "Your OTP code", "<p>code</p>")
            .await;
        assert!(outcome.is_err());
    }
}
