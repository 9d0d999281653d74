use serde::Serialize;
use thiserror::Error;

const SENDGRID_API_BASE: &str = "https://api.sendgrid.com/v3";

#[derive(Error, Debug)]
pub enum SendGridError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication failed")]
    AuthFailed,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SendGridError>;

/// Client for the SendGrid v3 mail send API
pub struct SendGridClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SendGridClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, SENDGRID_API_BASE.to_string())
    }

    /// For testing against a local mock server
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("StockWatch/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Send a plain-text email to a list of recipients
    ///
    /// SendGrid answers 202 Accepted on success. No retry: a failed send is
    /// logged by the caller and the cycle carries on.
    pub async fn send_plain_text(
        &self,
        from: &str,
        to: &[String],
        subject: &str,
        body: &str,
    ) -> Result<()> {
        let url = format!("{}/mail/send", self.base_url);

        let request = MailSendRequest {
            personalizations: vec![Personalization {
                to: to.iter().map(|email| EmailAddress::new(email)).collect(),
            }],
            from: EmailAddress::new(from),
            subject: subject.to_string(),
            content: vec![MailContent {
                content_type: "text/plain".to_string(),
                value: body.to_string(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if response.status() == 401 || response.status() == 403 {
            return Err(SendGridError::AuthFailed);
        }

        if response.status() == 429 {
            return Err(SendGridError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SendGridError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

/// Mail send request body, shaped per the v3 API
#[derive(Debug, Serialize)]
struct MailSendRequest {
    personalizations: Vec<Personalization>,
    from: EmailAddress,
    subject: String,
    content: Vec<MailContent>,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<EmailAddress>,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
}

impl EmailAddress {
    fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MailContent {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}
