// Notification delivery - bridges the SendGrid client with the Notifier trait
use async_trait::async_trait;
use stockwatch_api::SendGridClient;

use crate::{models::VariantStock, Error, Result};

/// Trait for operator notification - the orchestrator hands it a subject
/// and a list of items, delivery details live behind the seam
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, items: &[VariantStock]) -> Result<()>;
}

/// Email notification over SendGrid
pub struct EmailNotifier {
    client: SendGridClient,
    sender: String,
    recipients: Vec<String>,
}

impl EmailNotifier {
    pub fn new(client: SendGridClient, sender: String, recipients: Vec<String>) -> Self {
        Self {
            client,
            sender,
            recipients,
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, subject: &str, items: &[VariantStock]) -> Result<()> {
        let body = render_alert_body(items);

        self.client
            .send_plain_text(&self.sender, &self.recipients, subject, &body)
            .await
            .map_err(|e| Error::Delivery(e.to_string()))
    }
}

/// Render the plain-text email body listing the affected items
pub fn render_alert_body(items: &[VariantStock]) -> String {
    let mut body = String::from("The following items have low inventory:\n");

    for item in items {
        body.push_str(&format!(
            "- {} ({}): {} items remaining\n",
            item.product_title, item.variant_title, item.inventory
        ));
    }

    body
}
