//! The image agent — one user command in, one sink message out.
//!
//! [`ImageAgent::handle`] is the invocation boundary of the whole pipeline:
//! every failure (transport, upstream status, upstream error field, nothing
//! found) is translated into a user-facing text message here. Nothing
//! propagates past `handle`, so one failed command never affects the next.

use tracing::{debug, warn};

use crate::fetch::Fetcher;
use crate::request::RequestTemplate;
use crate::resolver::{FailureKind, Resolution};
use crate::sink::SinkMessage;

/// Constructed once from config; shared read-only across invocations.
pub struct ImageAgent {
    template: RequestTemplate,
    fetcher: Fetcher,
}

impl ImageAgent {
    pub fn new(template: RequestTemplate, fetcher: Fetcher) -> Self {
        Self { template, fetcher }
    }

    /// Run one invocation end to end.
    pub async fn handle(&self, user_text: &str) -> SinkMessage {
        let url = self.template.build(user_text.trim());

        let resolution = match self.fetcher.fetch(&url).await {
            Ok(r) => r,
            Err(e) => {
                warn!(%url, error = %e, "image request failed");
                return SinkMessage::Text(format!("request failed: {e}"));
            }
        };

        match resolution {
            Resolution::ImageUrl(url) => {
                debug!(%url, "resolved image url");
                SinkMessage::ImageUrl(url)
            }
            Resolution::ImageBytes { content_type, bytes } => {
                debug!(%content_type, size = bytes.len(), "resolved image bytes");
                SinkMessage::ImageBlob { content_type, bytes }
            }
            Resolution::PlainText(text) => {
                SinkMessage::Text(format!("API returned non-image content: {text}"))
            }
            Resolution::Failed(failure) => {
                debug!(kind = ?failure.kind, message = %failure.message, "resolution failed");
                let text = match failure.kind {
                    FailureKind::HttpStatus => {
                        format!("image API returned an error: {}", failure.message)
                    }
                    FailureKind::Api => {
                        format!("failed to fetch image: {}", failure.message)
                    }
                    FailureKind::NoImage => "no image found in the API response".to_string(),
                };
                SinkMessage::Text(text)
            }
        }
    }
}
