//! Request building — turn the configured API template and the user's text
//! into the URL for one GET request.
//!
//! Two modes, decided by the template itself:
//!
//! - **Placeholder templates** contain `{q}` or `{text}`. The user text is
//!   substituted verbatim into every occurrence of both tokens, with no
//!   encoding. The API owner opted into raw substitution and owns any
//!   escaping concerns.
//! - **Plain templates** get the user text appended as a percent-encoded
//!   `q=` query parameter, joined with `&` or `?` as appropriate. Empty
//!   user text appends nothing — a bare GET is the normal "random image"
//!   request.

use crate::error::AppError;

/// Substitution tokens recognised in placeholder templates. Both receive the
/// same value.
const PLACEHOLDERS: [&str; 2] = ["{q}", "{text}"];

/// Immutable wrapper around the configured API template string.
///
/// Built once at startup and reused for every invocation; `build` takes
/// `&self` so the template can be shared freely across concurrent requests.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    base: String,
}

impl RequestTemplate {
    /// Wrap and validate a template string. Empty or whitespace-only
    /// templates are a config error.
    pub fn new(base: impl Into<String>) -> Result<Self, AppError> {
        let base = base.into();
        if base.trim().is_empty() {
            return Err(AppError::Config("api_url is empty".into()));
        }
        Ok(Self { base })
    }

    fn has_placeholder(&self) -> bool {
        PLACEHOLDERS.iter().any(|p| self.base.contains(p))
    }

    /// Build the request URL for one invocation.
    pub fn build(&self, user_text: &str) -> String {
        if self.has_placeholder() {
            let mut url = self.base.clone();
            for token in PLACEHOLDERS {
                url = url.replace(token, user_text);
            }
            return url;
        }

        if user_text.is_empty() {
            return self.base.clone();
        }

        let sep = if self.base.contains('?') { '&' } else { '?' };
        format!("{}{}q={}", self.base, sep, urlencoding::encode(user_text))
    }
}
