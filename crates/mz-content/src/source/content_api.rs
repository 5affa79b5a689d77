//! Locale-scoped content API (FAQ and module lists).

use std::sync::Arc;

use serde_json::Value;

use super::{ContentKind, ContentRequest, ContentSource, require_object};
use crate::error::ContentError;
use crate::http::HttpClient;

/// Access tier of the content API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    /// Authenticated editor endpoints (`/api/admin/content/...`).
    Admin,
    /// Anonymous endpoints (`/api/content/...`).
    Public,
}

impl Tier {
    fn path_prefix(self) -> &'static str {
        match self {
            Self::Admin => "/api/admin/content",
            Self::Public => "/api/content",
        }
    }
}

/// Loads FAQ and module lists from the site's content API.
///
/// With an admin token the authenticated endpoint is tried first and the
/// public endpoint second; without one only the public endpoint is used. Each
/// tier gets exactly one attempt.
pub struct ContentApiSource {
    client: Arc<dyn HttpClient>,
    base_url: String,
    admin_token: Option<String>,
}

impl ContentApiSource {
    /// Create a source for the API at `base_url`.
    pub fn new(client: Arc<dyn HttpClient>, base_url: &str, admin_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            admin_token: admin_token.filter(|t| !t.is_empty()),
        }
    }

    fn tiers(&self) -> &'static [Tier] {
        if self.admin_token.is_some() {
            &[Tier::Admin, Tier::Public]
        } else {
            &[Tier::Public]
        }
    }

    fn url(&self, tier: Tier, request: &ContentRequest) -> String {
        format!(
            "{}{}/{}/{}",
            self.base_url,
            tier.path_prefix(),
            request.locale,
            request.kind.endpoint()
        )
    }

    fn fetch_tier(&self, tier: Tier, request: &ContentRequest) -> Result<Value, ContentError> {
        let url = self.url(tier, request);
        let bearer = match tier {
            Tier::Admin => self.admin_token.as_deref(),
            Tier::Public => None,
        };

        let response = require_object(self.client.get_json(&url, bearer)?, &url)?;
        if response.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(ContentError::Unsuccessful(url));
        }
        Ok(response)
    }
}

impl ContentSource for ContentApiSource {
    fn name(&self) -> &str {
        "content-api"
    }

    fn serves(&self, kind: ContentKind) -> bool {
        matches!(kind, ContentKind::Faq | ContentKind::Modules)
    }

    fn fetch(&self, request: &ContentRequest) -> Result<Value, ContentError> {
        let mut last_error = None;

        for &tier in self.tiers() {
            match self.fetch_tier(tier, request) {
                Ok(envelope) => {
                    tracing::debug!(?tier, "Loaded {request} from content API");
                    return Ok(envelope);
                }
                Err(e) => {
                    tracing::warn!(?tier, error = %e, "Content API tier failed for {request}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ContentError::InvalidPayload(format!("content API has no tier for {request}"))
        }))
    }
}
