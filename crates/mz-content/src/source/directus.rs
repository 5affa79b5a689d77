//! Directus headless CMS source.

use std::sync::Arc;

use serde_json::Value;

use super::{ContentKind, ContentRequest, ContentSource, envelope};
use crate::error::ContentError;
use crate::http::HttpClient;

/// Loads site settings and navigation from the Directus items API.
///
/// Requests carry the public bearer token. Directus wraps item payloads in a
/// `data` member; it is unwrapped before the payload is placed in its
/// envelope.
pub struct DirectusSource {
    client: Arc<dyn HttpClient>,
    base_url: String,
    token: String,
}

impl DirectusSource {
    /// Create a source for the Directus instance at `base_url`.
    pub fn new(client: Arc<dyn HttpClient>, base_url: &str, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.into(),
        }
    }

    /// Items endpoint for `collection` (may include a query string).
    fn items_url(&self, collection: &str) -> String {
        format!("{}/items/{}", self.base_url, collection)
    }

    fn request_items(&self, collection: &str) -> Result<Value, ContentError> {
        let url = self.items_url(collection);
        let token = Some(self.token.as_str()).filter(|t| !t.is_empty());
        let response = self.client.get_json(&url, token)?;
        Ok(unwrap_data(response))
    }
}

/// Strip the Directus `{"data": ...}` wrapper if present.
fn unwrap_data(response: Value) -> Value {
    match response {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

impl ContentSource for DirectusSource {
    fn name(&self) -> &str {
        "directus"
    }

    fn serves(&self, kind: ContentKind) -> bool {
        matches!(kind, ContentKind::Site | ContentKind::Navigation)
    }

    fn fetch(&self, request: &ContentRequest) -> Result<Value, ContentError> {
        let collection = match request.kind {
            ContentKind::Site => "site_settings?fields=*",
            ContentKind::Navigation => "navigation",
            ContentKind::Faq | ContentKind::Modules => {
                return Err(ContentError::InvalidPayload(format!(
                    "directus does not serve {request}"
                )));
            }
        };

        let payload = self.request_items(collection)?;
        tracing::debug!(base_url = %self.base_url, "Loaded {request} from Directus");
        Ok(envelope(request.kind, payload))
    }
}
