//! HTTP transport used by the remote content sources.

use std::time::Duration;

use serde_json::Value;
use ureq::Agent;

use crate::error::ContentError;

/// Blocking JSON-over-HTTP transport.
///
/// Remote sources talk to the network only through this trait so they can be
/// exercised against in-process stubs.
pub trait HttpClient: Send + Sync {
    /// `GET` `url` and parse the response body as JSON.
    ///
    /// When `bearer` is set an `Authorization: Bearer ...` header is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::HttpRequest`] on transport failure or an
    /// unparsable body, and [`ContentError::HttpResponse`] for status codes
    /// >= 400.
    fn get_json(&self, url: &str, bearer: Option<&str>) -> Result<Value, ContentError>;
}

/// [`HttpClient`] backed by a `ureq` agent.
pub struct UreqClient {
    agent: Agent,
}

impl UreqClient {
    /// Create a client whose requests time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }
}

impl HttpClient for UreqClient {
    fn get_json(&self, url: &str, bearer: Option<&str>) -> Result<Value, ContentError> {
        let mut request = self
            .agent
            .get(url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");
        if let Some(token) = bearer {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }

        let response = request.call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ContentError::HttpResponse {
                status,
                body: error_body,
            });
        }

        Ok(body_reader.read_json()?)
    }
}
