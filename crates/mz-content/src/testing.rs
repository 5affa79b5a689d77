//! In-process stubs shared by the crate's tests.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::error::ContentError;
use crate::http::HttpClient;
use crate::source::{ContentKind, ContentRequest, ContentSource};

/// Canned response for a stubbed URL.
#[derive(Clone)]
pub(crate) enum StubResponse {
    Json(Value),
    Status(u16),
    NetworkDown,
}

impl StubResponse {
    fn to_result(&self) -> Result<Value, ContentError> {
        match self {
            Self::Json(value) => Ok(value.clone()),
            Self::Status(status) => Err(ContentError::HttpResponse {
                status: *status,
                body: "stub error".to_owned(),
            }),
            Self::NetworkDown => Err(ContentError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        }
    }
}

/// [`HttpClient`] answering from a URL table and recording every call.
#[derive(Default)]
pub(crate) struct StubHttp {
    responses: HashMap<String, StubResponse>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl StubHttp {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, url: &str, response: StubResponse) -> Self {
        self.responses.insert(url.to_owned(), response);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl HttpClient for StubHttp {
    fn get_json(&self, url: &str, bearer: Option<&str>) -> Result<Value, ContentError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_owned(), bearer.map(str::to_owned)));
        match self.responses.get(url) {
            Some(response) => response.to_result(),
            None => StubResponse::Status(404).to_result(),
        }
    }
}

/// [`ContentSource`] with a fixed response and a fetch counter.
pub(crate) struct CountingSource {
    name: String,
    kinds: Vec<ContentKind>,
    response: Mutex<StubResponse>,
    fetches: AtomicUsize,
}

impl CountingSource {
    pub(crate) fn new(name: &str, response: StubResponse) -> Self {
        Self {
            name: name.to_owned(),
            kinds: vec![
                ContentKind::Site,
                ContentKind::Navigation,
                ContentKind::Faq,
                ContentKind::Modules,
            ],
            response: Mutex::new(response),
            fetches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn serving(mut self, kinds: &[ContentKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub(crate) fn respond(&self, response: StubResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ContentSource for CountingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn serves(&self, kind: ContentKind) -> bool {
        self.kinds.contains(&kind)
    }

    fn fetch(&self, _request: &ContentRequest) -> Result<Value, ContentError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.response.lock().unwrap().to_result()
    }
}

impl ContentSource for std::sync::Arc<CountingSource> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn serves(&self, kind: ContentKind) -> bool {
        (**self).serves(kind)
    }

    fn fetch(&self, request: &ContentRequest) -> Result<Value, ContentError> {
        (**self).fetch(request)
    }
}
