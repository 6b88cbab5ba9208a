use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;

use crate::extractor::{
    error::ExtractorError,
    transport::{HttpRequest, HttpResponse, HttpTransport},
};

/// Transport answering from a fixed route table and recording every request.
#[derive(Default)]
pub struct CannedTransport {
    routes: Vec<(Method, String, HttpResponse)>,
    pub requests: Mutex<Vec<HttpRequest>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests whose url starts with `url_prefix`.
    pub fn route(mut self, method: Method, url_prefix: &str, status: u16, body: &str) -> Self {
        self.routes.push((
            method,
            url_prefix.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        ));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn recorded(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ExtractorError> {
        self.requests.lock().push(request.clone());
        self.routes
            .iter()
            .find(|(method, prefix, _)| *method == request.method && request.url.starts_with(prefix))
            .map(|(_, _, response)| response.clone())
            .ok_or_else(|| ExtractorError::fetch(&request.url, None, "connection refused"))
    }
}
