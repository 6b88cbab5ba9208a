use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::cookies::CookieJar;
use super::default::DEFAULT_UA;
use super::error::ExtractorError;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::media::StreamDescriptor;

/// Base extractor shared by platform implementations.
///
/// Holds the transport, the platform headers and the cookie jar. Every
/// request built through [`Extractor::request`] carries the platform headers
/// and, when the jar is non-empty, a `Cookie` header.
#[derive(Clone)]
pub struct Extractor {
    // url to extract from, e.g. "https://npo.nl/start/afspelen/some-episode"
    pub url: String,
    pub platform_name: String,
    transport: Arc<dyn HttpTransport>,
    platform_headers: HeaderMap,
    cookies: CookieJar,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("url", &self.url)
            .field("platform_name", &self.platform_name)
            .field("platform_headers", &self.platform_headers)
            .field("cookies", &self.cookies.len())
            .finish()
    }
}

impl Extractor {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        platform_name: S1,
        platform_url: S2,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("*/*"));

        Self {
            platform_name: platform_name.into(),
            url: platform_url.into(),
            transport,
            platform_headers: default_headers,
            cookies: CookieJar::new(),
        }
    }

    pub fn add_header(&mut self, key: &str, value: &str) {
        match (HeaderName::try_from(key), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.platform_headers.insert(name, value);
            }
            _ => warn!("Ignoring invalid header {}: {}", key, value),
        }
    }

    pub fn set_cookies(&mut self, cookies: CookieJar) {
        self.cookies = cookies;
    }

    /// Create a request carrying the platform headers and stored cookies.
    pub fn request(&self, method: Method, url: &str) -> HttpRequest {
        let mut request = HttpRequest::new(method, url);
        request.headers = self.platform_headers.clone();
        if let Some(header) = self.cookies.header_value() {
            match HeaderValue::from_str(&header) {
                Ok(value) => {
                    debug!("Adding {} cookies to request", self.cookies.len());
                    request.headers.insert(reqwest::header::COOKIE, value);
                }
                Err(e) => warn!("Cookie header is not a valid header value: {}", e),
            }
        }
        request
    }

    pub fn get(&self, url: &str) -> HttpRequest {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> HttpRequest {
        self.request(Method::POST, url)
    }

    /// Sends a request, failing on transport errors and non-2xx statuses.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ExtractorError> {
        let url = request.url.clone();
        self.transport.send(request).await?.error_for_status(&url)
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<T, ExtractorError> {
        let response = self.send(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn post_json<B, T>(
        &self,
        request: HttpRequest,
        body: &B,
    ) -> Result<T, ExtractorError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(request.json(body)?).await
    }
}

#[async_trait]
pub trait PlatformExtractor: Send + Sync {
    fn get_extractor(&self) -> &Extractor;

    /// Resolves the page into a stream descriptor.
    async fn extract(&self) -> Result<StreamDescriptor, ExtractorError>;
}
