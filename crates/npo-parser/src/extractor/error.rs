use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request to {url} failed: {message}")]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },
    #[error("page format error: {0}")]
    PageFormat(String),
    #[error("json error: {0}")]
    JsonDecode(#[from] serde_json::Error),
    #[error("no episode found for slug '{slug}'")]
    EpisodeNotFound { slug: String },
    #[error("no player token returned for product {product_id}")]
    TokenMissing { product_id: String },
    #[error("{0} not found in stream-link response")]
    StreamFieldMissing(&'static str),
    #[error("manifest download failed: {0}")]
    Download(String),
    #[error("stream is DRM protected ({headers} protection headers in manifest); protected streams are not supported")]
    DrmProtected { headers: usize },
    #[error("http client setup failed: {0}")]
    Client(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{program} exited with status {code:?}")]
    ExternalProcess { program: String, code: Option<i32> },
}

impl ExtractorError {
    pub(crate) fn fetch(url: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            status,
            message: message.into(),
        }
    }
}
