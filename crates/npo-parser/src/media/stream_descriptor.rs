use serde::{Deserialize, Serialize};

use crate::extractor::error::ExtractorError;

/// Manifest location plus the opaque token the site hands out next to it.
///
/// Either field may be absent from the stream-link response; callers decide
/// which ones they need through the `require_*` accessors.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamDescriptor {
    #[serde(rename = "streamURL")]
    pub stream_url: Option<String>,
    // passed through unmodified
    #[serde(rename = "drmToken")]
    pub drm_token: Option<String>,
}

impl StreamDescriptor {
    pub fn require_stream_url(&self) -> Result<&str, ExtractorError> {
        self.stream_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(ExtractorError::StreamFieldMissing("streamURL"))
    }

    pub fn require_drm_token(&self) -> Result<&str, ExtractorError> {
        self.drm_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(ExtractorError::StreamFieldMissing("drmToken"))
    }
}
