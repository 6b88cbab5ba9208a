//! Manifest download and inspection.
//!
//! The manifest is staged in a scoped temporary file that is removed once it
//! has been read back, whatever the outcome.

use std::{
    path::PathBuf,
    sync::{Arc, LazyLock},
    time::Duration,
};

use regex::Regex;
use reqwest::Method;
use tracing::{debug, warn};

use crate::extractor::{
    error::ExtractorError,
    transport::{HttpRequest, HttpTransport},
};

pub const MANIFEST_TIMEOUT: Duration = Duration::from_secs(20);

static PSSH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<cenc:pssh>(.*?)</cenc:pssh>").expect("valid regex"));

static CONTENT_PROTECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<ContentProtection\b").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub url: String,
    pub text: String,
}

impl Manifest {
    /// Number of `<cenc:pssh>` elements in the manifest.
    pub fn protection_header_count(&self) -> usize {
        PSSH_REGEX.find_iter(&self.text).count()
    }

    pub fn has_content_protection(&self) -> bool {
        CONTENT_PROTECTION_REGEX.is_match(&self.text)
    }

    pub fn is_protected(&self) -> bool {
        self.has_content_protection() || self.protection_header_count() > 0
    }

    /// Fails with [`ExtractorError::DrmProtected`] for protected manifests.
    pub fn ensure_unprotected(&self) -> Result<(), ExtractorError> {
        if self.is_protected() {
            return Err(ExtractorError::DrmProtected {
                headers: self.protection_header_count(),
            });
        }
        Ok(())
    }
}

pub struct ManifestFetcher {
    transport: Arc<dyn HttpTransport>,
    work_dir: PathBuf,
}

impl ManifestFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            work_dir: work_dir.into(),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<Manifest, ExtractorError> {
        let request = HttpRequest::new(Method::GET, url).timeout(MANIFEST_TIMEOUT);
        let response = self
            .transport
            .send(request)
            .await
            .and_then(|response| response.error_for_status(url))
            .map_err(|e| ExtractorError::Download(e.to_string()))?;

        let staged = tempfile::Builder::new()
            .prefix("manifest")
            .suffix(".mpd")
            .tempfile_in(&self.work_dir)?;
        debug!("Staging manifest at {}", staged.path().display());

        let result = async {
            tokio::fs::write(staged.path(), response.body.as_bytes()).await?;
            tokio::fs::read_to_string(staged.path()).await
        }
        .await;

        if let Err(e) = staged.close() {
            warn!("Failed to remove staged manifest: {}", e);
        }

        Ok(Manifest {
            url: url.to_string(),
            text: result?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CannedTransport;

    const PROTECTED: &str = r#"<?xml version="1.0"?>
<MPD xmlns:cenc="urn:mpeg:cenc:2013">
  <Period>
    <AdaptationSet>
      <ContentProtection schemeIdUri="urn:mpeg:dash:mp4protection:2011" value="cenc"/>
      <ContentProtection schemeIdUri="urn:uuid:edef8ba9-79d6-4ace-a3c8-27dcd51d21ed">
        <CENC:PSSH>
          AAAAAA==
        </CENC:PSSH>
      </ContentProtection>
      <cenc:pssh>BBBB</cenc:pssh>
    </AdaptationSet>
  </Period>
</MPD>"#;

    const CLEAR: &str = r#"<MPD><Period><AdaptationSet><Representation id="v1"/></AdaptationSet></Period></MPD>"#;

    fn manifest(text: &str) -> Manifest {
        Manifest {
            url: "https://x/a.mpd".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn counts_headers_case_insensitively_across_lines() {
        let manifest = manifest(PROTECTED);
        assert_eq!(manifest.protection_header_count(), 2);
        assert!(manifest.is_protected());
        assert!(matches!(
            manifest.ensure_unprotected(),
            Err(ExtractorError::DrmProtected { headers: 2 })
        ));
    }

    #[test]
    fn clear_manifest_passes() {
        let manifest = manifest(CLEAR);
        assert_eq!(manifest.protection_header_count(), 0);
        assert!(!manifest.is_protected());
        assert!(manifest.ensure_unprotected().is_ok());
    }

    #[tokio::test]
    async fn fetch_removes_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(CannedTransport::new().route(
            Method::GET,
            "https://x/a.mpd",
            200,
            CLEAR,
        ));
        let fetcher = ManifestFetcher::new(transport.clone(), dir.path());
        let manifest = fetcher.fetch("https://x/a.mpd").await.unwrap();

        assert_eq!(manifest.text, CLEAR);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(transport.recorded()[0].timeout, Some(MANIFEST_TIMEOUT));
    }

    #[tokio::test]
    async fn failed_download_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let transport =
            Arc::new(CannedTransport::new().route(Method::GET, "https://x/a.mpd", 503, ""));
        let fetcher = ManifestFetcher::new(transport, dir.path());
        assert!(matches!(
            fetcher.fetch("https://x/a.mpd").await,
            Err(ExtractorError::Download(_))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
