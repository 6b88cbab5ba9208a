use tracing::info;

use crate::{
    downloader::Downloader,
    extractor::{error::ExtractorError, platform_extractor::PlatformExtractor},
    manifest::ManifestFetcher,
};

/// Resolve, fetch and check the manifest, then hand it to the downloader.
///
/// Every step is fail-fast; the downloader only runs once the manifest is
/// known to be unprotected.
pub struct Pipeline {
    fetcher: ManifestFetcher,
    downloader: Downloader,
}

impl Pipeline {
    pub fn new(fetcher: ManifestFetcher, downloader: Downloader) -> Self {
        Self {
            fetcher,
            downloader,
        }
    }

    pub async fn run(&self, extractor: &dyn PlatformExtractor) -> Result<(), ExtractorError> {
        let descriptor = extractor.extract().await?;
        let stream_url = descriptor.require_stream_url()?;
        info!("Resolved manifest {}", stream_url);

        let manifest = self.fetcher.fetch(stream_url).await?;
        manifest.ensure_unprotected()?;

        self.downloader.invoke(stream_url).await
    }
}
