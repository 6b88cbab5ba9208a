use crate::{config::AppConfig, error::Result};
use npo_parser::{
    downloader::{Downloader, TokioProcessRunner},
    extractor::{
        CookieJar, Npo, ProxyConfig, create_client,
        platform_extractor::PlatformExtractor,
        transport::{HttpTransport, ReqwestTransport},
    },
    manifest::ManifestFetcher,
    pipeline::Pipeline,
};
use std::{sync::Arc, time::Duration};
use tracing::info;

pub struct CommandExecutor {
    config: AppConfig,
    transport: Arc<dyn HttpTransport>,
}

impl CommandExecutor {
    pub fn new(config: AppConfig) -> Result<Self> {
        let proxy_config = config.proxy.as_ref().map(|url| ProxyConfig {
            url: url.clone(),
            username: config.proxy_username.clone(),
            password: config.proxy_password.clone(),
        });
        let client = create_client(proxy_config, Duration::from_secs(config.timeout))?;
        Ok(Self::with_transport(
            config,
            Arc::new(ReqwestTransport::new(client)),
        ))
    }

    pub fn with_transport(config: AppConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    fn extractor(&self, url: &str) -> Result<Npo> {
        let cookies = CookieJar::load(&self.config.cookie_file)?;
        if !cookies.is_empty() {
            info!(
                "Using {} cookies from {}",
                cookies.len(),
                self.config.cookie_file.display()
            );
        }
        Ok(Npo::new(
            url.to_string(),
            self.transport.clone(),
            Some(cookies),
            self.config.url_mode,
        ))
    }

    /// Resolves the page and returns the two lines printed by `resolve`.
    pub async fn resolve(&self, url: &str) -> Result<String> {
        let descriptor = self.extractor(url)?.extract().await?;
        let stream_url = descriptor.require_stream_url()?;
        let drm_token = descriptor.require_drm_token()?;
        Ok(format!("Stream URL: {stream_url}\nDRM Token: {drm_token}"))
    }

    pub async fn extract(&self, url: &str, downloader: Option<&str>) -> Result<()> {
        let npo = self.extractor(url)?;
        let program = downloader.unwrap_or(self.config.downloader.as_str());
        let pipeline = Pipeline::new(
            ManifestFetcher::new(self.transport.clone(), &self.config.work_dir),
            Downloader::new(program, Arc::new(TokioProcessRunner)),
        );
        pipeline.run(&npo).await?;
        info!("Download finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use npo_parser::extractor::{
        error::ExtractorError,
        transport::{HttpRequest, HttpResponse},
    };

    /// Serves one watch page flow; counts requests.
    struct FixedSite {
        stream_link: &'static str,
        requests: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl HttpTransport for FixedSite {
        async fn send(
            &self,
            request: HttpRequest,
        ) -> std::result::Result<HttpResponse, ExtractorError> {
            self.requests
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let body = if request.url.starts_with("https://npo.nl/start/afspelen/") {
                r#"<script id="__NEXT_DATA__" type="application/json">{"props":{"pageProps":{"dehydratedState":{"queries":[{"state":{"data":{"slug":"ep1","productId":"P1"}}}]}}}}</script>"#
            } else if request.url.contains("player-token") {
                r#"{"jwt":"J"}"#
            } else {
                self.stream_link
            };
            Ok(HttpResponse {
                status: 200,
                body: body.to_string(),
            })
        }
    }

    fn build_executor(stream_link: &'static str, dir: &std::path::Path) -> (CommandExecutor, Arc<FixedSite>) {
        let site = Arc::new(FixedSite {
            stream_link,
            requests: Default::default(),
        });
        let config = AppConfig {
            cookie_file: dir.join("cookies.txt"),
            work_dir: dir.to_path_buf(),
            ..AppConfig::default()
        };
        (CommandExecutor::with_transport(config, site.clone()), site)
    }

    #[tokio::test]
    async fn resolve_prints_both_fields() {
        let dir = tempfile::tempdir().unwrap();
        let (executor, _) = build_executor(
            r#"{"stream":{"streamURL":"https://x/a.mpd","drmToken":"T1"}}"#,
            dir.path(),
        );
        let output = executor
            .resolve("https://npo.nl/start/afspelen/ep1")
            .await
            .unwrap();
        assert_eq!(output, "Stream URL: https://x/a.mpd\nDRM Token: T1");
    }

    #[tokio::test]
    async fn resolve_fails_on_missing_token() {
        let dir = tempfile::tempdir().unwrap();
        let (executor, _) = build_executor(r#"{"stream":{"streamURL":"https://x/a.mpd"}}"#, dir.path());
        let result = executor.resolve("https://npo.nl/start/afspelen/ep1").await;
        assert!(matches!(
            result,
            Err(CliError::Extractor(ExtractorError::StreamFieldMissing("drmToken")))
        ));
    }

    #[tokio::test]
    async fn invalid_url_fails_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let (executor, site) = build_executor("{}", dir.path());
        let result = executor.extract("https://example.com/video", None).await;
        assert!(matches!(
            result,
            Err(CliError::Extractor(ExtractorError::InvalidUrl(_)))
        ));
        assert_eq!(site.requests.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
