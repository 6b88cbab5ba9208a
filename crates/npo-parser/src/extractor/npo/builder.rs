use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::models::{
    EpisodeRecord, PlayerTokenResponse, StreamLinkRequest, StreamLinkResponse, SterInfo,
};
use crate::{
    extractor::{
        cookies::CookieJar,
        error::ExtractorError,
        platform_extractor::{Extractor, PlatformExtractor},
        transport::HttpTransport,
    },
    media::StreamDescriptor,
};

/// Current watch-page form: `https://npo.nl/start/afspelen/<slug>`.
pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://npo\.nl/start/afspelen/([^/?#]+)/?$").expect("valid regex")
});

/// Legacy form: `https://npo.nl/start/serie/<series>/.../<slug>/afspelen`.
pub static LEGACY_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://npo\.nl/start/serie/(?:[^/?#]+/)*?([^/?#]+)/afspelen/?$")
        .expect("valid regex")
});

static NEXT_DATA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script id="__NEXT_DATA__" type="application/json">(.*?)</script>"#)
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlMode {
    #[default]
    Current,
    Legacy,
}

impl UrlMode {
    fn regex(self) -> &'static Regex {
        match self {
            UrlMode::Current => &URL_REGEX,
            UrlMode::Legacy => &LEGACY_URL_REGEX,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            UrlMode::Current => "https://npo.nl/start/afspelen/<episode>",
            UrlMode::Legacy => "https://npo.nl/start/serie/.../<episode>/afspelen",
        }
    }
}

pub struct Npo {
    pub extractor: Extractor,
    mode: UrlMode,
}

impl Npo {
    const BASE_URL: &'static str = "https://npo.nl/";

    const PLAYER_TOKEN_URL: &'static str = "https://npo.nl/start/api/domain/player-token";

    const STREAM_LINK_URL: &'static str = "https://prod.npoplayer.nl/stream-link";

    pub fn new(
        url: String,
        transport: Arc<dyn HttpTransport>,
        cookies: Option<CookieJar>,
        mode: UrlMode,
    ) -> Self {
        let mut extractor = Extractor::new("NPO", url, transport);
        extractor.add_header(reqwest::header::REFERER.as_str(), Self::BASE_URL);
        if let Some(cookies) = cookies {
            extractor.set_cookies(cookies);
        }
        Self { extractor, mode }
    }

    /// Validates the page url and returns the episode slug it names.
    pub fn extract_slug(&self) -> Result<String, ExtractorError> {
        self.mode
            .regex()
            .captures(&self.extractor.url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                ExtractorError::InvalidUrl(format!(
                    "{} (expected {})",
                    self.extractor.url,
                    self.mode.describe()
                ))
            })
    }

    pub async fn get_episode(&self, slug: &str) -> Result<EpisodeRecord, ExtractorError> {
        let response = self.extractor.send(self.extractor.get(&self.extractor.url)).await?;
        let payload = extract_next_data(&response.body)?;
        let data: Value = serde_json::from_str(payload)?;
        find_episode(&data, slug)
    }

    pub async fn get_player_token(&self, product_id: &str) -> Result<String, ExtractorError> {
        let url = format!("{}?productId={}", Self::PLAYER_TOKEN_URL, product_id);
        let response: PlayerTokenResponse =
            self.extractor.send_json(self.extractor.get(&url)).await?;
        response
            .jwt
            .filter(|jwt| !jwt.is_empty())
            .ok_or_else(|| ExtractorError::TokenMissing {
                product_id: product_id.to_string(),
            })
    }

    pub async fn get_stream_link(&self, jwt: &str) -> Result<StreamDescriptor, ExtractorError> {
        let mut request = self.extractor.post(Self::STREAM_LINK_URL);
        let authorization = reqwest::header::HeaderValue::from_str(jwt)
            .map_err(|e| ExtractorError::PageFormat(format!("unusable player token: {e}")))?;
        request
            .headers
            .insert(reqwest::header::AUTHORIZATION, authorization);

        let body = StreamLinkRequest {
            profile_name: "dash",
            drm_type: "widevine",
            referrer_url: &self.extractor.url,
            ster: SterInfo::default(),
        };
        let response: StreamLinkResponse = self.extractor.post_json(request, &body).await?;
        Ok(response.stream.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl PlatformExtractor for Npo {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn extract(&self) -> Result<StreamDescriptor, ExtractorError> {
        let slug = self.extract_slug()?;
        debug!("Extracted slug: {}", slug);

        let episode = self.get_episode(&slug).await?;
        debug!(
            "Found episode {} (product {}, guid {:?})",
            episode.slug, episode.product_id, episode.guid
        );

        let jwt = self.get_player_token(&episode.product_id).await?;
        let descriptor = self.get_stream_link(&jwt).await?;
        debug!("Stream descriptor: {:?}", descriptor);
        Ok(descriptor)
    }
}

/// Returns the raw JSON text of the page's `__NEXT_DATA__` script tag.
pub fn extract_next_data(html: &str) -> Result<&str, ExtractorError> {
    NEXT_DATA_REGEX
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ExtractorError::PageFormat("__NEXT_DATA__ script not found".to_string()))
}

/// Searches `props.pageProps.dehydratedState.queries[*].state.data` for the
/// record with the given slug. Queries are visited in order and each data
/// tree depth-first, so the first match wins.
pub fn find_episode(data: &Value, slug: &str) -> Result<EpisodeRecord, ExtractorError> {
    data.pointer("/props/pageProps/dehydratedState/queries")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|query| query.pointer("/state/data"))
        .find_map(|tree| find_record(tree, slug))
        .ok_or_else(|| ExtractorError::EpisodeNotFound {
            slug: slug.to_string(),
        })
}

fn find_record(value: &Value, slug: &str) -> Option<EpisodeRecord> {
    match value {
        Value::Object(map) => {
            if map.get("slug").and_then(Value::as_str) == Some(slug) {
                if let Ok(record) = serde_json::from_value::<EpisodeRecord>(value.clone()) {
                    return Some(record);
                }
            }
            map.values().find_map(|child| find_record(child, slug))
        }
        Value::Array(items) => items.iter().find_map(|child| find_record(child, slug)),
        _ => None,
    }
}
