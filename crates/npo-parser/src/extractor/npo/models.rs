use serde::{Deserialize, Serialize};

use crate::media::StreamDescriptor;

/// Episode entry embedded in the watch page's `__NEXT_DATA__` payload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EpisodeRecord {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub guid: Option<String>,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayerTokenResponse {
    pub jwt: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamLinkRequest<'a> {
    pub profile_name: &'a str,
    pub drm_type: &'a str,
    pub referrer_url: &'a str,
    pub ster: SterInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SterInfo {
    pub identifier: &'static str,
    pub device_type: u32,
    pub player: &'static str,
}

impl Default for SterInfo {
    fn default() -> Self {
        Self {
            identifier: "npo-app-desktop",
            device_type: 4,
            player: "web",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StreamLinkResponse {
    pub stream: Option<StreamDescriptor>,
}
