mod builder;
mod models;

pub use builder::{LEGACY_URL_REGEX, Npo, URL_REGEX, UrlMode, extract_next_data, find_episode};
pub use models::EpisodeRecord;
