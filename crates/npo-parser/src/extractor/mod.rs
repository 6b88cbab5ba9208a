pub mod cookies;
mod default;
pub mod error;
pub mod npo;
pub mod platform_extractor;
pub mod transport;

pub use cookies::CookieJar;
pub use default::{ProxyConfig, create_client};
pub use npo::{Npo, UrlMode};
