pub mod downloader;
pub mod extractor;
pub mod manifest;
pub mod media;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;
