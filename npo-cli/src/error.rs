use npo_parser::extractor::error::ExtractorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for this error. A failed downloader run passes its
    /// own non-zero code through; everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Extractor(ExtractorError::ExternalProcess {
                code: Some(code), ..
            }) if *code != 0 => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
