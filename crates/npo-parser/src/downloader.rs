use std::{process::Stdio, sync::Arc};

use async_trait::async_trait;
use tracing::info;

use crate::extractor::error::ExtractorError;

pub const DEFAULT_DOWNLOADER: &str = "N_m3u8DL-RE";

/// Select the best video and audio tracks and mux into matroska.
const FIXED_FLAGS: [&str; 6] = ["-sv", "best", "-sa", "best", "-M", "mkv"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl DownloadCommand {
    pub fn new(program: impl Into<String>, manifest_url: &str) -> Self {
        let mut args = vec![manifest_url.to_string()];
        args.extend(FIXED_FLAGS.iter().map(|flag| flag.to_string()));
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl std::fmt::Display for DownloadCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the command to completion and returns its exit code
    /// (`None` when the process was killed by a signal).
    async fn run(&self, command: &DownloadCommand) -> std::io::Result<Option<i32>>;
}

/// Spawns the process with inherited stdio so its output streams live.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: &DownloadCommand) -> std::io::Result<Option<i32>> {
        let status = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .status()
            .await?;
        Ok(status.code())
    }
}

pub struct Downloader {
    program: String,
    runner: Arc<dyn ProcessRunner>,
}

impl Downloader {
    pub fn new(program: impl Into<String>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    pub fn command(&self, manifest_url: &str) -> DownloadCommand {
        DownloadCommand::new(self.program.clone(), manifest_url)
    }

    pub async fn invoke(&self, manifest_url: &str) -> Result<(), ExtractorError> {
        let command = self.command(manifest_url);
        info!("Running command: {}", command);

        match self.runner.run(&command).await? {
            Some(0) => Ok(()),
            code => Err(ExtractorError::ExternalProcess {
                program: command.program,
                code,
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Records each command and answers with a fixed exit code.
    pub struct RecordingRunner {
        pub code: Option<i32>,
        pub commands: Mutex<Vec<DownloadCommand>>,
    }

    impl RecordingRunner {
        pub fn exiting_with(code: Option<i32>) -> Self {
            Self {
                code,
                commands: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProcessRunner for RecordingRunner {
        async fn run(&self, command: &DownloadCommand) -> std::io::Result<Option<i32>> {
            self.commands.lock().push(command.clone());
            Ok(self.code)
        }
    }

    #[test]
    fn argv_has_url_then_fixed_flags() {
        let command = DownloadCommand::new("N_m3u8DL-RE", "https://x/a.mpd");
        assert_eq!(
            command.argv(),
            [
                "N_m3u8DL-RE",
                "https://x/a.mpd",
                "-sv",
                "best",
                "-sa",
                "best",
                "-M",
                "mkv"
            ]
        );
    }

    #[tokio::test]
    async fn non_zero_exit_is_external_process_error() {
        let runner = Arc::new(RecordingRunner::exiting_with(Some(3)));
        let downloader = Downloader::new("dl", runner.clone());
        let result = downloader.invoke("https://x/a.mpd").await;
        assert!(matches!(
            result,
            Err(ExtractorError::ExternalProcess { code: Some(3), .. })
        ));
        assert_eq!(runner.commands.lock().len(), 1);
    }

    #[tokio::test]
    async fn signalled_exit_is_external_process_error() {
        let downloader = Downloader::new("dl", Arc::new(RecordingRunner::exiting_with(None)));
        assert!(matches!(
            downloader.invoke("https://x/a.mpd").await,
            Err(ExtractorError::ExternalProcess { code: None, .. })
        ));
    }

    #[tokio::test]
    async fn missing_binary_is_io_error() {
        let downloader = Downloader::new(
            "this-downloader-does-not-exist-9f3a",
            Arc::new(TokioProcessRunner),
        );
        assert!(matches!(
            downloader.invoke("https://x/a.mpd").await,
            Err(ExtractorError::Io(_))
        ));
    }
}
