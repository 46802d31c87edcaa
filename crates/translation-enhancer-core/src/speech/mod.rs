//! Speech output through a system synthesizer.
//!
//! Speaking is best effort: an engine never returns an error to its caller.
//! Failures are logged and the call completes as if playback had finished.

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::SpeechConfig;
use crate::error::{Error, Result};

/// Synthesizer used when none is configured
#[cfg(target_os = "macos")]
pub const DEFAULT_SPEECH_PROGRAM: &str = "say";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_SPEECH_PROGRAM: &str = "espeak-ng";

/// Text-to-speech engine, created once and shared for the process lifetime.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Get the engine name
    fn name(&self) -> &str;

    /// Speak `text`, returning once playback completes.
    async fn speak(&self, text: &str);
}

/// Engine that runs a synthesizer program with the text as last argument.
///
/// The text follows a `--` separator so a leading dash is never read as a flag.
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        let program = config
            .program
            .clone()
            .unwrap_or_else(|| DEFAULT_SPEECH_PROGRAM.to_string());
        Self::new(program, config.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, text: &str) -> Result<()> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("--")
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::Speech(format!("failed to start {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Speech(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeech {
    fn name(&self) -> &str {
        &self.program
    }

    async fn speak(&self, text: &str) {
        if text.is_empty() {
            debug!("Nothing to speak");
            return;
        }

        debug!("Speaking {} chars with {}", text.chars().count(), self.program);
        if let Err(e) = self.run(text).await {
            warn!("Speech output failed: {}", e);
        }
    }
}

/// Engine that discards everything it is asked to say.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeech;

#[async_trait]
impl SpeechEngine for SilentSpeech {
    fn name(&self) -> &str {
        "silent"
    }

    async fn speak(&self, text: &str) {
        debug!("Speech disabled, dropping {} chars", text.len());
    }
}

/// Create the speech engine described by configuration
pub fn create_speech_engine(config: &SpeechConfig) -> Arc<dyn SpeechEngine> {
    if config.enabled {
        Arc::new(CommandSpeech::from_config(config))
    } else {
        Arc::new(SilentSpeech)
    }
}
