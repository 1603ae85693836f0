//! Service context that wires the model port for the selected mode.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::adapters::live::gemini::GeminiModel;
use crate::adapters::recording::generative_model::RecordingGenerativeModel;
use crate::adapters::replaying::generative_model::ReplayingGenerativeModel;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::GatewayError;
use crate::ports::GenerativeModel;

/// How the model port is backed for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Call the real API.
    Live,
    /// Call the real API and record a cassette.
    Recording,
    /// Serve responses from a cassette.
    Replaying(PathBuf),
}

impl Mode {
    /// Select the mode from `PARTYBUS_REPLAY` / `PARTYBUS_REC`.
    #[must_use]
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var("PARTYBUS_REPLAY") {
            Self::Replaying(PathBuf::from(path))
        } else if std::env::var("PARTYBUS_REC").is_ok_and(|v| v == "true" || v == "1") {
            Self::Recording
        } else {
            Self::Live
        }
    }
}

/// Bundles the model port with an optional recording session.
pub struct ServiceContext {
    /// Generative model port.
    pub model: Arc<dyn GenerativeModel>,
    /// Present when recording; finish it after the run.
    pub recording: Option<RecordingSession>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Build the context for `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if a cassette cannot be loaded.
    pub fn for_mode(mode: &Mode, config: &Config) -> Result<Self, GatewayError> {
        match mode {
            Mode::Live => Ok(Self::live(config)),
            Mode::Recording => Ok(Self::recording(config)),
            Mode::Replaying(path) => Self::replaying(path),
        }
    }

    /// Live context. A missing key surfaces on the first call, not here.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self { model: Arc::new(live_model(config)), recording: None }
    }

    /// Live context wrapped with a cassette recorder.
    #[must_use]
    pub fn recording(config: &Config) -> Self {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".partybus/cassettes")
            .join(&timestamp)
            .join("generative_model.cassette.yaml");
        info!(path = %path.display(), "recording cassette");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-generative_model"),
            get_commit_hash(),
        )));
        let model =
            RecordingGenerativeModel::new(Box::new(live_model(config)), Arc::clone(&recorder));

        Self { model: Arc::new(model), recording: Some(RecordingSession { recorder }) }
    }

    /// Replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, GatewayError> {
        let replayer = load_cassette(path)
            .map_err(|e| GatewayError::Config(format!("Failed to load cassette: {e}")))?;
        info!(path = %path.display(), "replaying cassette");
        let model = ReplayingGenerativeModel::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { model: Arc::new(model), recording: None })
    }
}

fn live_model(config: &Config) -> GeminiModel {
    GeminiModel::new(&config.gateway.base_url, config.gemini_key())
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
