//! Resource and configuration errors
//!
//! Terminal game states are not errors; they live in each game's phase.

use std::fmt;

/// Failures acquiring something the games need to run.
///
/// All of these are reported to the player and leave the app in its
/// pre-start state.
#[derive(Debug, Clone, PartialEq)]
pub enum ArcadeError {
    /// Canvas or WebGPU surface could not be created
    SurfaceUnavailable(String),
    /// No GPU adapter/device for the surface
    AdapterUnavailable(String),
    /// ROM download failed
    RomFetch { path: String, reason: String },
    /// ROM file had no content
    EmptyRom(String),
    /// The emulator runtime rejected the ROM or is missing
    EmulatorLaunch(String),
    /// Settings JSON could not be parsed or failed validation
    Config(String),
}

impl fmt::Display for ArcadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcadeError::SurfaceUnavailable(msg) => write!(f, "render surface unavailable: {msg}"),
            ArcadeError::AdapterUnavailable(msg) => write!(f, "graphics adapter unavailable: {msg}"),
            ArcadeError::RomFetch { path, reason } => {
                write!(f, "failed to load ROM {path}: {reason}")
            }
            ArcadeError::EmptyRom(name) => write!(f, "ROM {name} is empty"),
            ArcadeError::EmulatorLaunch(msg) => write!(f, "emulator failed to start: {msg}"),
            ArcadeError::Config(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for ArcadeError {}

impl From<serde_json::Error> for ArcadeError {
    fn from(err: serde_json::Error) -> Self {
        ArcadeError::Config(err.to_string())
    }
}
