use serde::Deserialize;
use tracing::{trace, warn};

/// A failed attempt to start video playback, as reported by the player.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaybackFailure {
    pub name: String,
    #[serde(default)]
    pub message: String,
}

impl PlaybackFailure {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// An aborted play request (the element was paused or detached before
    /// playback began) is routine.
    pub fn is_expected(&self) -> bool {
        self.name == "AbortError"
    }
}

/// Log a playback failure without propagating it. Returns true when the
/// failure was surfaced as a warning.
pub fn report_playback_failure(failure: &PlaybackFailure) -> bool {
    if failure.is_expected() {
        trace!(name = %failure.name, "Ignoring aborted playback");
        return false;
    }
    warn!(
        "Video autoplay failed: {}: {}",
        failure.name, failure.message
    );
    true
}
