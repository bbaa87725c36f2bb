//! Playback state of a voice broadcast

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PlaybackError;

/// The phase a listener is in while interacting with a broadcast
///
/// `Paused` has no transition into or out of it on `PlaybackStateHolder`;
/// it is reserved for whatever drives the audio engine. Code matching on
/// this enum must still handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    /// Every state, in declaration order
    pub const ALL: [PlaybackState; 3] = [
        PlaybackState::Stopped,
        PlaybackState::Playing,
        PlaybackState::Paused,
    ];

    /// State reached by toggling from `self`
    ///
    /// Stopped starts playback; anything else stops it.
    pub fn toggled(self) -> Self {
        match self {
            PlaybackState::Stopped => PlaybackState::Playing,
            PlaybackState::Playing | PlaybackState::Paused => PlaybackState::Stopped,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, PlaybackState::Stopped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Stopped => "stopped",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaybackState {
    type Err = PlaybackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stopped" => Ok(PlaybackState::Stopped),
            "playing" => Ok(PlaybackState::Playing),
            "paused" => Ok(PlaybackState::Paused),
            _ => Err(PlaybackError::UnknownState(s.to_string())),
        }
    }
}
