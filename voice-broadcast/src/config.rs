//! Configuration for playback state holders

use serde::{Deserialize, Serialize};

use crate::Result;

/// Configuration for `PlaybackStateHolder`
///
/// The defaults reproduce the plain emitter behavior: every operation
/// notifies, and a panicking observer is logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Skip the notification when an operation leaves the state unchanged
    pub suppress_duplicate_notifications: bool,

    /// Catch observer panics instead of unwinding into the caller
    pub isolate_observer_panics: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            suppress_duplicate_notifications: false,
            isolate_observer_panics: true,
        }
    }
}

impl PlaybackConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    ///
    /// ```rust
    /// use voice_broadcast::PlaybackConfig;
    ///
    /// let config = PlaybackConfig::from_json(r#"{ "suppress_duplicate_notifications": true }"#).unwrap();
    /// assert!(config.suppress_duplicate_notifications);
    /// assert!(config.isolate_observer_panics);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_suppress_duplicate_notifications(mut self, suppress: bool) -> Self {
        self.suppress_duplicate_notifications = suppress;
        self
    }

    pub fn with_isolate_observer_panics(mut self, isolate: bool) -> Self {
        self.isolate_observer_panics = isolate;
        self
    }
}
