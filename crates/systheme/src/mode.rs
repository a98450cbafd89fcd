//! Color mode detection.
//!
//! The OS reports a light or dark color-scheme preference. This module turns
//! that report into a [`ColorMode`] and lets callers replace the detector, which
//! is how tests and the `SYSTHEME_MODE` switch force a specific mode.
//!
//! ```rust
//! use systheme::{detect_color_mode, set_theme_detector, ColorMode};
//!
//! set_theme_detector(|| ColorMode::Dark);
//! assert!(detect_color_mode().is_dark());
//! ```

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use crate::BridgeError;

/// Environment variable that forces the default detector to a mode.
pub const MODE_ENV_VAR: &str = "SYSTHEME_MODE";

/// The user's preferred color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorMode {
    /// Light background, dark text.
    #[default]
    Light,
    /// Dark background, light text.
    Dark,
}

impl ColorMode {
    /// The dark-mode preference as forwarded to an application channel.
    pub fn is_dark(self) -> bool {
        self == ColorMode::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl From<bool> for ColorMode {
    fn from(dark: bool) -> Self {
        if dark {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }
}

impl From<ColorMode> for bool {
    fn from(mode: ColorMode) -> Self {
        mode.is_dark()
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ColorMode::Dark),
            "light" => Ok(ColorMode::Light),
            other => Err(BridgeError::InvalidMode(other.to_string())),
        }
    }
}

type ThemeDetector = fn() -> ColorMode;

static THEME_DETECTOR: Lazy<Mutex<ThemeDetector>> =
    Lazy::new(|| Mutex::new(default_theme_detector));

/// Overrides the detector used to determine whether the user prefers a dark theme.
///
/// Affects every [`OsPreferenceQuery`](crate::OsPreferenceQuery), including
/// watchers that are already running: they pick the new detector up on their
/// next sample.
pub fn set_theme_detector(detector: ThemeDetector) {
    let mut guard = THEME_DETECTOR.lock().unwrap_or_else(|e| e.into_inner());
    *guard = detector;
}

/// Restores OS detection after [`set_theme_detector`].
pub fn reset_theme_detector() {
    set_theme_detector(default_theme_detector);
}

/// Detects the user's preferred color mode.
///
/// Uses the configured detector (default: `SYSTHEME_MODE`, then the OS).
pub fn detect_color_mode() -> ColorMode {
    let detector = *THEME_DETECTOR.lock().unwrap_or_else(|e| e.into_inner());
    detector()
}

fn default_theme_detector() -> ColorMode {
    if let Some(mode) = mode_from_env() {
        return mode;
    }
    os_theme_detector()
}

fn mode_from_env() -> Option<ColorMode> {
    let value = std::env::var(MODE_ENV_VAR).ok()?;
    match value.parse() {
        Ok(mode) => Some(mode),
        Err(err) => {
            tracing::warn!("ignoring {}: {}", MODE_ENV_VAR, err);
            None
        }
    }
}

// An unspecified preference or a failed query both read as light, the same
// answer a media query gives when nothing asks for dark.
fn os_theme_detector() -> ColorMode {
    match detect_os_theme() {
        Ok(OsThemeMode::Dark) => ColorMode::Dark,
        Ok(_) => ColorMode::Light,
        Err(err) => {
            tracing::debug!("OS theme detection failed: {}", err);
            ColorMode::Light
        }
    }
}
