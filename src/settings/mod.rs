// ── Editor settings persistence ───────────────────────────────────────────────
//
// Reads and writes `%APPDATA%\WireGuard SyntaxEdit\settings.json`.
// No `unsafe`; pure safe Rust + serde_json.

use std::{fs, io, path::PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

// ── On-disk type ──────────────────────────────────────────────────────────────

/// Root of the JSON settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub version: u32,
    #[serde(default)]
    pub dark_mode: bool,
    /// Editor font size in points.
    #[serde(default = "default_font_size")]
    pub font_size_pt: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            dark_mode: false,
            font_size_pt: default_font_size(),
        }
    }
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE_PT
}

// ── Format version & limits ───────────────────────────────────────────────────

const SETTINGS_VERSION: u32 = 1;

pub const DEFAULT_FONT_SIZE_PT: u32 = 10;
pub const MIN_FONT_SIZE_PT: u32 = 6;
pub const MAX_FONT_SIZE_PT: u32 = 72;

impl Settings {
    /// Font size clamped to what the control will render.
    pub fn font_size(&self) -> u32 {
        self.font_size_pt.clamp(MIN_FONT_SIZE_PT, MAX_FONT_SIZE_PT)
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return `%APPDATA%\WireGuard SyntaxEdit\settings.json`, or `None` if the
/// `APPDATA` environment variable is not set.
pub fn settings_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("WireGuard SyntaxEdit");
    p.push("settings.json");
    Some(p)
}

// ── Save ──────────────────────────────────────────────────────────────────────

/// Write `settings`, creating the parent directory if needed.
pub fn save(settings: &Settings) -> Result<()> {
    let path = settings_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "APPDATA not set"))?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let file = fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, settings)?;
    debug!(path = %path.display(), "settings saved");
    Ok(())
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Read and parse the settings file.
///
/// Returns `None` when the file is missing, unparsable or from another
/// format version; callers fall back to `Settings::default()`.
pub fn load() -> Option<Settings> {
    let path = settings_path()?;
    let data = fs::read(&path).ok()?;
    parse(&data)
}

fn parse(data: &[u8]) -> Option<Settings> {
    let settings: Settings = match serde_json::from_slice(data) {
        Ok(s) => s,
        Err(e) => {
            warn!("ignoring malformed settings file: {e}");
            return None;
        }
    };
    if settings.version != SETTINGS_VERSION {
        warn!(version = settings.version, "ignoring settings from another version");
        return None;
    }
    Some(settings)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_dark_mode() {
        let s = Settings {
            dark_mode: true,
            font_size_pt: 12,
            ..Settings::default()
        };
        let json = serde_json::to_vec(&s).expect("serialize");
        assert_eq!(parse(&json), Some(s));
    }

    /// Files written before font sizes were configurable have only
    /// `version` and `dark_mode`.
    #[test]
    fn missing_fields_take_defaults() {
        let parsed = parse(br#"{"version":1}"#).expect("parse minimal file");
        assert!(!parsed.dark_mode);
        assert_eq!(parsed.font_size_pt, DEFAULT_FONT_SIZE_PT);
    }

    #[test]
    fn wrong_version_is_rejected() {
        assert_eq!(parse(br#"{"version":99,"dark_mode":true}"#), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse(b"not json"), None);
        assert_eq!(parse(b""), None);
    }

    #[test]
    fn font_size_is_clamped() {
        let tiny = Settings {
            font_size_pt: 1,
            ..Settings::default()
        };
        let huge = Settings {
            font_size_pt: 500,
            ..Settings::default()
        };
        assert_eq!(tiny.font_size(), MIN_FONT_SIZE_PT);
        assert_eq!(huge.font_size(), MAX_FONT_SIZE_PT);
        assert_eq!(Settings::default().font_size(), DEFAULT_FONT_SIZE_PT);
    }
}
