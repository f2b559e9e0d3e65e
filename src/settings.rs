//! User settings
//!
//! Settings live in a small JSON file owned by the host application. The
//! core reads a snapshot once per recording start and never mutates it.
//! Fields the core does not understand are carried through untouched so a
//! newer host can persist its own keys alongside ours.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Which audio tracks to include in the final file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioMode {
    /// Video only; any captured audio track is dropped.
    #[default]
    None,
    Microphone,
    System,
    Both,
}

impl AudioMode {
    /// Whether the final file should carry an audio track at all.
    pub fn wants_audio(&self) -> bool {
        !matches!(self, AudioMode::None)
    }
}

/// Snapshot of the user-facing recorder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecorderSettings {
    /// Named quality preset, resolved to pixels by the transcoder.
    pub resolution_preset: String,

    /// Directory receiving both the temporary raw buffer and the final file.
    pub output_directory: PathBuf,

    /// Audio track selection.
    pub audio_mode: AudioMode,

    /// Host-owned keys we do not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            resolution_preset: "1080p".to_string(),
            output_directory: PathBuf::from("."),
            audio_mode: AudioMode::None,
            extra: serde_json::Map::new(),
        }
    }
}

impl RecorderSettings {
    /// Load settings from a JSON file, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Failed to parse settings file {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let data = serde_json::to_vec_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RecorderSettings::default();
        assert_eq!(settings.resolution_preset, "1080p");
        assert_eq!(settings.audio_mode, AudioMode::None);
        assert!(!settings.audio_mode.wants_audio());
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let raw = r#"{
            "resolutionPreset": "720p",
            "outputDirectory": "/tmp/videos",
            "audioMode": "microphone",
            "theme": "dark"
        }"#;

        let settings: RecorderSettings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.resolution_preset, "720p");
        assert!(settings.audio_mode.wants_audio());
        assert_eq!(settings.extra["theme"], "dark");

        // The opaque key survives serialization
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"theme\":\"dark\""));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RecorderSettings::load(&dir.path().join("settings.json"));
        assert_eq!(settings.resolution_preset, "1080p");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = RecorderSettings::default();
        settings.resolution_preset = "1440p".to_string();
        settings.audio_mode = AudioMode::Both;
        settings.save(&path).unwrap();

        let loaded = RecorderSettings::load(&path);
        assert_eq!(loaded.resolution_preset, "1440p");
        assert_eq!(loaded.audio_mode, AudioMode::Both);
    }
}
