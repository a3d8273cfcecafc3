//! Collage settings and settings-file discovery
//!
//! Settings resolve in three layers, later layers win:
//!
//! 1. Compile-time defaults (6 collages of 6000x4800, 6px border/padding, quality 95)
//! 2. JSON settings file (all fields optional)
//! 3. Command-line flags
//!
//! Settings-file priority:
//! 1. CLI `--config` argument
//! 2. `GRIDCOLLAGE_CONFIG` environment variable
//! 3. `gridcollage.json` in the current directory, if it exists
//! 4. Platform config directory from dirs-next, if the file exists there
//!    - Linux: ~/.config/gridcollage/gridcollage.json
//!    - macOS: ~/Library/Application Support/gridcollage/gridcollage.json
//!    - Windows: %APPDATA%\gridcollage\gridcollage.json

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::compositor::DEFAULT_BACKGROUND;
use crate::core::error::CollageError;
use crate::core::grid::{GridGeometry, PHOTOS_PER_COLLAGE};
use crate::core::writer::DEFAULT_QUALITY;

/// Settings file name used for discovery
pub const CONFIG_FILE_NAME: &str = "gridcollage.json";
/// Environment variable pointing at a settings file
pub const CONFIG_ENV_VAR: &str = "GRIDCOLLAGE_CONFIG";

pub const DEFAULT_CANVAS_WIDTH: u32 = 6000;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 4800;
pub const DEFAULT_BORDER: u32 = 6;
pub const DEFAULT_PADDING: u32 = 6;
pub const DEFAULT_COLLAGES: u32 = 6;
pub const DEFAULT_PAUSE_MS: u64 = 500;

/// Effective settings for one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollageSettings {
    /// Folder with `NNNN-*.jpg` photos
    pub source_dir: PathBuf,
    /// Folder receiving the collages (created if missing)
    pub output_dir: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Spacing between adjacent cells
    pub border: u32,
    /// Margin between canvas edge and outer cells
    pub padding: u32,
    /// Number of collages; photos expected = collages * 100
    pub collages: u32,
    /// JPEG quality 1-100
    pub quality: u8,
    /// Output name prefix: `{prefix}_0001-0100.jpg`
    pub file_prefix: String,
    /// RGB fill for padding, borders and blank cells
    pub background: [u8; 3],
    /// Cosmetic pause between collages
    pub pause_ms: u64,
}

impl Default for CollageSettings {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("./collages"),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            border: DEFAULT_BORDER,
            padding: DEFAULT_PADDING,
            collages: DEFAULT_COLLAGES,
            quality: DEFAULT_QUALITY,
            file_prefix: "collage".to_string(),
            background: DEFAULT_BACKGROUND,
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }
}

impl CollageSettings {
    /// Photos expected in the source folder (numbered `1..=total`)
    pub fn total_photos(&self) -> u32 {
        self.collages.saturating_mul(PHOTOS_PER_COLLAGE)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// Grid geometry for the configured canvas
    pub fn geometry(&self) -> Result<GridGeometry, CollageError> {
        GridGeometry::new(self.canvas_width, self.canvas_height, self.border, self.padding)
    }

    /// Reject settings that cannot produce collages
    pub fn validate(&self) -> Result<(), CollageError> {
        if self.collages == 0 {
            return Err(CollageError::Config("collages must be at least 1".to_string()));
        }
        // 4-digit numbering caps the photo count
        if self.total_photos() > 9999 {
            return Err(CollageError::Config(format!(
                "{} collages need {} photos, numbering supports at most 9999",
                self.collages,
                self.total_photos()
            )));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(CollageError::Config(format!("quality {} is outside 1-100", self.quality)));
        }
        if self.file_prefix.is_empty() || self.file_prefix.contains(['/', '\\']) {
            return Err(CollageError::Config(format!(
                "file prefix {:?} must be a non-empty plain name",
                self.file_prefix
            )));
        }
        self.geometry()?;
        Ok(())
    }

    /// Load settings from a JSON file; missing fields take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
        Ok(settings)
    }

    /// Defaults, overlaid with the discovered settings file if any.
    ///
    /// Runs before the logger exists, so the file that was read is returned
    /// for the caller to log.
    pub fn load(paths: &PathConfig) -> Result<(Self, Option<PathBuf>)> {
        match paths.settings_file() {
            Some(path) => Ok((Self::from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize settings")
    }
}

/// Where to look for the settings file
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// Explicit settings file (from CLI or ENV)
    pub config_file: Option<PathBuf>,
}

impl PathConfig {
    /// Create PathConfig from CLI arguments and environment variables
    ///
    /// Priority: CLI args → ENV var (GRIDCOLLAGE_CONFIG) → None (discovery)
    pub fn from_env_and_cli(cli_file: Option<PathBuf>) -> Self {
        let config_file = cli_file.or_else(|| {
            std::env::var(CONFIG_ENV_VAR)
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        });

        Self { config_file }
    }

    /// Settings file to load, if any.
    ///
    /// An explicit file is always returned (a missing one then fails to load);
    /// discovered locations are only returned when the file exists.
    pub fn settings_file(&self) -> Option<PathBuf> {
        let local = std::env::current_dir().ok().map(|d| d.join(CONFIG_FILE_NAME));
        let platform = dirs_next::config_dir().map(|d| d.join("gridcollage").join(CONFIG_FILE_NAME));
        resolve_settings_file(self.config_file.as_deref(), local, platform)
    }
}

fn resolve_settings_file(explicit: Option<&Path>, local: Option<PathBuf>, platform: Option<PathBuf>) -> Option<PathBuf> {
    // Priority 1: CLI or ENV
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    // Priority 2: local folder, then Priority 3: platform config dir
    [local, platform].into_iter().flatten().find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gridcollage_config_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults_match_batch_constants() {
        let s = CollageSettings::default();
        assert_eq!((s.canvas_width, s.canvas_height), (6000, 4800));
        assert_eq!((s.border, s.padding), (6, 6));
        assert_eq!(s.total_photos(), 600);
        assert_eq!(s.quality, 95);
        assert_eq!(s.pause(), Duration::from_millis(500));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let bad = [
            CollageSettings { collages: 0, ..Default::default() },
            CollageSettings { collages: 100, ..Default::default() },
            CollageSettings { quality: 0, ..Default::default() },
            CollageSettings { quality: 101, ..Default::default() },
            CollageSettings { canvas_width: 50, ..Default::default() },
            CollageSettings { file_prefix: String::new(), ..Default::default() },
            CollageSettings { file_prefix: "a/b".into(), ..Default::default() },
        ];
        for s in &bad {
            assert!(s.validate().is_err(), "{:?}", s);
        }
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let dir = temp_dir("partial");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "collages": 2, "file_prefix": "lockquests_collage", "pause_ms": 0 }"#).unwrap();

        let s = CollageSettings::from_file(&path).unwrap();
        assert_eq!(s.collages, 2);
        assert_eq!(s.file_prefix, "lockquests_collage");
        assert_eq!(s.pause_ms, 0);
        assert_eq!(s.canvas_width, DEFAULT_CANVAS_WIDTH);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bad_json_is_error() {
        let dir = temp_dir("bad");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        let err = CollageSettings::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
        assert!(CollageSettings::from_file(&dir.join("missing.json")).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let json = CollageSettings::default().to_json().unwrap();
        let back: CollageSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CollageSettings::default());
    }

    #[test]
    fn test_settings_file_priority() {
        let dir = temp_dir("priority");
        let local = dir.join("local.json");
        let platform = dir.join("platform.json");

        // Explicit wins even if it does not exist
        let explicit = dir.join("explicit.json");
        assert_eq!(
            resolve_settings_file(Some(&explicit), Some(local.clone()), Some(platform.clone())),
            Some(explicit)
        );

        // Nothing exists
        assert_eq!(resolve_settings_file(None, Some(local.clone()), Some(platform.clone())), None);

        fs::write(&platform, "{}").unwrap();
        assert_eq!(
            resolve_settings_file(None, Some(local.clone()), Some(platform.clone())),
            Some(platform.clone())
        );

        fs::write(&local, "{}").unwrap();
        assert_eq!(resolve_settings_file(None, Some(local.clone()), Some(platform)), Some(local));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_reports_settings_file() {
        let dir = temp_dir("load");
        let path = dir.join("explicit.json");
        fs::write(&path, r#"{ "quality": 80 }"#).unwrap();

        let paths = PathConfig { config_file: Some(path.clone()) };
        let (settings, used) = CollageSettings::load(&paths).unwrap();
        assert_eq!(settings.quality, 80);
        assert_eq!(used, Some(path));

        // Explicit file that does not exist fails instead of falling back
        let paths = PathConfig { config_file: Some(dir.join("missing.json")) };
        assert!(CollageSettings::load(&paths).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    // Only test touching GRIDCOLLAGE_CONFIG, so no other test races on it
    #[test]
    fn test_env_var_and_cli_priority() {
        unsafe { std::env::set_var(CONFIG_ENV_VAR, "/env/settings.json") };
        let from_env = PathConfig::from_env_and_cli(None);
        let from_cli = PathConfig::from_env_and_cli(Some(PathBuf::from("/custom/settings.json")));

        unsafe { std::env::set_var(CONFIG_ENV_VAR, "") };
        let empty_env = PathConfig::from_env_and_cli(None);

        unsafe { std::env::remove_var(CONFIG_ENV_VAR) };
        let no_env = PathConfig::from_env_and_cli(None);

        assert_eq!(from_env.config_file, Some(PathBuf::from("/env/settings.json")));
        assert_eq!(from_env.settings_file(), Some(PathBuf::from("/env/settings.json")));
        assert_eq!(from_cli.config_file, Some(PathBuf::from("/custom/settings.json")));
        assert_eq!(empty_env.config_file, None);
        assert_eq!(no_env.config_file, None);
    }
}
