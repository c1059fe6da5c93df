//! Configuration loader describing where each utility reads and writes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::BundleItem;

/// File name searched for in the project root.
pub const DEFAULT_CONFIG_FILE: &str = "prep.config.json";

/// Root configuration with one section per utility.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Preload bundle settings.
    pub bundle: BundleConfig,
    /// Data manifest settings.
    pub prepare: PrepareConfig,
    /// Card reduction settings.
    pub reduce: ReduceConfig,
}

/// Inputs and output of the preload bundle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Scripts and script directories, in execution order.
    pub items: Vec<String>,
    /// Bundle written by the run.
    pub output: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            items: vec![
                "highlight".into(),
                "greensock/src/uncompressed/plugins".into(),
                "greensock/src/uncompressed/TweenLite.js".into(),
                "convertPointFromPageToNode.js".into(),
            ],
            output: "preload.js".into(),
        }
    }
}

impl BundleConfig {
    /// Configured items classified into scripts and directories.
    pub fn bundle_items(&self) -> Vec<BundleItem> {
        self.items.iter().map(|item| BundleItem::classify(item)).collect()
    }
}

/// Paths and conventions used while building the data manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Line-oriented record file.
    pub data_file: String,
    /// Directory holding `audio<n>.aifc` sources and transcoded outputs.
    pub material_dir: String,
    /// Directory receiving source audio once it has been handled.
    pub removed_dir: String,
    /// Directory holding one companion directory per kept record.
    pub catalog_dir: String,
    /// Manifest written by the run.
    pub manifest: String,
    /// Separator between tags inside the `tags` field.
    pub tag_separator: String,
    /// Placeholder tag removed from every record.
    pub tag_sentinel: String,
    /// Width the record number is zero-padded to for catalog lookups.
    pub number_width: usize,
    /// Extension of the source audio files.
    pub source_extension: String,
    /// Extension of the transcoded audio files.
    pub output_extension: String,
    /// External encoder invocation.
    pub encoder: EncoderConfig,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            data_file: "data.txt".into(),
            material_dir: "material".into(),
            removed_dir: "removed".into(),
            catalog_dir: "../../var/eyevisit".into(),
            manifest: "data.json".into(),
            tag_separator: "\t".into(),
            tag_sentinel: "x".into(),
            number_width: 3,
            source_extension: "aifc".into(),
            output_extension: "mp4".into(),
            encoder: EncoderConfig::default(),
        }
    }
}

/// Command line of the external media encoder.
///
/// `{input}` and `{output}` inside `args` are replaced with the audio paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Program to run.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".into(),
            args: [
                "-i", "{input}", "-vcodec", "h264", "-acodec", "aac", "-strict", "-2", "{output}",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Settings for the card image reducer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReduceConfig {
    /// Directory holding one subdirectory per card.
    pub cards_dir: String,
    /// Largest accepted width or height before halving.
    pub limit: u32,
    /// JPEG quality of the reduced images.
    pub jpeg_quality: u8,
    /// Round the target size up to a mip-map friendly grid.
    pub mip_align: bool,
    /// Version control client used by `revert-cards`.
    pub vcs: String,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            cards_dir: "cards".into(),
            limit: 1500,
            jpeg_quality: 75,
            mip_align: false,
            vcs: "svn".into(),
        }
    }
}

impl PrepConfig {
    /// Load `prep.config.json` from the root directory.
    ///
    /// A missing or unparsable file yields the defaults so the historical layout keeps
    /// working without any configuration.
    pub fn discover(root: &Path) -> Self {
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        match Self::from_path(&candidate) {
            Ok(config) => config,
            Err(err) => {
                if candidate.exists() {
                    tracing::warn!(path = %candidate.display(), "ignoring configuration: {err:#}");
                }
                Self::default()
            }
        }
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Resolve a configured path against the project root.
pub fn resolve(root: &Path, configured: &str) -> PathBuf {
    root.join(configured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_historical_layout() {
        let config = PrepConfig::default();
        assert_eq!(config.bundle.output, "preload.js");
        assert_eq!(config.bundle.items.len(), 4);
        assert_eq!(config.prepare.data_file, "data.txt");
        assert_eq!(config.prepare.tag_separator, "\t");
        assert_eq!(config.prepare.encoder.program, "ffmpeg");
        assert_eq!(config.reduce.limit, 1500);
        assert!(!config.reduce.mip_align);
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{"reduce": {"limit": 2048}, "prepare": {"catalog_dir": "eyevisit"}}"#,
        )
        .unwrap();

        let config = PrepConfig::discover(dir.path());
        assert_eq!(config.reduce.limit, 2048);
        assert_eq!(config.reduce.cards_dir, "cards");
        assert_eq!(config.prepare.catalog_dir, "eyevisit");
        assert_eq!(config.prepare.manifest, "data.json");
    }

    #[test]
    fn missing_or_broken_files_use_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(PrepConfig::discover(dir.path()).reduce.limit, 1500);

        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
        assert_eq!(PrepConfig::discover(dir.path()).bundle.output, "preload.js");
        assert!(PrepConfig::from_path(&dir.path().join(DEFAULT_CONFIG_FILE)).is_err());
    }

    #[test]
    fn classifies_configured_items() {
        let items = BundleConfig::default().bundle_items();
        assert!(matches!(items[0], BundleItem::Directory(_)));
        assert!(matches!(items[2], BundleItem::Script(_)));
    }
}
