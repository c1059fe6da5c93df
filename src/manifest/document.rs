//! JSON serialisation of the data manifest.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::models::{DataRecord, Manifest};

const INDENT: &[u8] = b"    ";

impl Manifest {
  /// Serialise the records as a JSON list with four-space indentation.
  ///
  /// Non-ASCII characters are written as UTF-8 rather than escaped.
  pub fn to_json(&self) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    self
      .records()
      .serialize(&mut serializer)
      .context("failed to serialise manifest")?;
    String::from_utf8(buffer).context("manifest JSON is not valid UTF-8")
  }

  /// Rebuild a manifest from its JSON list form.
  pub fn from_json(text: &str) -> Result<Self> {
    let records: Vec<DataRecord> =
      serde_json::from_str(text).context("failed to parse manifest JSON")?;
    Ok(records.into_iter().collect())
  }
}

/// Write the manifest to `path`, overwriting any previous file.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
  let json = manifest.to_json()?;
  fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Load a manifest previously written by [`write_manifest`].
pub fn load_manifest(path: &Path) -> Result<Manifest> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("manifest not found at {}", path.display()))?;
  Manifest::from_json(&content)
}
