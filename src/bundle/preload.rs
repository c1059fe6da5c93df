//! Concatenation of the preload scripts into a single bundle file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::bundle::sources::collect_sources;
use crate::models::BundleItem;

/// Concatenate the sources of `items`, each preceded by a newline.
pub fn assemble_bundle(root: &Path, items: &[BundleItem]) -> Result<Vec<u8>> {
  let mut bundle = Vec::new();

  for source in collect_sources(root, items)? {
    let bytes =
      fs::read(&source).with_context(|| format!("failed to read {}", source.display()))?;
    bundle.push(b'\n');
    bundle.extend_from_slice(&bytes);
    tracing::info!("File appended: {}", source.display());
  }

  Ok(bundle)
}

/// Write the preload bundle for `items` to `output`.
///
/// Every input is read before the output is touched, so a missing script leaves any
/// previous bundle in place.
pub fn write_preload_bundle(root: &Path, items: &[BundleItem], output: &Path) -> Result<()> {
  let bundle = assemble_bundle(root, items)?;
  fs::write(output, bundle).with_context(|| format!("failed to write {}", output.display()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn prefixes_every_script_with_a_newline() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("greensock")).unwrap();
    fs::write(root.join("greensock/TweenLite.js"), "var TweenLite = {};").unwrap();
    fs::write(root.join("convert.js"), "function convert() {}\n").unwrap();

    let items = vec![
      BundleItem::classify("greensock/TweenLite.js"),
      BundleItem::classify("convert.js"),
    ];
    let output = root.join("preload.js");
    write_preload_bundle(root, &items, &output).unwrap();

    assert_eq!(
      fs::read_to_string(&output).unwrap(),
      "\nvar TweenLite = {};\nfunction convert() {}\n"
    );
  }

  #[test]
  fn empty_directories_contribute_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("highlight")).unwrap();
    fs::write(root.join("app.js"), "app()").unwrap();

    let items = vec![BundleItem::classify("highlight"), BundleItem::classify("app.js")];
    assert_eq!(assemble_bundle(root, &items).unwrap(), b"\napp()");
  }

  #[test]
  fn missing_script_leaves_previous_bundle_untouched() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let output = root.join("preload.js");
    fs::write(&output, "previous").unwrap();
    fs::write(root.join("present.js"), "present").unwrap();

    let items = vec![
      BundleItem::classify("present.js"),
      BundleItem::classify("absent.js"),
    ];
    let err = write_preload_bundle(root, &items, &output).unwrap_err();

    assert!(err.to_string().contains("absent.js"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
  }
}
