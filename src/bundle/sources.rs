//! Expansion of bundle items into the ordered list of script files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::BundleItem;

/// Resolve every bundle item into script paths, keeping the declared item order.
///
/// Directory items contribute their immediate `.js` children in the order the file
/// system reports them. A missing directory aborts the whole expansion.
pub fn collect_sources(root: &Path, items: &[BundleItem]) -> Result<Vec<PathBuf>> {
  let mut sources = Vec::new();

  for item in items {
    match item {
      BundleItem::Script(path) => sources.push(root.join(path)),
      BundleItem::Directory(path) => {
        let dir = root.join(path);
        sources.extend(list_directory_scripts(&dir)?);
      }
    }
  }

  Ok(sources)
}

fn list_directory_scripts(dir: &Path) -> Result<Vec<PathBuf>> {
  let mut scripts = Vec::new();

  for entry in fs::read_dir(dir)
    .with_context(|| format!("failed to read script directory {}", dir.display()))?
  {
    let entry = entry?;
    if !entry.file_type()?.is_file() {
      continue;
    }

    let file_name = entry.file_name();
    if file_name.to_string_lossy().ends_with(".js") {
      scripts.push(entry.path());
    }
  }

  Ok(scripts)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::BTreeSet;
  use tempfile::tempdir;

  #[test]
  fn expands_directories_to_their_scripts() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("plugins/nested")).unwrap();
    fs::write(root.join("plugins/a.js"), "a").unwrap();
    fs::write(root.join("plugins/b.js"), "b").unwrap();
    fs::write(root.join("plugins/readme.txt"), "skip").unwrap();
    fs::write(root.join("plugins/nested/c.js"), "nested").unwrap();
    fs::write(root.join("main.js"), "main").unwrap();

    let items = vec![
      BundleItem::classify("main.js"),
      BundleItem::classify("plugins"),
    ];
    let sources = collect_sources(root, &items).unwrap();

    assert_eq!(sources.len(), 3);
    assert_eq!(sources[0], root.join("main.js"));
    let from_dir: BTreeSet<PathBuf> = sources[1..].iter().cloned().collect();
    assert_eq!(
      from_dir,
      BTreeSet::from([root.join("plugins/a.js"), root.join("plugins/b.js")])
    );
  }

  #[test]
  fn missing_directory_is_fatal() {
    let dir = tempdir().unwrap();
    let err = collect_sources(dir.path(), &[BundleItem::classify("highlight")]).unwrap_err();
    assert!(err.to_string().contains("highlight"));
  }
}
