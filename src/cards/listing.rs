//! Enumeration of card directories.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::CardAsset;

/// Enumerate the card subdirectories of `cards_dir`, sorted by name.
///
/// Plain files next to the card directories are ignored. A missing `cards_dir` is an error.
pub fn list_cards(cards_dir: &Path) -> Result<Vec<CardAsset>> {
  let mut ids = Vec::new();

  for entry in fs::read_dir(cards_dir)
    .with_context(|| format!("failed to read cards directory {}", cards_dir.display()))?
  {
    let entry = entry?;
    if !entry.file_type()?.is_dir() {
      continue;
    }
    ids.push(entry.file_name().to_string_lossy().into_owned());
  }

  ids.sort();
  Ok(
    ids
      .iter()
      .map(|id| CardAsset::new(cards_dir, id))
      .collect(),
  )
}
