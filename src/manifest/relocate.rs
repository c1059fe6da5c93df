//! Moving handled source audio out of the material directory.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use same_file::is_same_file;

/// Move `source` to `destination`, replacing an existing destination file.
///
/// Falls back to copy and delete when a rename is not possible, for example across
/// file systems. Moving a file onto itself does nothing.
pub fn move_file(source: &Path, destination: &Path) -> Result<()> {
  if let Some(parent) = destination.parent() {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  if destination.exists() && is_same_file(source, destination)? {
    return Ok(());
  }

  match fs::rename(source, destination) {
    Ok(()) => Ok(()),
    Err(err) if err.kind() == ErrorKind::NotFound => Err(err)
      .with_context(|| format!("failed to move {}", source.display())),
    Err(_) => {
      fs::copy(source, destination).with_context(|| {
        format!(
          "failed to copy {} to {}",
          source.display(),
          destination.display()
        )
      })?;
      fs::remove_file(source).with_context(|| format!("failed to remove {}", source.display()))
    }
  }
}
