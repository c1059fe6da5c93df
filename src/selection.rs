//! Filters deciding which parsed records make it into the manifest.

use std::path::{Path, PathBuf};

/// Trait describing record filters applied before any audio work happens.
pub trait RecordInclusion {
  /// Returns `true` when the record with this number should be kept.
  fn is_included(&self, number: i64) -> bool;
}

/// Keeps records whose companion catalog directory exists.
#[derive(Debug, Clone)]
pub struct CatalogPresence {
  catalog_dir: PathBuf,
  width: usize,
}

impl CatalogPresence {
  /// Filter against `catalog_dir/<number zero-padded to width>`.
  pub fn new(catalog_dir: impl Into<PathBuf>, width: usize) -> Self {
    Self {
      catalog_dir: catalog_dir.into(),
      width,
    }
  }

  /// Directory expected for a record number.
  pub fn companion_dir(&self, number: i64) -> PathBuf {
    self.catalog_dir.join(zero_pad(number, self.width))
  }

  /// Root directory searched for companion directories.
  pub fn catalog_dir(&self) -> &Path {
    &self.catalog_dir
  }
}

impl RecordInclusion for CatalogPresence {
  fn is_included(&self, number: i64) -> bool {
    self.companion_dir(number).exists()
  }
}

/// Left-pad a number with zeros to `width` characters, counting the sign.
pub fn zero_pad(number: i64, width: usize) -> String {
  let digits = number.unsigned_abs().to_string();
  if number < 0 {
    format!("-{digits:0>pad$}", pad = width.saturating_sub(1))
  } else {
    format!("{digits:0>width$}")
  }
}
