//! Data structures shared by the bundler, the data manifest and the card reducer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::RecordParseErrorKind;

/// One entry of the preload bundle list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleItem {
  /// A single script appended as-is.
  Script(PathBuf),
  /// A directory whose immediate `.js` children are appended.
  Directory(PathBuf),
}

impl BundleItem {
  /// Classify a configured path: anything ending in `.js` is a script, the rest directories.
  pub fn classify(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    if path.to_string_lossy().ends_with(".js") {
      Self::Script(path)
    } else {
      Self::Directory(path)
    }
  }

  /// Path of the item as configured.
  pub fn path(&self) -> &Path {
    match self {
      Self::Script(path) | Self::Directory(path) => path,
    }
  }
}

/// Metadata for one exhibit item, parsed from a line of the data file.
///
/// Fields keep the order they had on the line; `audio` is appended when the line did not
/// name it. `number` and `tags` are checked on construction, every other field is carried
/// through unchanged (name, artist, year, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct DataRecord {
  number: i64,
  fields: Map<String, Value>,
}

impl DataRecord {
  /// Build a record from its ordered fields.
  ///
  /// `number` must be an integer and `tags` a list of strings. A missing `audio` field is
  /// added as `null`.
  pub fn from_fields(mut fields: Map<String, Value>) -> Result<Self, RecordParseErrorKind> {
    let number = match fields.get("number") {
      Some(Value::Number(number)) => number.as_i64().ok_or(RecordParseErrorKind::WrongType {
        field: "number",
        expected: "an integer",
      })?,
      Some(_) => {
        return Err(RecordParseErrorKind::WrongType {
          field: "number",
          expected: "an integer",
        });
      }
      None => return Err(RecordParseErrorKind::MissingField("number")),
    };

    match fields.get("tags") {
      Some(Value::Array(tags)) if tags.iter().all(Value::is_string) => {}
      Some(_) => {
        return Err(RecordParseErrorKind::WrongType {
          field: "tags",
          expected: "a list of strings",
        });
      }
      None => return Err(RecordParseErrorKind::MissingField("tags")),
    }

    match fields.get("audio") {
      Some(Value::Null | Value::String(_)) => {}
      Some(_) => {
        return Err(RecordParseErrorKind::WrongType {
          field: "audio",
          expected: "a string or null",
        });
      }
      None => {
        fields.insert("audio".into(), Value::Null);
      }
    }

    Ok(Self { number, fields })
  }

  /// Inventory number, also used to locate the catalog directory and audio files.
  pub fn number(&self) -> i64 {
    self.number
  }

  /// Tags with the sentinel value removed.
  pub fn tags(&self) -> Vec<&str> {
    self
      .fields
      .get("tags")
      .and_then(Value::as_array)
      .map(|tags| tags.iter().filter_map(Value::as_str).collect())
      .unwrap_or_default()
  }

  /// Transcoded audio file name, or `None` when no transcoded output exists.
  pub fn audio(&self) -> Option<&str> {
    self.fields.get("audio").and_then(Value::as_str)
  }

  /// Replace the audio entry in place.
  pub fn set_audio(&mut self, audio: Option<String>) {
    self
      .fields
      .insert("audio".into(), audio.map_or(Value::Null, Value::String));
  }

  /// Look up any field by name.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.fields.get(key)
  }

  /// All fields in line order.
  pub fn fields(&self) -> &Map<String, Value> {
    &self.fields
  }
}

impl TryFrom<Map<String, Value>> for DataRecord {
  type Error = RecordParseErrorKind;

  fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
    Self::from_fields(fields)
  }
}

impl Serialize for DataRecord {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.fields.serialize(serializer)
  }
}

/// Ordered collection of kept records keyed by record number.
///
/// Inserting a number that is already present replaces the earlier record but keeps its
/// position, so the serialized list follows first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
  records: Vec<DataRecord>,
  positions: BTreeMap<i64, usize>,
}

impl Manifest {
  /// Create an empty manifest.
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert or replace the record with the same number.
  pub fn insert(&mut self, record: DataRecord) {
    match self.positions.get(&record.number()) {
      Some(&index) => self.records[index] = record,
      None => {
        self.positions.insert(record.number(), self.records.len());
        self.records.push(record);
      }
    }
  }

  /// Look up a record by number.
  pub fn get(&self, number: i64) -> Option<&DataRecord> {
    self
      .positions
      .get(&number)
      .map(|&index| &self.records[index])
  }

  /// Records in manifest order.
  pub fn records(&self) -> &[DataRecord] {
    &self.records
  }

  /// Number of kept records.
  pub fn len(&self) -> usize {
    self.records.len()
  }

  /// Returns `true` when no record was kept.
  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }
}

impl FromIterator<DataRecord> for Manifest {
  fn from_iter<I: IntoIterator<Item = DataRecord>>(iter: I) -> Self {
    let mut manifest = Self::new();
    for record in iter {
      manifest.insert(record);
    }
    manifest
  }
}

/// Counters reported at the end of a `prepare` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareSummary {
  /// Records written to the manifest.
  pub kept: usize,
  /// Records dropped because their catalog directory is missing.
  pub skipped: usize,
  /// Encoder invocations attempted.
  pub transcoded: usize,
  /// Source audio files moved out of the material directory.
  pub relocated: usize,
}

/// What happened to a single card directory during reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
  /// A reduced image was written.
  Reduced {
    /// Card identifier (directory name).
    id: String,
    /// Source dimensions.
    original: (u32, u32),
    /// Dimensions of the written image.
    reduced: (u32, u32),
  },
  /// No source image was found; any stale output was still removed.
  Skipped {
    /// Card identifier (directory name).
    id: String,
  },
}

/// Paths of the source and derived image for one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardAsset {
  /// Card identifier (directory name).
  pub id: String,
  /// Original image, `<id>/<id>.jpg`.
  pub source: PathBuf,
  /// Reduced image, `<id>/<id>.jpeg`.
  pub reduced: PathBuf,
}

impl CardAsset {
  /// Resolve the asset paths for the card directory `cards_dir/<id>`.
  pub fn new(cards_dir: &Path, id: &str) -> Self {
    let dir = cards_dir.join(id);
    Self {
      id: id.to_string(),
      source: dir.join(format!("{id}.jpg")),
      reduced: dir.join(format!("{id}.jpeg")),
    }
  }
}
