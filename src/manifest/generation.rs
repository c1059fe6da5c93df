//! Build the data manifest from the record file, transcoding audio along the way.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{PrepareConfig, resolve};
use crate::manifest::document::write_manifest;
use crate::manifest::record::{TagRules, parse_data_file};
use crate::manifest::relocate::move_file;
use crate::manifest::transcode::Transcoder;
use crate::models::{DataRecord, Manifest, PrepareSummary};
use crate::selection::{CatalogPresence, RecordInclusion};

/// Where narration audio lives before and after processing.
#[derive(Debug, Clone)]
pub struct AudioLayout {
  /// Directory holding source audio and transcoded output.
  pub material_dir: PathBuf,
  /// Directory receiving handled source audio.
  pub removed_dir: PathBuf,
  /// Extension of the source audio files.
  pub source_extension: String,
  /// Extension of the transcoded files.
  pub output_extension: String,
}

impl AudioLayout {
  /// File name of the source audio for a record number.
  pub fn source_name(&self, number: i64) -> String {
    format!("audio{number}.{}", self.source_extension)
  }

  /// File name of the transcoded audio for a record number.
  pub fn output_name(&self, number: i64) -> String {
    format!("audio{number}.{}", self.output_extension)
  }
}

/// Filter, transcode and collect parsed records into a manifest.
///
/// Records rejected by `selection` are logged and left alone: no encoder run and no file
/// moves. For kept records the encoder only runs when the transcoded file is missing, the
/// source audio is moved to the removed directory either way, and `audio` is set from
/// whether the transcoded file exists afterwards.
pub fn build_manifest<S, T>(
  records: Vec<DataRecord>,
  selection: &S,
  layout: &AudioLayout,
  transcoder: &T,
) -> Result<(Manifest, PrepareSummary)>
where
  S: RecordInclusion,
  T: Transcoder,
{
  let mut manifest = Manifest::new();
  let mut summary = PrepareSummary::default();

  for mut record in records {
    let number = record.number();
    if !selection.is_included(number) {
      tracing::debug!(number, "record excluded");
      summary.skipped += 1;
      continue;
    }

    let source = layout.material_dir.join(layout.source_name(number));
    let output_name = layout.output_name(number);
    let output = layout.material_dir.join(&output_name);

    if source.exists() {
      if !output.exists() {
        transcoder.transcode(&source, &output);
        summary.transcoded += 1;
      }
      let target = layout.removed_dir.join(layout.source_name(number));
      move_file(&source, &target)?;
      summary.relocated += 1;
    }

    record.set_audio(output.exists().then_some(output_name));
    manifest.insert(record);
  }

  summary.kept = manifest.len();
  Ok((manifest, summary))
}

/// Run the whole preparation: read the data file, build and write the manifest.
pub fn run_prepare<T: Transcoder>(
  root: &Path,
  config: &PrepareConfig,
  transcoder: &T,
) -> Result<PrepareSummary> {
  let catalog = CatalogPresence::new(resolve(root, &config.catalog_dir), config.number_width);
  tracing::info!("catalog directory {}", catalog.catalog_dir().display());

  let data_path = resolve(root, &config.data_file);
  let text = fs::read_to_string(&data_path)
    .with_context(|| format!("failed to read {}", data_path.display()))?;
  let rules = TagRules {
    separator: config.tag_separator.clone(),
    sentinel: config.tag_sentinel.clone(),
  };
  let records = parse_data_file(&text, &rules)
    .with_context(|| format!("failed to parse {}", data_path.display()))?;

  let layout = AudioLayout {
    material_dir: resolve(root, &config.material_dir),
    removed_dir: resolve(root, &config.removed_dir),
    source_extension: config.source_extension.clone(),
    output_extension: config.output_extension.clone(),
  };
  let (manifest, summary) = build_manifest(records, &LoggedSkips(&catalog), &layout, transcoder)?;

  write_manifest(&manifest, &resolve(root, &config.manifest))?;
  tracing::info!(
    kept = summary.kept,
    skipped = summary.skipped,
    transcoded = summary.transcoded,
    "ok"
  );
  Ok(summary)
}

/// Reports the missing directory path for every rejected record.
struct LoggedSkips<'a>(&'a CatalogPresence);

impl RecordInclusion for LoggedSkips<'_> {
  fn is_included(&self, number: i64) -> bool {
    let included = self.0.is_included(number);
    if !included {
      tracing::info!("Skipping {}", self.0.companion_dir(number).display());
    }
    included
  }
}
