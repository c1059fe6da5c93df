//! Downsampling of oversized card images.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use crate::cards::listing::list_cards;
use crate::cards::sizing::{fit_within, halve_within_limit, mip_map_size};
use crate::config::ReduceConfig;
use crate::models::{CardAsset, CardOutcome};

/// Knobs for a reduction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOptions {
  /// Largest accepted width or height before halving.
  pub limit: u32,
  /// JPEG quality of the written image.
  pub jpeg_quality: u8,
  /// Round the target size up to the mip-map grid.
  pub mip_align: bool,
}

impl Default for ReduceOptions {
  fn default() -> Self {
    Self::from(&ReduceConfig::default())
  }
}

impl From<&ReduceConfig> for ReduceOptions {
  fn from(config: &ReduceConfig) -> Self {
    Self {
      limit: config.limit,
      jpeg_quality: config.jpeg_quality,
      mip_align: config.mip_align,
    }
  }
}

/// Reduce every card below `cards_dir`.
pub fn reduce_cards(cards_dir: &Path, options: &ReduceOptions) -> Result<Vec<CardOutcome>> {
  list_cards(cards_dir)?
    .iter()
    .map(|card| reduce_card(card, options))
    .collect()
}

/// Regenerate the reduced image of one card.
///
/// Any previous reduced image is removed first so a card without a source never keeps a
/// stale output.
pub fn reduce_card(card: &CardAsset, options: &ReduceOptions) -> Result<CardOutcome> {
  if card.reduced.exists() {
    fs::remove_file(&card.reduced)
      .with_context(|| format!("failed to remove {}", card.reduced.display()))?;
  }

  if !card.source.exists() {
    return Ok(CardOutcome::Skipped {
      id: card.id.clone(),
    });
  }

  let image = image::open(&card.source)
    .with_context(|| format!("failed to open {}", card.source.display()))?;
  let original = (image.width(), image.height());

  let mut target = halve_within_limit(original.0, original.1, options.limit);
  if options.mip_align {
    target = mip_map_size(target.0, target.1);
  }
  tracing::info!(
    "{} {:?} -> {}, {}",
    card.source.display(),
    original,
    target.0,
    target.1
  );

  let reduced = thumbnail(image, target);
  let size = (reduced.width(), reduced.height());
  write_jpeg(&reduced, &card.reduced, options.jpeg_quality)?;

  Ok(CardOutcome::Reduced {
    id: card.id.clone(),
    original,
    reduced: size,
  })
}

fn thumbnail(image: DynamicImage, bounds: (u32, u32)) -> DynamicImage {
  let (w, h) = fit_within((image.width(), image.height()), bounds);
  if (w, h) == (image.width(), image.height()) {
    image
  } else {
    image.resize_exact(w, h, FilterType::Lanczos3)
  }
}

fn write_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
  let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
  let mut writer = BufWriter::new(file);

  let encoded = {
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    match image {
      DynamicImage::ImageLuma8(gray) => encoder.encode_image(gray),
      other => encoder.encode_image(&other.to_rgb8()),
    }
  };
  encoded.with_context(|| format!("failed to encode {}", path.display()))?;

  writer
    .flush()
    .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};
  use tempfile::tempdir;

  fn write_card(cards_dir: &Path, id: &str, width: u32, height: u32) -> CardAsset {
    let card = CardAsset::new(cards_dir, id);
    fs::create_dir_all(card.source.parent().unwrap()).unwrap();
    let image = RgbImage::from_fn(width, height, |x, y| {
      Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    image.save(&card.source).unwrap();
    card
  }

  fn options(limit: u32) -> ReduceOptions {
    ReduceOptions {
      limit,
      ..ReduceOptions::default()
    }
  }

  #[test]
  fn image_at_limit_keeps_its_size() {
    let dir = tempdir().unwrap();
    let card = write_card(dir.path(), "001", 100, 100);

    let outcome = reduce_card(&card, &options(100)).unwrap();

    assert_eq!(outcome, CardOutcome::Reduced {
      id: "001".into(),
      original: (100, 100),
      reduced: (100, 100),
    });
    let written = image::open(&card.reduced).unwrap();
    assert_eq!((written.width(), written.height()), (100, 100));
  }

  #[test]
  fn one_pixel_over_limit_halves_once() {
    let dir = tempdir().unwrap();
    let card = write_card(dir.path(), "002", 101, 100);

    let outcome = reduce_card(&card, &options(100)).unwrap();

    assert_eq!(outcome, CardOutcome::Reduced {
      id: "002".into(),
      original: (101, 100),
      reduced: (50, 50),
    });
    let written = image::open(&card.reduced).unwrap();
    assert_eq!((written.width(), written.height()), (50, 50));
  }

  #[test]
  fn large_images_shrink_until_within_limit() {
    let dir = tempdir().unwrap();
    let card = write_card(dir.path(), "003", 480, 240);

    reduce_card(&card, &options(100)).unwrap();

    let written = image::open(&card.reduced).unwrap();
    assert_eq!((written.width(), written.height()), (60, 30));
  }

  #[test]
  fn default_limit_halves_only_past_1500() {
    let dir = tempdir().unwrap();
    let at_limit = write_card(dir.path(), "010", 1500, 1500);
    let over_limit = write_card(dir.path(), "011", 1501, 1500);

    reduce_card(&at_limit, &ReduceOptions::default()).unwrap();
    let outcome = reduce_card(&over_limit, &ReduceOptions::default()).unwrap();

    let written = image::open(&at_limit.reduced).unwrap();
    assert_eq!((written.width(), written.height()), (1500, 1500));
    assert_eq!(outcome, CardOutcome::Reduced {
      id: "011".into(),
      original: (1501, 1500),
      reduced: (750, 750),
    });
    let written = image::open(&over_limit.reduced).unwrap();
    assert_eq!((written.width(), written.height()), (750, 750));
  }

  #[test]
  fn mip_alignment_rounds_the_target_up() {
    let dir = tempdir().unwrap();
    let plain = write_card(dir.path(), "004", 198, 198);
    let aligned = write_card(dir.path(), "009", 198, 198);
    let mip = ReduceOptions {
      limit: 100,
      mip_align: true,
      ..ReduceOptions::default()
    };

    reduce_card(&plain, &options(100)).unwrap();
    let outcome = reduce_card(&aligned, &mip).unwrap();

    let written = image::open(&plain.reduced).unwrap();
    assert_eq!((written.width(), written.height()), (99, 99));
    assert_eq!(outcome, CardOutcome::Reduced {
      id: "009".into(),
      original: (198, 198),
      reduced: (100, 100),
    });
    let written = image::open(&aligned.reduced).unwrap();
    assert_eq!((written.width(), written.height()), (100, 100));
  }

  #[test]
  fn removes_stale_output_without_source() {
    let dir = tempdir().unwrap();
    let card = CardAsset::new(dir.path(), "005");
    fs::create_dir_all(card.reduced.parent().unwrap()).unwrap();
    fs::write(&card.reduced, b"stale").unwrap();

    let outcome = reduce_card(&card, &options(100)).unwrap();

    assert_eq!(outcome, CardOutcome::Skipped { id: "005".into() });
    assert!(!card.reduced.exists());
  }

  #[test]
  fn rerunning_produces_identical_bytes() {
    let dir = tempdir().unwrap();
    write_card(dir.path(), "006", 150, 90);
    write_card(dir.path(), "007", 60, 60);
    fs::create_dir_all(dir.path().join("008")).unwrap();

    let first = reduce_cards(dir.path(), &options(100)).unwrap();
    let bytes_a = fs::read(dir.path().join("006/006.jpeg")).unwrap();
    let bytes_b = fs::read(dir.path().join("007/007.jpeg")).unwrap();

    let second = reduce_cards(dir.path(), &options(100)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert_eq!(first[2], CardOutcome::Skipped { id: "008".into() });
    assert_eq!(fs::read(dir.path().join("006/006.jpeg")).unwrap(), bytes_a);
    assert_eq!(fs::read(dir.path().join("007/007.jpeg")).unwrap(), bytes_b);
  }

  #[test]
  fn missing_cards_directory_is_fatal() {
    let dir = tempdir().unwrap();
    assert!(reduce_cards(&dir.path().join("cards"), &options(100)).is_err());
  }
}
