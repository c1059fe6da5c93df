//! Restore card sources from version control.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Result;

use crate::cards::listing::list_cards;

/// Run `<vcs> revert <source>` for every card that has a source image.
///
/// Returns the sources a revert was issued for. The client's exit status is not checked.
pub fn revert_cards(cards_dir: &Path, vcs: &str) -> Result<Vec<PathBuf>> {
  let mut reverted = Vec::new();

  for card in list_cards(cards_dir)? {
    if !card.source.exists() {
      continue;
    }

    tracing::info!("{} revert {}", vcs, card.source.display());
    match Command::new(vcs)
      .arg("revert")
      .arg(&card.source)
      .stdin(Stdio::null())
      .status()
    {
      Ok(status) if !status.success() => {
        tracing::debug!(%status, "revert exited unsuccessfully");
      }
      Ok(_) => {}
      Err(err) => tracing::warn!("failed to launch {vcs}: {err}"),
    }
    reverted.push(card.source);
  }

  Ok(reverted)
}
