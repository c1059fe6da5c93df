//! External encoder invocation for narration audio.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::EncoderConfig;

/// Converts a source audio file into the format referenced by the manifest.
///
/// Implementations report nothing: callers inspect the output path afterwards to learn
/// whether the conversion produced anything.
pub trait Transcoder {
  /// Convert `input` into `output`.
  fn transcode(&self, input: &Path, output: &Path);
}

/// Runs an external program such as `ffmpeg`.
#[derive(Debug, Clone)]
pub struct CommandTranscoder {
  program: String,
  args: Vec<String>,
}

impl CommandTranscoder {
  /// Build a transcoder from the configured command line.
  pub fn new(config: &EncoderConfig) -> Self {
    Self {
      program: config.program.clone(),
      args: config.args.clone(),
    }
  }

  /// Arguments with `{input}` and `{output}` substituted.
  pub fn arguments(&self, input: &Path, output: &Path) -> Vec<String> {
    let input = input.to_string_lossy();
    let output = output.to_string_lossy();
    self
      .args
      .iter()
      .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
      .collect()
  }
}

impl Transcoder for CommandTranscoder {
  fn transcode(&self, input: &Path, output: &Path) {
    let args = self.arguments(input, output);
    tracing::info!("{} {}", self.program, args.join(" "));

    // Exit status is not acted upon; a failed run leaves no output behind.
    match Command::new(&self.program)
      .args(&args)
      .stdin(Stdio::null())
      .status()
    {
      Ok(status) if !status.success() => {
        tracing::debug!(program = %self.program, %status, "encoder exited unsuccessfully");
      }
      Ok(_) => {}
      Err(err) => {
        tracing::warn!(program = %self.program, "failed to launch encoder: {err}");
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn substitutes_input_and_output_placeholders() {
    let transcoder = CommandTranscoder::new(&EncoderConfig::default());
    let args = transcoder.arguments(
      Path::new("material/audio19.aifc"),
      Path::new("material/audio19.mp4"),
    );
    assert_eq!(args, vec![
      "-i",
      "material/audio19.aifc",
      "-vcodec",
      "h264",
      "-acodec",
      "aac",
      "-strict",
      "-2",
      "material/audio19.mp4",
    ]);
  }

  #[test]
  fn missing_encoder_binary_is_not_fatal() {
    let dir = tempdir().unwrap();
    let transcoder = CommandTranscoder::new(&EncoderConfig {
      program: "epochal-prep-no-such-encoder".into(),
      args: vec!["{input}".into(), "{output}".into()],
    });
    let output = dir.path().join("audio1.mp4");

    transcoder.transcode(&dir.path().join("audio1.aifc"), &output);
    assert!(!output.exists());
  }
}
