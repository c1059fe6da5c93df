//! Data manifest generation: record parsing, audio transcoding and JSON output.

pub mod document;
pub mod generation;
pub mod record;
pub mod relocate;
pub mod transcode;

pub use document::{load_manifest, write_manifest};
pub use generation::{AudioLayout, build_manifest, run_prepare};
pub use record::{TagRules, parse_data_file, parse_fields, parse_record_line};
pub use relocate::move_file;
pub use transcode::{CommandTranscoder, Transcoder};
