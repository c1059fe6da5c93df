//! Helpers for concatenating the preload JavaScript libraries into one file.

pub mod preload;
pub mod sources;

pub use preload::{assemble_bundle, write_preload_bundle};
pub use sources::collect_sources;
