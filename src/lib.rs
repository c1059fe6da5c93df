#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod bundle;
pub mod cards;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod selection;

pub use config::PrepConfig;
pub use error::{RecordParseError, RecordParseErrorKind};
pub use models::{BundleItem, CardAsset, CardOutcome, DataRecord, Manifest, PrepareSummary};
pub use selection::{CatalogPresence, RecordInclusion};
