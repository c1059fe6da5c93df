//! Card image maintenance: downsampling oversized images and reverting sources.

mod listing;
pub mod reduce;
pub mod revert;
pub mod sizing;

pub use listing::list_cards;
pub use reduce::{ReduceOptions, reduce_card, reduce_cards};
pub use revert::revert_cards;
pub use sizing::{fit_within, halve_within_limit, mip_map_size};
