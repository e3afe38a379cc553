//! Header normalization and header row detection

mod locate;
mod normalize;

pub use locate::{
    DetectionMethod, HeaderDetection, HeaderLocator, HeaderStrategy, keyword_matches,
    looks_like_header,
};
pub use normalize::{normalize_cell, normalize_header};
