//! Name matching primitives
//!
//! Normalization and edit-distance similarity shared by every detection pass.

mod normalization;
mod similarity;

pub use normalization::{contains_either, normalize};
pub use similarity::{are_similar, edit_distance, similarity};
pub(crate) use similarity::{are_similar_normalized, normalized_similarity};
