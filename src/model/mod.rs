//! Data model for extracted package content.
//!
//! The extractor fills these structures; callers only read them.

mod attachment;
mod extraction;

pub use attachment::*;
pub use extraction::*;
