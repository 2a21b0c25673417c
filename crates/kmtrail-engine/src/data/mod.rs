//! Synthetic datasets for demonstrating and testing the engine.

pub use self::blobs::*;

mod blobs;
