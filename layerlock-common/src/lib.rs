#![no_std]
pub mod feedback;
pub mod keycodes;
pub mod layer;

pub use layer::{LayerId, LayerSet};
