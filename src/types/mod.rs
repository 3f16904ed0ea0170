//! Data types for barcode grids.

mod color;
mod config;
mod item;
mod preset;
mod spacing;
mod state;

pub use color::*;
pub use config::*;
pub use item::*;
pub use preset::*;
pub use spacing::*;
pub use state::*;
