mod component;
mod render;
mod rng;
mod scene;
mod state;
mod types;

pub use component::CircuitCanvas;
pub use types::{Palette, SchemeKind};
