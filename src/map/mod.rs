mod geometry;
mod projection;
mod renderer;
mod spatial;

pub use projection::{Viewport, PERU_CENTER};
pub use renderer::{ChoroplethRenderer, DisplaySettings, MapLayers};
