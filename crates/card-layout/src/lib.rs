pub mod geometry;
pub mod layout;
pub mod metrics;
mod model;
mod patch;
mod presets;
pub mod render;
mod types;
pub mod units;

pub use model::*;
pub use patch::*;
pub use presets::*;
pub use types::*;
