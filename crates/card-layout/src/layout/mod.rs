//! Placement resolvers for the elements of a card.
//!
//! Everything here is pure geometry over the document model: given a fully
//! resolved snapshot, each resolver returns rectangles and line breaks in
//! canonical (top-left origin, Y-down) point space. Degenerate
//! configurations yield `None` — nothing to draw — never an error.

mod background;
mod caption;
mod code;
mod overlays;

pub use background::*;
pub use caption::*;
pub use code::*;
pub use overlays::*;
