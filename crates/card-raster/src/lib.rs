//! Asset rasterization: scannable-code generation and image decoding.
//!
//! The layout engine treats both as opaque capabilities; this crate turns a
//! payload string plus style configuration into an RGBA raster, and raw
//! bytes into a decoded image.

mod decode;
mod qr;
mod types;

pub use decode::decode_image;
pub use qr::render_code_raster;
pub use types::{RasterError, Result};
