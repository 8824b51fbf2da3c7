//! The screen pathway: an RGBA raster surface in canonical orientation plus
//! a debounced, superseding preview scheduler.

mod scheduler;
mod surface;

pub use scheduler::{DEBOUNCE, PreviewRequest, PreviewUpdate, preview_task};
pub use surface::PreviewSurface;

use card_layout::render::{RenderAssets, RenderOptions, render_card};
use card_layout::{DataRow, DocumentModel};
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Image encoding error: {0}")]
    ImageEncode(String),
    #[error("Raster error: {0}")]
    Raster(#[from] card_raster::RasterError),
}

pub type Result<T> = std::result::Result<T, PreviewError>;

/// Decoded assets shared across preview renders.
#[derive(Debug, Clone, Default)]
pub struct PreviewAssets {
    pub base_image: Option<RgbaImage>,
    pub logo: Option<RgbaImage>,
}

/// Render one row into a fresh pixmap at `pixels_per_pt` resolution.
///
/// The buffer is new every call — a superseded render can never leave
/// partially drawn state behind.
pub fn render_row_preview(
    doc: &DocumentModel,
    row: Option<&DataRow>,
    assets: &PreviewAssets,
    pixels_per_pt: f32,
) -> Result<RgbaImage> {
    let mut surface = PreviewSurface::new(doc.page.width_pts, doc.page.height_pts, pixels_per_pt);

    // Rasterize at double the preview scale so downscaling keeps modules
    // crisp.
    let code_raster = match row {
        Some(row) if row.is_valid() && !row.payload.is_empty() => {
            match card_raster::render_code_raster(&row.payload, &doc.code, pixels_per_pt * 2.0) {
                Ok(img) => Some(img),
                Err(e) => {
                    log::error!("Failed to rasterize code for preview: {e}");
                    None
                }
            }
        }
        _ => None,
    };

    render_card(
        &mut surface,
        doc,
        row,
        &RenderAssets {
            base_image: assets.base_image.as_ref(),
            code_raster: code_raster.as_ref(),
            logo: assets.logo.as_ref(),
        },
        &RenderOptions::screen(),
    );

    Ok(surface.into_image())
}
