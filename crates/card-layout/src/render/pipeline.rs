//! The ordered draw pipeline shared by both targets.

use crate::geometry::{Point, Rect, aspect_fit};
use crate::layout::{aligned_line_x, overlay_bands, resolve_background, resolve_caption, resolve_code};
use crate::model::{DataRow, DocumentModel};
use crate::render::RenderSurface;
use crate::types::{Color, Rotation};
use image::RgbaImage;

/// Decoded assets handed to one render invocation. The pipeline never
/// decodes or generates pixels itself.
#[derive(Default)]
pub struct RenderAssets<'a> {
    pub base_image: Option<&'a RgbaImage>,
    /// The scannable code for the current row, already rasterized.
    pub code_raster: Option<&'a RgbaImage>,
    pub logo: Option<&'a RgbaImage>,
}

/// Cosmetic layers. The checkerboard and guide overlays exist on screen
/// only; the print target never draws them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub checkerboard: bool,
    pub overlays: bool,
}

impl RenderOptions {
    pub fn screen() -> Self {
        Self {
            checkerboard: true,
            overlays: true,
        }
    }

    pub fn print() -> Self {
        Self {
            checkerboard: false,
            overlays: false,
        }
    }
}

const CHECKER_SIZE_PTS: f32 = 10.0;

/// Render one card. Degenerate or missing elements are skipped; the
/// pipeline always finishes the remaining layers.
pub fn render_card<S: RenderSurface>(
    surface: &mut S,
    doc: &DocumentModel,
    row: Option<&DataRow>,
    assets: &RenderAssets<'_>,
    opts: &RenderOptions,
) {
    if opts.checkerboard {
        draw_checkerboard(surface, doc);
    }

    if let Some(image) = assets.base_image {
        match resolve_background(doc, image.width() as f32, image.height() as f32) {
            Some(bg) => {
                let rotated = bg.rotation != Rotation::None;
                if rotated {
                    surface.push_rotation(bg.rotation, bg.rect.center());
                }
                surface.draw_image(image, bg.rect);
                if rotated {
                    surface.pop_rotation();
                }
            }
            None => log::warn!("Background image resolved to nothing, skipping"),
        }
    }

    let row = match row {
        Some(row) if row.is_valid() => Some(row),
        Some(row) => {
            log::warn!("Row {} has validation errors, not rendering it", row.index);
            None
        }
        None => None,
    };

    if let Some(row) = row {
        let code_rect = resolve_code(doc.page.width_pts, doc.page.height_pts, &doc.code);
        if !code_rect.is_degenerate() {
            let rotated = doc.code.rotation != Rotation::None;
            if rotated {
                surface.push_rotation(doc.code.rotation, code_rect.center());
            }

            if let Some(raster) = assets.code_raster {
                if !doc.code.style.transparent_bg {
                    surface.fill_rect(code_rect, doc.code.style.bg_color, 0.0);
                }
                surface.draw_image(raster, code_rect);
            }

            if doc.code.logo.enabled {
                draw_logo(surface, doc, &code_rect, assets.logo);
            }

            if rotated {
                surface.pop_rotation();
            }
        }

        if !row.label.is_empty() {
            draw_caption(surface, doc, &code_rect, &row.label);
        }
    }

    if opts.overlays && doc.overlays.show {
        for band in overlay_bands(&doc.page, &doc.bleed, &doc.safe) {
            surface.fill_rect(band.rect, band.kind.color(), 0.0);
        }
    }
}

fn draw_checkerboard<S: RenderSurface>(surface: &mut S, doc: &DocumentModel) {
    let light = Color::rgb(224.0 / 255.0, 224.0 / 255.0, 224.0 / 255.0);
    let mut row = 0usize;
    let mut y = 0.0;
    while y < doc.page.height_pts {
        let mut col = 0usize;
        let mut x = 0.0;
        while x < doc.page.width_pts {
            let color = if (row + col) % 2 == 0 {
                light
            } else {
                Color::WHITE
            };
            let width = CHECKER_SIZE_PTS.min(doc.page.width_pts - x);
            let height = CHECKER_SIZE_PTS.min(doc.page.height_pts - y);
            surface.fill_rect(Rect::new(x, y, width, height), color, 0.0);
            x += CHECKER_SIZE_PTS;
            col += 1;
        }
        y += CHECKER_SIZE_PTS;
        row += 1;
    }
}

fn draw_logo<S: RenderSurface>(
    surface: &mut S,
    doc: &DocumentModel,
    code_rect: &Rect,
    logo: Option<&RgbaImage>,
) {
    let logo_cfg = &doc.code.logo;
    let logo_size = doc.code.size_pts * logo_cfg.size_pct / 100.0;
    if logo_size <= 0.0 {
        return;
    }
    let logo_rect = Rect::new(
        code_rect.x + (code_rect.width - logo_size) / 2.0,
        code_rect.y + (code_rect.height - logo_size) / 2.0,
        logo_size,
        logo_size,
    );

    if logo_cfg.backing_enabled {
        surface.fill_rect(logo_rect, logo_cfg.backing_color, logo_cfg.backing_radius_pts);
    }

    let Some(image) = logo else {
        return;
    };
    let fitted = aspect_fit(image.width() as f32, image.height() as f32, logo_rect);
    if fitted.is_degenerate() {
        log::warn!("Logo image resolved to nothing, skipping");
        return;
    }
    surface.draw_image(image, fitted);
}

fn draw_caption<S: RenderSurface>(
    surface: &mut S,
    doc: &DocumentModel,
    code_rect: &Rect,
    text: &str,
) {
    let caption = {
        let measure = |t: &str, f: &crate::model::FontSpec| surface.measure_text(t, f);
        resolve_caption(code_rect, &doc.code, &doc.label, text, &measure)
    };
    let Some(caption) = caption else {
        return;
    };

    if let Some((rotation, center)) = caption.rotation {
        surface.push_rotation(rotation, center);
    }

    let label = &doc.label;
    if label.background.enabled {
        surface.fill_rect(
            caption.background_rect(label.background.padding_pts),
            label.background.color,
            label.background.radius_pts,
        );
    }

    for (i, line) in caption.lines.iter().enumerate() {
        let line_width = surface.measure_text(line, &label.font);
        let x = aligned_line_x(label.align, caption.origin.x, caption.box_width, line_width);
        let origin = Point::new(x, caption.line_top(i));

        if label.outline.enabled {
            surface.stroke_text(
                line,
                origin,
                &label.font,
                label.outline.color,
                label.outline.width_pts,
            );
        }
        surface.draw_text(line, origin, &label.font);
    }

    if caption.rotation.is_some() {
        surface.pop_rotation();
    }
}
