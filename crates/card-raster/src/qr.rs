//! QR code rasterization.

use crate::types::{RasterError, Result};
use card_layout::{CodeConfig, CornerStyle, EccLevel, ModulePattern};
use image::{Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};

/// Rasterize the code for one payload at `pixels_per_pt` resolution.
///
/// The output is square, `size_pts * pixels_per_pt` pixels on a side, with
/// the configured quiet zone baked in. When the logo overlay is enabled,
/// modules whose centers fall inside the centered reservation square are
/// left blank so the logo never obscures live data.
pub fn render_code_raster(
    payload: &str,
    cfg: &CodeConfig,
    pixels_per_pt: f32,
) -> Result<RgbaImage> {
    if payload.is_empty() {
        return Err(RasterError::Config("Empty code payload".to_string()));
    }
    let size_px = (cfg.size_pts * pixels_per_pt).round() as i64;
    if size_px < 1 {
        return Err(RasterError::Config(format!(
            "Code raster size must be at least one pixel, got {size_px}"
        )));
    }
    let size_px = size_px as u32;

    let code = QrCode::with_error_correction_level(payload, ec_level(cfg.style.ecc))?;
    let modules = code.width() as u32;

    // The quiet zone may never squeeze the data below one pixel per module.
    let requested_quiet = (cfg.style.quiet_zone_pts * pixels_per_pt).round().max(0.0) as u32;
    let quiet_px = requested_quiet.min(size_px.saturating_sub(modules) / 2);
    if quiet_px < requested_quiet {
        log::debug!(
            "Quiet zone clamped from {requested_quiet}px to {quiet_px}px to keep modules visible"
        );
    }
    let content_px = size_px - 2 * quiet_px;
    let module_px = content_px as f32 / modules as f32;

    let background = if cfg.style.transparent_bg {
        Rgba([0, 0, 0, 0])
    } else {
        Rgba(cfg.style.bg_color.to_rgba8())
    };
    let foreground = Rgba(cfg.style.fg_color.to_rgba8());

    let mut img = RgbaImage::from_pixel(size_px, size_px, background);

    let reserved_half = if cfg.logo.enabled {
        size_px as f32 * cfg.logo.size_pct / 100.0 / 2.0
    } else {
        0.0
    };
    let center = size_px as f32 / 2.0;

    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx as usize, qy as usize)] != qrcode::Color::Dark {
                continue;
            }

            let module_center_x = quiet_px as f32 + (qx as f32 + 0.5) * module_px;
            let module_center_y = quiet_px as f32 + (qy as f32 + 0.5) * module_px;
            if reserved_half > 0.0
                && (module_center_x - center).abs() < reserved_half
                && (module_center_y - center).abs() < reserved_half
            {
                continue;
            }

            let shape = if in_finder(qx, qy, modules) {
                finder_shape(cfg.style.corners)
            } else {
                cfg.style.pattern
            };
            paint_module(&mut img, quiet_px, module_px, qx, qy, shape, foreground);
        }
    }

    Ok(img)
}

fn ec_level(ecc: EccLevel) -> EcLevel {
    match ecc {
        EccLevel::L => EcLevel::L,
        EccLevel::M => EcLevel::M,
        EccLevel::Q => EcLevel::Q,
        EccLevel::H => EcLevel::H,
    }
}

/// The three 7x7 finder patterns sit in the top-left, top-right and
/// bottom-left corners of the module grid.
fn in_finder(qx: u32, qy: u32, modules: u32) -> bool {
    let near_start = |v: u32| v < 7;
    let near_end = |v: u32| v + 7 >= modules;
    (near_start(qx) && near_start(qy))
        || (near_end(qx) && near_start(qy))
        || (near_start(qx) && near_end(qy))
}

fn finder_shape(corners: CornerStyle) -> ModulePattern {
    match corners {
        CornerStyle::Square => ModulePattern::Square,
        CornerStyle::Rounded => ModulePattern::Rounded,
    }
}

fn paint_module(
    img: &mut RgbaImage,
    quiet_px: u32,
    module_px: f32,
    qx: u32,
    qy: u32,
    shape: ModulePattern,
    color: Rgba<u8>,
) {
    let x0 = quiet_px as f32 + qx as f32 * module_px;
    let y0 = quiet_px as f32 + qy as f32 * module_px;
    let x1 = x0 + module_px;
    let y1 = y0 + module_px;

    let px0 = x0.floor().max(0.0) as u32;
    let py0 = y0.floor().max(0.0) as u32;
    let px1 = (x1.ceil() as u32).min(img.width());
    let py1 = (y1.ceil() as u32).min(img.height());

    let cx = x0 + module_px / 2.0;
    let cy = y0 + module_px / 2.0;

    for py in py0..py1 {
        for px in px0..px1 {
            let sx = px as f32 + 0.5;
            let sy = py as f32 + 0.5;
            if sx < x0 || sx >= x1 || sy < y0 || sy >= y1 {
                continue;
            }
            let inside = match shape {
                ModulePattern::Square => true,
                ModulePattern::Dots => {
                    let r = module_px / 2.0 * 0.95;
                    let dx = sx - cx;
                    let dy = sy - cy;
                    dx * dx + dy * dy <= r * r
                }
                ModulePattern::Rounded => {
                    in_rounded_square(sx, sy, x0, y0, module_px, module_px * 0.3)
                }
            };
            if inside {
                img.put_pixel(px, py, color);
            }
        }
    }
}

fn in_rounded_square(sx: f32, sy: f32, x0: f32, y0: f32, size: f32, radius: f32) -> bool {
    let x1 = x0 + size;
    let y1 = y0 + size;
    let inner_x = sx >= x0 + radius && sx <= x1 - radius;
    let inner_y = sy >= y0 + radius && sy <= y1 - radius;
    if inner_x || inner_y {
        return true;
    }
    // corner discs
    let nearest_cx = if sx < x0 + radius { x0 + radius } else { x1 - radius };
    let nearest_cy = if sy < y0 + radius { y0 + radius } else { y1 - radius };
    let dx = sx - nearest_cx;
    let dy = sy - nearest_cy;
    dx * dx + dy * dy <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_layout::{CodeConfig, Color};

    fn cfg(size_pts: f32) -> CodeConfig {
        CodeConfig {
            size_pts,
            ..Default::default()
        }
    }

    #[test]
    fn test_raster_dimensions_follow_scale() {
        let img = render_code_raster("https://example.com", &cfg(72.0), 2.0).unwrap();
        assert_eq!(img.dimensions(), (144, 144));
    }

    #[test]
    fn test_raster_is_deterministic() {
        let a = render_code_raster("https://example.com/x", &cfg(72.0), 4.0).unwrap();
        let b = render_code_raster("https://example.com/x", &cfg(72.0), 4.0).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_quiet_zone_is_background() {
        let mut config = cfg(72.0);
        config.style.quiet_zone_pts = 6.0;
        let img = render_code_raster("https://example.com", &config, 2.0).unwrap();
        let bg = Rgba(Color::WHITE.to_rgba8());
        // 6pt at 2 px/pt = 12px of quiet zone on every edge
        for i in 0..img.width() {
            assert_eq!(img.get_pixel(i, 0), &bg);
            assert_eq!(img.get_pixel(i, 5), &bg);
            assert_eq!(img.get_pixel(0, i), &bg);
        }
    }

    #[test]
    fn test_transparent_background() {
        let mut config = cfg(72.0);
        config.style.transparent_bg = true;
        let img = render_code_raster("https://example.com", &config, 2.0).unwrap();
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_logo_reservation_clears_center() {
        let mut config = cfg(72.0);
        config.logo.enabled = true;
        config.logo.size_pct = 30.0;
        let img = render_code_raster("https://example.com/logo", &config, 4.0).unwrap();

        let size = img.width() as f32;
        let half = size * 0.30 / 2.0;
        let center = size / 2.0;
        let fg = Rgba(Color::BLACK.to_rgba8());
        // Give the scan a one-module safety border: module centers decide
        // reservation, so only probe well inside the square.
        let inset = half * 0.5;
        let lo = (center - inset) as u32;
        let hi = (center + inset) as u32;
        for y in lo..hi {
            for x in lo..hi {
                assert_ne!(img.get_pixel(x, y), &fg, "dark pixel at ({x},{y})");
            }
        }
    }

    #[test]
    fn test_empty_payload_is_an_error() {
        assert!(render_code_raster("", &cfg(72.0), 2.0).is_err());
    }

    #[test]
    fn test_dot_pattern_produces_fewer_dark_pixels() {
        let square = render_code_raster("https://example.com", &cfg(72.0), 4.0).unwrap();
        let mut config = cfg(72.0);
        config.style.pattern = ModulePattern::Dots;
        let dots = render_code_raster("https://example.com", &config, 4.0).unwrap();

        let dark = |img: &RgbaImage| {
            img.pixels()
                .filter(|p| p.0 == Color::BLACK.to_rgba8())
                .count()
        };
        assert!(dark(&dots) < dark(&square));
    }
}
