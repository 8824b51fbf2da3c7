//! Bleed and safe-margin guide bands.
//!
//! Up to eight non-overlapping rectangles: four bleed bands between the page
//! edge and the trim line, four safe bands between the trim line and the
//! safe line. Purely advisory — nothing else reads them.

use crate::geometry::Rect;
use crate::model::{MarginConfig, PageConfig};
use crate::types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
    Bleed,
    Safe,
}

impl BandKind {
    /// Translucent guide color for this band category.
    pub fn color(self) -> Color {
        match self {
            BandKind::Bleed => Color::rgba(1.0, 0.0, 0.0, 0.15),
            BandKind::Safe => Color::rgba(0.0, 0.4, 1.0, 0.15),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub kind: BandKind,
    pub rect: Rect,
}

/// Compute the guide bands for a page. Bands with a zero edge distance and
/// categories with `enabled == false` are omitted.
pub fn overlay_bands(page: &PageConfig, bleed: &MarginConfig, safe: &MarginConfig) -> Vec<Band> {
    let mut bands = Vec::with_capacity(8);

    let b = bleed.effective_insets();
    let trim_left = b.left;
    let trim_top = b.top;
    let trim_right = page.width_pts - b.right;
    let trim_bottom = page.height_pts - b.bottom;
    let trim_width = trim_right - trim_left;
    let trim_height = trim_bottom - trim_top;

    if bleed.enabled {
        if b.top > 0.0 {
            bands.push(Band {
                kind: BandKind::Bleed,
                rect: Rect::new(0.0, 0.0, page.width_pts, b.top),
            });
        }
        if b.bottom > 0.0 {
            bands.push(Band {
                kind: BandKind::Bleed,
                rect: Rect::new(0.0, trim_bottom, page.width_pts, b.bottom),
            });
        }
        if b.left > 0.0 && trim_height > 0.0 {
            bands.push(Band {
                kind: BandKind::Bleed,
                rect: Rect::new(0.0, trim_top, b.left, trim_height),
            });
        }
        if b.right > 0.0 && trim_height > 0.0 {
            bands.push(Band {
                kind: BandKind::Bleed,
                rect: Rect::new(trim_right, trim_top, b.right, trim_height),
            });
        }
    }

    if safe.enabled && trim_width > 0.0 && trim_height > 0.0 {
        let s = safe.effective_insets();
        let safe_top = trim_top + s.top;
        let safe_right = trim_right - s.right;
        let safe_bottom = trim_bottom - s.bottom;
        let safe_height = safe_bottom - safe_top;

        if s.top > 0.0 {
            bands.push(Band {
                kind: BandKind::Safe,
                rect: Rect::new(trim_left, trim_top, trim_width, s.top),
            });
        }
        if s.bottom > 0.0 {
            bands.push(Band {
                kind: BandKind::Safe,
                rect: Rect::new(trim_left, safe_bottom, trim_width, s.bottom),
            });
        }
        if s.left > 0.0 && safe_height > 0.0 {
            bands.push(Band {
                kind: BandKind::Safe,
                rect: Rect::new(trim_left, safe_top, s.left, safe_height),
            });
        }
        if s.right > 0.0 && safe_height > 0.0 {
            bands.push(Band {
                kind: BandKind::Safe,
                rect: Rect::new(safe_right, safe_top, s.right, safe_height),
            });
        }
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentModel;

    fn page_252x144() -> PageConfig {
        DocumentModel::with_defaults().page
    }

    #[test]
    fn test_full_configuration_yields_eight_bands() {
        let page = page_252x144();
        let bleed = MarginConfig::uniform(10.0);
        let safe = MarginConfig::uniform(5.0);
        let bands = overlay_bands(&page, &bleed, &safe);
        assert_eq!(bands.len(), 8);
        assert_eq!(
            bands.iter().filter(|b| b.kind == BandKind::Bleed).count(),
            4
        );
    }

    #[test]
    fn test_bleed_band_geometry() {
        let page = page_252x144();
        let bleed = MarginConfig::uniform(10.0);
        let safe = MarginConfig::disabled();
        let bands = overlay_bands(&page, &bleed, &safe);
        assert_eq!(bands.len(), 4);
        // top band spans the full page width
        assert_eq!(bands[0].rect, Rect::new(0.0, 0.0, 252.0, 10.0));
        // left band sits between the trim lines
        assert_eq!(bands[2].rect, Rect::new(0.0, 10.0, 10.0, 124.0));
    }

    #[test]
    fn test_safe_bands_sit_inside_trim() {
        let page = page_252x144();
        let bleed = MarginConfig::uniform(10.0);
        let safe = MarginConfig::uniform(5.0);
        let bands = overlay_bands(&page, &bleed, &safe);
        let safe_top = bands
            .iter()
            .find(|b| b.kind == BandKind::Safe)
            .expect("safe band present");
        assert_eq!(safe_top.rect, Rect::new(10.0, 10.0, 232.0, 5.0));
    }

    #[test]
    fn test_zero_edges_are_omitted() {
        let page = page_252x144();
        let mut bleed = MarginConfig::uniform(10.0);
        bleed.linked = false;
        bleed.top_pts = 0.0;
        let bands = overlay_bands(&page, &bleed, &MarginConfig::disabled());
        assert_eq!(bands.len(), 3);
    }

    #[test]
    fn test_disabled_categories_yield_nothing() {
        let page = page_252x144();
        let bands = overlay_bands(&page, &MarginConfig::disabled(), &MarginConfig::disabled());
        assert!(bands.is_empty());
    }

    #[test]
    fn test_bands_do_not_overlap() {
        let page = page_252x144();
        let bleed = MarginConfig::uniform(10.0);
        let safe = MarginConfig::uniform(5.0);
        let bands = overlay_bands(&page, &bleed, &safe);
        for (i, a) in bands.iter().enumerate() {
            for b in &bands[i + 1..] {
                let overlap_x = a.rect.x < b.rect.right() && b.rect.x < a.rect.right();
                let overlap_y = a.rect.y < b.rect.bottom() && b.rect.y < a.rect.bottom();
                assert!(
                    !(overlap_x && overlap_y),
                    "bands overlap: {a:?} vs {b:?}"
                );
            }
        }
    }
}
