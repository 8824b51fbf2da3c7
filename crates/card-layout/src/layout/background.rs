//! Background image placement.

use crate::geometry::Rect;
use crate::model::{BackgroundConfig, DocumentModel, MarginConfig, PageConfig};
use crate::types::{FitMode, OffsetAnchor, PlacementBounds, Rotation};

/// Resolved background placement: the drawn rectangle plus the rotation to
/// apply around its center at draw time. Rotation never changes the
/// rectangle itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBackground {
    pub rect: Rect,
    pub rotation: Rotation,
}

/// The rectangle a given `PlacementBounds` selector refers to. Disabled
/// margin categories contribute nothing.
pub fn placement_bounds_rect(
    bounds: PlacementBounds,
    page: &PageConfig,
    bleed: &MarginConfig,
    safe: &MarginConfig,
) -> Rect {
    let full = Rect::new(0.0, 0.0, page.width_pts, page.height_pts);
    match bounds {
        PlacementBounds::BleedArea => full,
        PlacementBounds::Canvas => full.inset(&bleed.effective_insets()),
        PlacementBounds::SafeArea => full
            .inset(&bleed.effective_insets())
            .inset(&safe.effective_insets()),
    }
}

/// Compute the drawn rectangle for the background image, or `None` when the
/// configuration leaves nothing to draw.
pub fn resolve_background(
    doc: &DocumentModel,
    image_width: f32,
    image_height: f32,
) -> Option<ResolvedBackground> {
    let cfg = &doc.base_image;
    if image_width <= 0.0 || image_height <= 0.0 {
        return None;
    }

    let bounds = placement_bounds_rect(cfg.placement_bounds, &doc.page, &doc.bleed, &doc.safe);
    let content = bounds.inset(&cfg.extra_padding_pts);
    if content.is_degenerate() {
        log::warn!(
            "Background content rectangle is degenerate ({} x {}), skipping",
            content.width,
            content.height
        );
        return None;
    }

    let (draw_width, draw_height) = fitted_dimensions(cfg, &content, image_width, image_height);
    if draw_width <= 0.0 || draw_height <= 0.0 {
        return None;
    }

    // Base position centers the fitted rectangle in the content rectangle.
    let mut x = content.x + (content.width - draw_width) / 2.0;
    let mut y = content.y + (content.height - draw_height) / 2.0;

    match cfg.offset_anchor {
        OffsetAnchor::Corner => {
            // Absolute from the content origin; the centered base is discarded.
            x = content.x + cfg.offset_x_pts;
            y = content.y + cfg.offset_y_pts;
        }
        OffsetAnchor::Center => {
            x += cfg.offset_x_pts;
            y += cfg.offset_y_pts;
        }
    }

    Some(ResolvedBackground {
        rect: Rect::new(x, y, draw_width, draw_height),
        rotation: cfg.rotation,
    })
}

fn fitted_dimensions(
    cfg: &BackgroundConfig,
    content: &Rect,
    image_width: f32,
    image_height: f32,
) -> (f32, f32) {
    let img_ratio = image_width / image_height;
    let area_ratio = content.width / content.height;

    match cfg.fit_mode {
        FitMode::Contain => {
            if img_ratio > area_ratio {
                (content.width, content.width / img_ratio)
            } else {
                (content.height * img_ratio, content.height)
            }
        }
        FitMode::Cover => {
            // Overflow past the content rectangle is expected; clipping (if
            // any) is the caller's concern.
            if img_ratio > area_ratio {
                (content.height * img_ratio, content.height)
            } else {
                (content.width, content.width / img_ratio)
            }
        }
        FitMode::FillWidth => {
            let height = if cfg.lock_aspect_ratio {
                content.width / img_ratio
            } else {
                content.height
            };
            (content.width, height)
        }
        FitMode::FillHeight => {
            let width = if cfg.lock_aspect_ratio {
                content.height * img_ratio
            } else {
                content.width
            };
            (width, content.height)
        }
        FitMode::Stretch => (content.width, content.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentModel;

    fn doc_with_bleed(bleed_pts: f32) -> DocumentModel {
        let mut doc = DocumentModel::with_defaults();
        doc.bleed = MarginConfig::uniform(bleed_pts);
        doc.safe = MarginConfig::uniform(0.0);
        doc.base_image.extra_padding_pts = crate::geometry::EdgeInsets::default();
        doc
    }

    #[test]
    fn test_canvas_bounds_inset_by_bleed() {
        // 252 x 144 page with 10pt bleed on every edge: the content rectangle
        // before padding runs from (10, 10) to (242, 134).
        let doc = doc_with_bleed(10.0);
        let bounds =
            placement_bounds_rect(PlacementBounds::Canvas, &doc.page, &doc.bleed, &doc.safe);
        assert_eq!(bounds, Rect::new(10.0, 10.0, 232.0, 124.0));
        assert_eq!(bounds.right(), 242.0);
        assert_eq!(bounds.bottom(), 134.0);
    }

    #[test]
    fn test_bleed_area_is_full_page() {
        let doc = doc_with_bleed(10.0);
        let bounds =
            placement_bounds_rect(PlacementBounds::BleedArea, &doc.page, &doc.bleed, &doc.safe);
        assert_eq!(bounds, Rect::new(0.0, 0.0, 252.0, 144.0));
    }

    #[test]
    fn test_disabled_margin_does_not_inset() {
        let mut doc = doc_with_bleed(10.0);
        doc.bleed.enabled = false;
        let bounds =
            placement_bounds_rect(PlacementBounds::Canvas, &doc.page, &doc.bleed, &doc.safe);
        assert_eq!(bounds, Rect::new(0.0, 0.0, 252.0, 144.0));
    }

    #[test]
    fn test_safe_area_stacks_both_insets() {
        let mut doc = doc_with_bleed(10.0);
        doc.safe = MarginConfig::uniform(5.0);
        let bounds =
            placement_bounds_rect(PlacementBounds::SafeArea, &doc.page, &doc.bleed, &doc.safe);
        assert_eq!(bounds, Rect::new(15.0, 15.0, 222.0, 114.0));
    }

    #[test]
    fn test_contain_fits_wide_image() {
        let mut doc = doc_with_bleed(0.0);
        doc.base_image.placement_bounds = PlacementBounds::BleedArea;
        doc.base_image.fit_mode = FitMode::Contain;
        // 2:1 image into a 252 x 144 page: width-limited.
        let bg = resolve_background(&doc, 200.0, 100.0).unwrap();
        assert_eq!(bg.rect.width, 252.0);
        assert_eq!(bg.rect.height, 126.0);
        // centered vertically
        assert_eq!(bg.rect.y, 9.0);
    }

    #[test]
    fn test_cover_overflows_content() {
        let mut doc = doc_with_bleed(0.0);
        doc.base_image.placement_bounds = PlacementBounds::BleedArea;
        doc.base_image.fit_mode = FitMode::Cover;
        let bg = resolve_background(&doc, 100.0, 100.0).unwrap();
        // Square image covering a 252 x 144 page: width-limited, overflows
        // vertically.
        assert_eq!(bg.rect.width, 252.0);
        assert_eq!(bg.rect.height, 252.0);
        assert!(bg.rect.y < 0.0);
    }

    #[test]
    fn test_fill_width_respects_aspect_lock() {
        let mut doc = doc_with_bleed(0.0);
        doc.base_image.placement_bounds = PlacementBounds::BleedArea;
        doc.base_image.fit_mode = FitMode::FillWidth;
        doc.base_image.lock_aspect_ratio = true;
        let locked = resolve_background(&doc, 100.0, 100.0).unwrap();
        assert_eq!(locked.rect.height, 252.0);

        doc.base_image.lock_aspect_ratio = false;
        let free = resolve_background(&doc, 100.0, 100.0).unwrap();
        assert_eq!(free.rect.height, 144.0);
    }

    #[test]
    fn test_stretch_ignores_aspect() {
        let mut doc = doc_with_bleed(0.0);
        doc.base_image.placement_bounds = PlacementBounds::BleedArea;
        doc.base_image.fit_mode = FitMode::Stretch;
        let bg = resolve_background(&doc, 7.0, 1000.0).unwrap();
        assert_eq!(bg.rect, Rect::new(0.0, 0.0, 252.0, 144.0));
    }

    #[test]
    fn test_corner_offset_discards_centering() {
        let mut doc = doc_with_bleed(10.0);
        doc.base_image.fit_mode = FitMode::Stretch;
        doc.base_image.offset_anchor = OffsetAnchor::Corner;
        doc.base_image.offset_x_pts = 3.0;
        doc.base_image.offset_y_pts = 7.0;
        let bg = resolve_background(&doc, 50.0, 50.0).unwrap();
        assert_eq!(bg.rect.x, 13.0);
        assert_eq!(bg.rect.y, 17.0);
    }

    #[test]
    fn test_center_offset_shifts_centered_base() {
        let mut doc = doc_with_bleed(0.0);
        doc.base_image.placement_bounds = PlacementBounds::BleedArea;
        doc.base_image.fit_mode = FitMode::Stretch;
        doc.base_image.offset_x_pts = -4.0;
        doc.base_image.offset_y_pts = 2.0;
        let bg = resolve_background(&doc, 50.0, 50.0).unwrap();
        assert_eq!(bg.rect.x, -4.0);
        assert_eq!(bg.rect.y, 2.0);
    }

    #[test]
    fn test_excessive_padding_yields_none() {
        let mut doc = doc_with_bleed(0.0);
        doc.base_image.extra_padding_pts = crate::geometry::EdgeInsets::uniform(200.0);
        assert!(resolve_background(&doc, 100.0, 100.0).is_none());
    }

    #[test]
    fn test_zero_size_image_yields_none() {
        let doc = doc_with_bleed(0.0);
        assert!(resolve_background(&doc, 0.0, 100.0).is_none());
    }

    #[test]
    fn test_resolver_is_pure() {
        let mut doc = doc_with_bleed(5.0);
        doc.base_image.fit_mode = FitMode::Cover;
        doc.base_image.offset_x_pts = 1.5;
        let a = resolve_background(&doc, 640.0, 480.0);
        let b = resolve_background(&doc, 640.0, 480.0);
        assert_eq!(a, b);
    }
}
