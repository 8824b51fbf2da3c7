//! Page size presets for common card, label and tag stock.

use crate::units::{POINTS_PER_INCH, POINTS_PER_MM};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub width_pts: f32,
    pub height_pts: f32,
}

pub const DEFAULT_PRESET_ID: &str = "business-us";

pub const PAGE_PRESETS: &[PagePreset] = &[
    PagePreset {
        id: "business-us",
        name: "Business Card (US) - 3.5\" x 2\"",
        width_pts: 3.5 * POINTS_PER_INCH,
        height_pts: 2.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "business-eu",
        name: "Business Card (EU) - 85mm x 55mm",
        width_pts: 85.0 * POINTS_PER_MM,
        height_pts: 55.0 * POINTS_PER_MM,
    },
    PagePreset {
        id: "label-square-2",
        name: "Square Label - 2\" x 2\"",
        width_pts: 2.0 * POINTS_PER_INCH,
        height_pts: 2.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "label-square-3",
        name: "Square Label - 3\" x 3\"",
        width_pts: 3.0 * POINTS_PER_INCH,
        height_pts: 3.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "label-rect-4x2",
        name: "Rectangle Label - 4\" x 2\"",
        width_pts: 4.0 * POINTS_PER_INCH,
        height_pts: 2.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "label-avery-5160",
        name: "Avery 5160 Label - 2.625\" x 1\"",
        width_pts: 2.625 * POINTS_PER_INCH,
        height_pts: 1.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "badge-3x4",
        name: "Name Badge - 3\" x 4\"",
        width_pts: 3.0 * POINTS_PER_INCH,
        height_pts: 4.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "badge-4x3",
        name: "Name Badge (Landscape) - 4\" x 3\"",
        width_pts: 4.0 * POINTS_PER_INCH,
        height_pts: 3.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "playing-poker",
        name: "Playing Card (Poker) - 2.5\" x 3.5\"",
        width_pts: 2.5 * POINTS_PER_INCH,
        height_pts: 3.5 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "postcard-us",
        name: "Postcard (US) - 6\" x 4\"",
        width_pts: 6.0 * POINTS_PER_INCH,
        height_pts: 4.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "postcard-a6",
        name: "Postcard (A6) - 148mm x 105mm",
        width_pts: 148.0 * POINTS_PER_MM,
        height_pts: 105.0 * POINTS_PER_MM,
    },
    PagePreset {
        id: "ticket-standard",
        name: "Event Ticket - 5.5\" x 2\"",
        width_pts: 5.5 * POINTS_PER_INCH,
        height_pts: 2.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "bookmark",
        name: "Bookmark - 2\" x 6\"",
        width_pts: 2.0 * POINTS_PER_INCH,
        height_pts: 6.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "hang-tag-small",
        name: "Hang Tag (Small) - 2\" x 3\"",
        width_pts: 2.0 * POINTS_PER_INCH,
        height_pts: 3.0 * POINTS_PER_INCH,
    },
    PagePreset {
        id: "custom",
        name: "Custom Size",
        width_pts: 3.5 * POINTS_PER_INCH,
        height_pts: 2.0 * POINTS_PER_INCH,
    },
];

pub fn find_preset(id: &str) -> Option<&'static PagePreset> {
    PAGE_PRESETS.iter().find(|p| p.id == id)
}

pub fn default_preset() -> &'static PagePreset {
    &PAGE_PRESETS[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_lookup() {
        let preset = find_preset(DEFAULT_PRESET_ID).unwrap();
        assert_eq!(preset.width_pts, 252.0);
        assert_eq!(preset.height_pts, 144.0);
        assert_eq!(default_preset().id, DEFAULT_PRESET_ID);
    }

    #[test]
    fn test_preset_ids_are_unique() {
        for (i, a) in PAGE_PRESETS.iter().enumerate() {
            for b in &PAGE_PRESETS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_all_presets_have_positive_dimensions() {
        for preset in PAGE_PRESETS {
            assert!(preset.width_pts > 0.0 && preset.height_pts > 0.0, "{}", preset.id);
        }
    }
}
