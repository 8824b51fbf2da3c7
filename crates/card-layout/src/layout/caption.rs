//! Caption wrapping, placement and decoration geometry.

use crate::geometry::{Point, Rect};
use crate::model::{CodeConfig, FontSpec, LabelConfig, LabelWrap};
use crate::types::{Alignment, LabelOrientation, Rotation, TextBoxWidthMode, WrapMode};

/// Text measurement capability. Render surfaces provide it; any closure of
/// the right shape works too.
pub trait TextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, &FontSpec) -> f32,
{
    fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        self(text, font)
    }
}

/// Wrapped caption text. `overflow` records whether input remained beyond
/// `max_lines`, which is what decides ellipsis treatment.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    pub overflow: bool,
}

/// The caption block resolved into canonical space.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    pub lines: Vec<String>,
    /// Top-left of the text block.
    pub origin: Point,
    pub box_width: f32,
    pub line_height: f32,
    pub total_height: f32,
    /// When the caption is coupled to a rotated code: the rotation and the
    /// center to rotate around (the code's center, not the caption's own).
    pub rotation: Option<(Rotation, Point)>,
}

impl CaptionLayout {
    /// The rectangle tightly containing all text lines.
    pub fn text_rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.box_width,
            self.total_height,
        )
    }

    /// The filled background box: the text block expanded by padding.
    pub fn background_rect(&self, padding_pts: f32) -> Rect {
        self.text_rect().expand(padding_pts)
    }

    /// Top edge of line `index`.
    pub fn line_top(&self, index: usize) -> f32 {
        self.origin.y + index as f32 * self.line_height
    }
}

/// X position of a line within the box given its measured width.
pub fn aligned_line_x(align: Alignment, box_x: f32, box_width: f32, line_width: f32) -> f32 {
    match align {
        Alignment::Start => box_x,
        Alignment::Center => box_x + (box_width - line_width) / 2.0,
        Alignment::End => box_x + box_width - line_width,
    }
}

/// Greedy wrap. Tokens are space-separated words (`Word`) or single
/// characters (`Char`); a token only closes a line once the line is
/// non-empty, so an unsplittable token wider than the box is kept whole
/// rather than looping or vanishing.
pub fn wrap_text(
    text: &str,
    font: &FontSpec,
    max_width: f32,
    wrap: &LabelWrap,
    measure: &dyn TextMeasure,
) -> WrappedText {
    if wrap.mode == WrapMode::None {
        return WrappedText {
            lines: vec![text.to_string()],
            overflow: false,
        };
    }

    let max_lines = wrap.max_lines.max(1);
    let tokens: Vec<String> = match wrap.mode {
        WrapMode::Word => text.split(' ').map(str::to_string).collect(),
        WrapMode::Char => text.chars().map(String::from).collect(),
        WrapMode::None => unreachable!(),
    };
    let separator = if wrap.mode == WrapMode::Word { " " } else { "" };

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut overflow = false;

    for token in &tokens {
        let candidate = if current.is_empty() {
            token.clone()
        } else {
            format!("{current}{separator}{token}")
        };

        if measure.measure(&candidate, font) > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current = token.clone();
            if lines.len() >= max_lines {
                // Everything from this token on is dropped.
                overflow = true;
                current.clear();
                break;
            }
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        if lines.len() < max_lines {
            lines.push(current);
        } else {
            overflow = true;
        }
    }

    WrappedText { lines, overflow }
}

/// Shorten `line` character by character until `line + "..."` fits, falling
/// back to `"..."` alone.
pub fn truncate_with_ellipsis(
    line: &str,
    font: &FontSpec,
    max_width: f32,
    measure: &dyn TextMeasure,
) -> String {
    const ELLIPSIS: &str = "...";
    let mut truncated: Vec<char> = line.chars().collect();

    while !truncated.is_empty() {
        let candidate: String = truncated.iter().collect::<String>() + ELLIPSIS;
        if measure.measure(&candidate, font) <= max_width {
            return candidate;
        }
        truncated.pop();
    }

    ELLIPSIS.to_string()
}

/// Resolve the caption block for a code placed at `code_rect`. Returns
/// `None` when the label is disabled or the text is empty.
pub fn resolve_caption(
    code_rect: &Rect,
    code: &CodeConfig,
    label: &LabelConfig,
    text: &str,
    measure: &dyn TextMeasure,
) -> Option<CaptionLayout> {
    if !label.enabled || text.is_empty() {
        return None;
    }

    let box_width = match label.text_box_width_mode {
        TextBoxWidthMode::Custom => label.text_box_width_pts,
        TextBoxWidthMode::Auto => code.size_pts,
    };
    if box_width <= 0.0 {
        return None;
    }

    let wrapped = wrap_text(text, &label.font, box_width, &label.wrap, measure);
    let mut lines = wrapped.lines;
    if lines.is_empty() {
        return None;
    }
    if label.wrap.ellipsis && wrapped.overflow {
        let last = lines.len() - 1;
        lines[last] = truncate_with_ellipsis(&lines[last], &label.font, box_width, measure);
    }

    let line_height = label.font.size_pts * label.font.line_height;
    let total_height = lines.len() as f32 * line_height;

    let mut origin = match label.orientation {
        LabelOrientation::Bottom => Point::new(code_rect.x, code_rect.bottom() + label.gap_pts),
        LabelOrientation::Top => {
            Point::new(code_rect.x, code_rect.y - label.gap_pts - total_height)
        }
        LabelOrientation::Left => {
            Point::new(code_rect.x - label.gap_pts - box_width, code_rect.y)
        }
        LabelOrientation::Right => Point::new(code_rect.right() + label.gap_pts, code_rect.y),
    };
    origin = origin.offset(label.offset_x_pts, label.offset_y_pts);

    let rotation = if label.rotate_with_group && code.rotation != Rotation::None {
        Some((code.rotation, code_rect.center()))
    } else {
        None
    };

    Some(CaptionLayout {
        lines,
        origin,
        box_width,
        line_height,
        total_height,
        rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodeConfig, LabelConfig};

    // Fixed-advance measurer: 10pt per character, independent of the font.
    fn measure10(text: &str, _font: &FontSpec) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    fn wrap_cfg(mode: WrapMode, max_lines: usize, ellipsis: bool) -> LabelWrap {
        LabelWrap {
            mode,
            max_lines,
            ellipsis,
        }
    }

    #[test]
    fn test_word_wrap_packs_greedily() {
        let wrapped = wrap_text(
            "aa bb cc dd",
            &FontSpec::default(),
            59.0,
            &wrap_cfg(WrapMode::Word, 10, false),
            &measure10,
        );
        // "aa bb" measures 50, adding " cc" would reach 80.
        assert_eq!(wrapped.lines, vec!["aa bb", "cc dd"]);
        assert!(!wrapped.overflow);
    }

    #[test]
    fn test_wrapped_lines_fit_box() {
        let font = FontSpec::default();
        let wrap = wrap_cfg(WrapMode::Word, 100, false);
        for width in [30.0, 55.0, 90.0] {
            let wrapped = wrap_text("aa bb cc dd ee ff", &font, width, &wrap, &measure10);
            for line in &wrapped.lines {
                assert!(
                    measure10(line, &font) <= width,
                    "line {line:?} exceeds {width}"
                );
            }
        }
    }

    #[test]
    fn test_unsplittable_token_kept_whole() {
        let wrapped = wrap_text(
            "supercalifragilistic",
            &FontSpec::default(),
            50.0,
            &wrap_cfg(WrapMode::Word, 3, false),
            &measure10,
        );
        // Wider than the box, but never split or dropped.
        assert_eq!(wrapped.lines, vec!["supercalifragilistic"]);
    }

    #[test]
    fn test_char_wrap_splits_anywhere() {
        let wrapped = wrap_text(
            "abcdef",
            &FontSpec::default(),
            30.0,
            &wrap_cfg(WrapMode::Char, 10, false),
            &measure10,
        );
        assert_eq!(wrapped.lines, vec!["abc", "def"]);
    }

    #[test]
    fn test_none_mode_is_single_unmeasured_line() {
        let wrapped = wrap_text(
            "anything at all",
            &FontSpec::default(),
            1.0,
            &wrap_cfg(WrapMode::None, 1, true),
            &measure10,
        );
        assert_eq!(wrapped.lines, vec!["anything at all"]);
        assert!(!wrapped.overflow);
    }

    #[test]
    fn test_max_lines_sets_overflow() {
        let wrapped = wrap_text(
            "aa bb cc",
            &FontSpec::default(),
            20.0,
            &wrap_cfg(WrapMode::Word, 2, false),
            &measure10,
        );
        assert_eq!(wrapped.lines, vec!["aa", "bb"]);
        assert!(wrapped.overflow);
    }

    #[test]
    fn test_ellipsis_scenario_hello_world() {
        // Box fits "Hello" and "Hello..." but not "Hello World".
        let code = CodeConfig {
            size_pts: 80.0,
            ..Default::default()
        };
        let label = LabelConfig {
            wrap: wrap_cfg(WrapMode::Word, 1, true),
            ..Default::default()
        };
        let code_rect = Rect::new(0.0, 0.0, 80.0, 80.0);
        let caption =
            resolve_caption(&code_rect, &code, &label, "Hello World", &measure10).unwrap();
        assert_eq!(caption.lines, vec!["Hello..."]);
    }

    #[test]
    fn test_ellipsis_last_resort() {
        let font = FontSpec::default();
        // Nothing fits: even one character plus the ellipsis overflows.
        assert_eq!(
            truncate_with_ellipsis("word", &font, 25.0, &measure10),
            "..."
        );
    }

    #[test]
    fn test_orientation_bottom() {
        let code = CodeConfig {
            size_pts: 72.0,
            ..Default::default()
        };
        let mut label = LabelConfig::default();
        label.wrap = wrap_cfg(WrapMode::None, 1, false);
        label.gap_pts = 8.0;
        let code_rect = Rect::new(90.0, 36.0, 72.0, 72.0);
        let caption = resolve_caption(&code_rect, &code, &label, "id-1", &measure10).unwrap();
        assert_eq!(caption.origin, Point::new(90.0, 116.0));
        assert_eq!(caption.box_width, 72.0);
        assert!((caption.line_height - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_orientation_top_accounts_for_height() {
        let code = CodeConfig {
            size_pts: 72.0,
            ..Default::default()
        };
        let mut label = LabelConfig::default();
        label.orientation = LabelOrientation::Top;
        label.wrap = wrap_cfg(WrapMode::Char, 2, false);
        let code_rect = Rect::new(90.0, 36.0, 72.0, 72.0);
        // Two lines of 12pt: block top is 36 - 8 - 24 = 4.
        let caption = resolve_caption(&code_rect, &code, &label, "abcdefgha", &measure10).unwrap();
        assert_eq!(caption.lines.len(), 2);
        assert!((caption.origin.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_orientation_left_and_right_top_aligned() {
        let code = CodeConfig {
            size_pts: 72.0,
            ..Default::default()
        };
        let mut label = LabelConfig::default();
        label.wrap = wrap_cfg(WrapMode::None, 1, false);
        let code_rect = Rect::new(90.0, 36.0, 72.0, 72.0);

        label.orientation = LabelOrientation::Left;
        let left = resolve_caption(&code_rect, &code, &label, "x", &measure10).unwrap();
        assert_eq!(left.origin, Point::new(90.0 - 8.0 - 72.0, 36.0));

        label.orientation = LabelOrientation::Right;
        let right = resolve_caption(&code_rect, &code, &label, "x", &measure10).unwrap();
        assert_eq!(right.origin, Point::new(162.0 + 8.0, 36.0));
    }

    #[test]
    fn test_custom_box_width_and_offsets() {
        let code = CodeConfig {
            size_pts: 72.0,
            ..Default::default()
        };
        let mut label = LabelConfig::default();
        label.text_box_width_mode = TextBoxWidthMode::Custom;
        label.text_box_width_pts = 120.0;
        label.offset_x_pts = 3.0;
        label.offset_y_pts = -2.0;
        label.wrap = wrap_cfg(WrapMode::None, 1, false);
        let code_rect = Rect::new(0.0, 0.0, 72.0, 72.0);
        let caption = resolve_caption(&code_rect, &code, &label, "x", &measure10).unwrap();
        assert_eq!(caption.box_width, 120.0);
        assert_eq!(caption.origin, Point::new(3.0, 78.0));
    }

    #[test]
    fn test_rotation_couples_to_code_center() {
        let code = CodeConfig {
            size_pts: 72.0,
            rotation: Rotation::Clockwise90,
            ..Default::default()
        };
        let mut label = LabelConfig::default();
        label.rotate_with_group = true;
        label.wrap = wrap_cfg(WrapMode::None, 1, false);
        let code_rect = Rect::new(90.0, 36.0, 72.0, 72.0);
        let caption = resolve_caption(&code_rect, &code, &label, "x", &measure10).unwrap();
        assert_eq!(
            caption.rotation,
            Some((Rotation::Clockwise90, Point::new(126.0, 72.0)))
        );
    }

    #[test]
    fn test_disabled_or_empty_yields_none() {
        let code = CodeConfig::default();
        let code_rect = Rect::new(0.0, 0.0, 72.0, 72.0);
        let mut label = LabelConfig::default();
        assert!(resolve_caption(&code_rect, &code, &label, "", &measure10).is_none());
        label.enabled = false;
        assert!(resolve_caption(&code_rect, &code, &label, "text", &measure10).is_none());
    }

    #[test]
    fn test_alignment_positions() {
        assert_eq!(aligned_line_x(Alignment::Start, 10.0, 100.0, 40.0), 10.0);
        assert_eq!(aligned_line_x(Alignment::Center, 10.0, 100.0, 40.0), 40.0);
        assert_eq!(aligned_line_x(Alignment::End, 10.0, 100.0, 40.0), 70.0);
    }

    #[test]
    fn test_background_rect_expands_by_padding() {
        let caption = CaptionLayout {
            lines: vec!["x".into()],
            origin: Point::new(10.0, 20.0),
            box_width: 72.0,
            line_height: 12.0,
            total_height: 12.0,
            rotation: None,
        };
        let rect = caption.background_rect(4.0);
        assert_eq!(rect, Rect::new(6.0, 16.0, 80.0, 20.0));
    }
}
