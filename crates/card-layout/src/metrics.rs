//! Approximate metrics for the base-14 font families.
//!
//! Both render targets delegate text measurement here so that wrapping and
//! alignment come out identical on screen and in print. Widths use a
//! per-family average character ratio; ascents come from the standard AFM
//! ascender values, so the baseline offset is derived rather than tuned.

use crate::model::{FontFamily, FontSpec, FontWeight};

/// Average glyph advance as a fraction of the font size.
pub fn char_width_ratio(family: FontFamily, weight: FontWeight) -> f32 {
    match (family, weight) {
        (FontFamily::Helvetica, FontWeight::Regular) => 0.5,
        (FontFamily::Helvetica, FontWeight::Bold) => 0.55,
        (FontFamily::TimesRoman, FontWeight::Regular) => 0.48,
        (FontFamily::TimesRoman, FontWeight::Bold) => 0.52,
        // Courier is monospaced at exactly 600/1000.
        (FontFamily::Courier, _) => 0.6,
    }
}

/// Ascender height as a fraction of the font size (AFM ascender / 1000).
pub fn ascent_ratio(family: FontFamily) -> f32 {
    match family {
        FontFamily::Helvetica => 0.718,
        FontFamily::TimesRoman => 0.683,
        FontFamily::Courier => 0.629,
    }
}

/// Distance from the top of the line box to the baseline.
pub fn baseline_offset(font: &FontSpec) -> f32 {
    font.size_pts * ascent_ratio(font.family)
}

/// Measured width of a run of text, letter spacing included.
pub fn measure_text(text: &str, font: &FontSpec) -> f32 {
    let count = text.chars().count();
    if count == 0 {
        return 0.0;
    }
    let glyphs = count as f32 * font.size_pts * char_width_ratio(font.family, font.weight);
    let spacing = font.letter_spacing_pts * (count - 1) as f32;
    glyphs + spacing
}
