use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Reference point of a rectangle: the four corners plus the center.
///
/// The same enum serves two distinct roles and must always be routed through
/// the matching function: `geometry::anchor_point` answers "where on the
/// container", `geometry::top_left_from_anchor` answers "which part of the
/// element". Conflating the two directions is a classic off-by-axis bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Anchor {
    Tl,
    Tr,
    Bl,
    Br,
    #[default]
    Center,
}

/// Quarter-turn rotation applied at draw time around an element's center.
///
/// Rotation never changes a stored bounding box; 90/270 merely swap the
/// apparent width and height when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Number of clockwise quarter turns (0..=3).
    pub fn quarter_turns(self) -> u8 {
        (self.degrees() / 90) as u8
    }

    /// Whether drawing swaps the apparent width/height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }

    /// Combine two rotations (quarter turns add modulo 360).
    pub fn compose(self, other: Rotation) -> Rotation {
        match (self.quarter_turns() + other.quarter_turns()) % 4 {
            1 => Rotation::Clockwise90,
            2 => Rotation::Clockwise180,
            3 => Rotation::Clockwise270,
            _ => Rotation::None,
        }
    }
}

/// How the background image is scaled into its content rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FitMode {
    #[default]
    Contain,
    Cover,
    FillWidth,
    FillHeight,
    Stretch,
}

/// Which margin-derived rectangle constrains the background image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PlacementBounds {
    /// Full page, bleed included.
    BleedArea,
    /// Page inset by the bleed edges (the trim area).
    #[default]
    Canvas,
    /// Trim area further inset by the safe margins.
    SafeArea,
}

/// Semantics of the background offset: absolute from the content origin, or
/// relative to the centered base position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OffsetAnchor {
    Corner,
    #[default]
    Center,
}

/// Which side of the code the caption sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LabelOrientation {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TextBoxWidthMode {
    /// Caption box matches the code size.
    #[default]
    Auto,
    /// Explicit width in points.
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Alignment {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum WrapMode {
    #[default]
    Word,
    Char,
    None,
}

/// An RGBA color with components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    /// Parse a `#rrggbb` hex string (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Color> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f32 / 255.0)
                .ok()
        };
        Some(Color {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
            a: 1.0,
        })
    }

    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }

    pub fn with_alpha(self, a: f32) -> Color {
        Color { a, ..self }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }
}

#[cfg(feature = "serde")]
mod color_serde {
    use super::Color;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    // Colors travel as "#rrggbb" strings on the wire; alpha is a render-time
    // concern and is not persisted.
    impl Serialize for Color {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for Color {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Color::from_hex(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_degrees() {
        assert_eq!(Rotation::None.degrees(), 0);
        assert_eq!(Rotation::Clockwise90.degrees(), 90);
        assert_eq!(Rotation::Clockwise180.degrees(), 180);
        assert_eq!(Rotation::Clockwise270.degrees(), 270);
    }

    #[test]
    fn test_rotation_compose() {
        assert_eq!(
            Rotation::Clockwise90.compose(Rotation::Clockwise90),
            Rotation::Clockwise180
        );
        assert_eq!(
            Rotation::Clockwise270.compose(Rotation::Clockwise180),
            Rotation::Clockwise90
        );
        assert_eq!(Rotation::None.compose(Rotation::None), Rotation::None);
    }

    #[test]
    fn test_color_hex_round_trip() {
        let c = Color::from_hex("#3366cc").unwrap();
        assert!((c.r - 0x33 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.to_hex(), "#3366cc");
        assert!(Color::from_hex("not-a-color").is_none());
        assert!(Color::from_hex("#12345").is_none());
    }
}
