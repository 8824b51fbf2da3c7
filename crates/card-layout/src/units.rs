//! Conversions between display units and the internal point unit.
//!
//! Every spatial quantity in the document model is stored in points; display
//! units exist only at the editing boundary. Conversions never round —
//! rounding is a presentation concern (`round_to`).

/// Points per inch (PostScript point).
pub const POINTS_PER_INCH: f32 = 72.0;

/// Points per centimeter (1 in = 2.54 cm).
pub const POINTS_PER_CM: f32 = POINTS_PER_INCH / 2.54;

/// Points per millimeter.
pub const POINTS_PER_MM: f32 = POINTS_PER_CM / 10.0;

/// Unit shown in editing controls. Cosmetic only; the engine never sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DisplayUnit {
    #[default]
    Cm,
    In,
    Mm,
}

impl DisplayUnit {
    pub fn to_points(self, value: f32) -> f32 {
        value * self.points_per_unit()
    }

    pub fn from_points(self, pts: f32) -> f32 {
        pts / self.points_per_unit()
    }

    fn points_per_unit(self) -> f32 {
        match self {
            DisplayUnit::Cm => POINTS_PER_CM,
            DisplayUnit::In => POINTS_PER_INCH,
            DisplayUnit::Mm => POINTS_PER_MM,
        }
    }
}

/// Round to a fixed number of decimal places for display.
pub fn round_to(value: f32, decimals: u32) -> f32 {
    let multiplier = 10f32.powi(decimals as i32);
    (value * multiplier).round() / multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_round_trip() {
        assert_eq!(DisplayUnit::In.to_points(1.0), 72.0);
        assert_eq!(DisplayUnit::In.from_points(36.0), 0.5);
    }

    #[test]
    fn test_metric_derived_from_inch() {
        assert!((DisplayUnit::Cm.to_points(2.54) - 72.0).abs() < 1e-4);
        assert!((DisplayUnit::Mm.to_points(25.4) - 72.0).abs() < 1e-4);
    }

    #[test]
    fn test_conversion_does_not_round() {
        let pts = DisplayUnit::Mm.to_points(1.0);
        assert!((pts - 2.834_645_7).abs() < 1e-4);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.005, 0), 1.0);
    }
}
