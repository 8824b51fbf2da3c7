//! The document model: the complete, serializable description of one card
//! design. Immutable by convention — edits go through `DocumentPatch` and
//! produce a new snapshot; the render engine only ever reads a fully
//! resolved value.

use crate::geometry::EdgeInsets;
use crate::presets::default_preset;
use crate::types::*;
use crate::units::{DisplayUnit, POINTS_PER_CM, POINTS_PER_INCH};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Page dimensions in points plus cosmetic display preferences.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageConfig {
    pub width_pts: f32,
    pub height_pts: f32,
    pub unit_preference: DisplayUnit,
    pub preset_id: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        let preset = default_preset();
        Self {
            width_pts: preset.width_pts,
            height_pts: preset.height_pts,
            unit_preference: DisplayUnit::Cm,
            preset_id: preset.id.to_string(),
        }
    }
}

/// Which edge of a margin set to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// One margin category (bleed or safe): four independent edge distances.
///
/// `linked` is a transient editing convenience — when set, writing one edge
/// writes all four. The engine accepts any four values regardless of the
/// flag's state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarginConfig {
    pub enabled: bool,
    pub top_pts: f32,
    pub right_pts: f32,
    pub bottom_pts: f32,
    pub left_pts: f32,
    pub linked: bool,
}

impl MarginConfig {
    pub fn uniform(pts: f32) -> Self {
        Self {
            enabled: true,
            top_pts: pts,
            right_pts: pts,
            bottom_pts: pts,
            left_pts: pts,
            linked: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::uniform(0.0)
        }
    }

    /// Write one edge, honoring the `linked` flag.
    pub fn set_edge(&mut self, edge: Edge, pts: f32) {
        if self.linked {
            self.top_pts = pts;
            self.right_pts = pts;
            self.bottom_pts = pts;
            self.left_pts = pts;
            return;
        }
        match edge {
            Edge::Top => self.top_pts = pts,
            Edge::Right => self.right_pts = pts,
            Edge::Bottom => self.bottom_pts = pts,
            Edge::Left => self.left_pts = pts,
        }
    }

    /// Edge distances as insets, zeroed when the category is disabled.
    pub fn effective_insets(&self) -> EdgeInsets {
        if self.enabled {
            EdgeInsets::new(self.top_pts, self.right_pts, self.bottom_pts, self.left_pts)
        } else {
            EdgeInsets::default()
        }
    }
}

/// Visibility of the bleed/safe guide overlays. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverlaysConfig {
    pub show: bool,
}

impl Default for OverlaysConfig {
    fn default() -> Self {
        Self { show: true }
    }
}

/// Placement rules for the background image.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BackgroundConfig {
    pub rotation: Rotation,
    pub fit_mode: FitMode,
    pub placement_bounds: PlacementBounds,
    pub lock_aspect_ratio: bool,
    pub offset_anchor: OffsetAnchor,
    pub offset_x_pts: f32,
    pub offset_y_pts: f32,
    pub extra_padding_pts: EdgeInsets,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            rotation: Rotation::None,
            fit_mode: FitMode::Contain,
            placement_bounds: PlacementBounds::Canvas,
            lock_aspect_ratio: true,
            offset_anchor: OffsetAnchor::Center,
            offset_x_pts: 0.0,
            offset_y_pts: 0.0,
            extra_padding_pts: EdgeInsets::default(),
        }
    }
}

/// Shape drawn for the data modules of the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ModulePattern {
    #[default]
    Square,
    Dots,
    Rounded,
}

/// Shape drawn for the three finder patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CornerStyle {
    #[default]
    Square,
    Rounded,
}

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EccLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

/// Visual styling of the scannable code raster.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodeStyle {
    pub pattern: ModulePattern,
    pub corners: CornerStyle,
    pub ecc: EccLevel,
    pub fg_color: Color,
    pub bg_color: Color,
    pub transparent_bg: bool,
    pub quiet_zone_pts: f32,
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self {
            pattern: ModulePattern::Square,
            corners: CornerStyle::Square,
            ecc: EccLevel::M,
            fg_color: Color::BLACK,
            bg_color: Color::WHITE,
            transparent_bg: false,
            quiet_zone_pts: 4.0,
        }
    }
}

/// Logo overlaid on the center of the code.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodeLogo {
    pub enabled: bool,
    /// Edge length as a percentage of the code size.
    pub size_pct: f32,
    pub backing_enabled: bool,
    pub backing_color: Color,
    pub backing_radius_pts: f32,
}

impl Default for CodeLogo {
    fn default() -> Self {
        Self {
            enabled: false,
            size_pct: 30.0,
            backing_enabled: true,
            backing_color: Color::WHITE,
            backing_radius_pts: 4.0,
        }
    }
}

/// Placement and styling of the scannable code. The code is always square.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodeConfig {
    pub size_pts: f32,
    /// Which point of the page the code is anchored to.
    pub canvas_anchor: Anchor,
    /// Which point of the code aligns to the canvas anchor.
    pub code_anchor: Anchor,
    pub offset_x_pts: f32,
    pub offset_y_pts: f32,
    pub rotation: Rotation,
    pub style: CodeStyle,
    pub logo: CodeLogo,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            size_pts: POINTS_PER_INCH,
            canvas_anchor: Anchor::Center,
            code_anchor: Anchor::Center,
            offset_x_pts: 0.0,
            offset_y_pts: 0.0,
            rotation: Rotation::None,
            style: CodeStyle::default(),
            logo: CodeLogo::default(),
        }
    }
}

/// One of the base-14 families available on both render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FontFamily {
    #[default]
    Helvetica,
    TimesRoman,
    Courier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Caption font settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontSpec {
    pub family: FontFamily,
    pub size_pts: f32,
    pub weight: FontWeight,
    pub color: Color,
    /// Multiplier applied to the font size to obtain the line height.
    pub line_height: f32,
    pub letter_spacing_pts: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: FontFamily::Helvetica,
            size_pts: 10.0,
            weight: FontWeight::Regular,
            color: Color::BLACK,
            line_height: 1.2,
            letter_spacing_pts: 0.0,
        }
    }
}

/// Filled box behind the caption text block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelBox {
    pub enabled: bool,
    pub color: Color,
    pub padding_pts: f32,
    pub radius_pts: f32,
}

impl Default for LabelBox {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::WHITE,
            padding_pts: 4.0,
            radius_pts: 0.0,
        }
    }
}

/// Glyph outline stroked beneath the caption fill.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelOutline {
    pub enabled: bool,
    pub color: Color,
    pub width_pts: f32,
}

impl Default for LabelOutline {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::WHITE,
            width_pts: 1.0,
        }
    }
}

/// Caption wrapping rules.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelWrap {
    pub mode: WrapMode,
    pub max_lines: usize,
    pub ellipsis: bool,
}

impl Default for LabelWrap {
    fn default() -> Self {
        Self {
            mode: WrapMode::Word,
            max_lines: 3,
            ellipsis: true,
        }
    }
}

/// Caption placement, wrapping and decoration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelConfig {
    pub enabled: bool,
    pub orientation: LabelOrientation,
    pub gap_pts: f32,
    pub offset_x_pts: f32,
    pub offset_y_pts: f32,
    pub text_box_width_mode: TextBoxWidthMode,
    /// Used when `text_box_width_mode` is `Custom`.
    pub text_box_width_pts: f32,
    pub align: Alignment,
    /// When set, the caption rotates with the code around the code's center.
    pub rotate_with_group: bool,
    pub font: FontSpec,
    pub background: LabelBox,
    pub outline: LabelOutline,
    pub wrap: LabelWrap,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            orientation: LabelOrientation::Bottom,
            gap_pts: 8.0,
            offset_x_pts: 0.0,
            offset_y_pts: 0.0,
            text_box_width_mode: TextBoxWidthMode::Auto,
            text_box_width_pts: POINTS_PER_INCH,
            align: Alignment::Center,
            rotate_with_group: false,
            font: FontSpec::default(),
            background: LabelBox::default(),
            outline: LabelOutline::default(),
            wrap: LabelWrap::default(),
        }
    }
}

/// One unit of output: one payload, one caption, one page.
///
/// Produced by the ingestion side; the engine only ever reads it. A row with
/// any recorded error must not be rendered.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataRow {
    pub payload: String,
    pub label: String,
    /// 1-based position in the input.
    pub index: usize,
    pub errors: Vec<String>,
}

impl DataRow {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The complete description of one design.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DocumentModel {
    pub page: PageConfig,
    pub bleed: MarginConfig,
    pub safe: MarginConfig,
    pub overlays: OverlaysConfig,
    pub base_image: BackgroundConfig,
    pub code: CodeConfig,
    pub label: LabelConfig,
}

impl DocumentModel {
    /// Check the stored-quantity invariants: dimensions, margins, code size
    /// and padding must be non-negative. Derived rectangles may still end up
    /// degenerate at render time; that is handled as a no-draw, not here.
    pub fn validate(&self) -> Result<()> {
        if self.page.width_pts <= 0.0 || self.page.height_pts <= 0.0 {
            return Err(LayoutError::Config(format!(
                "Page dimensions must be positive, got {} x {}",
                self.page.width_pts, self.page.height_pts
            )));
        }
        for (name, margin) in [("bleed", &self.bleed), ("safe", &self.safe)] {
            let edges = [
                margin.top_pts,
                margin.right_pts,
                margin.bottom_pts,
                margin.left_pts,
            ];
            if edges.iter().any(|&e| e < 0.0) {
                return Err(LayoutError::Config(format!(
                    "{name} margin edges must be non-negative"
                )));
            }
        }
        if self.code.size_pts < 0.0 {
            return Err(LayoutError::Config("Code size must be non-negative".into()));
        }
        let pad = &self.base_image.extra_padding_pts;
        if [pad.top, pad.right, pad.bottom, pad.left]
            .iter()
            .any(|&p| p < 0.0)
        {
            return Err(LayoutError::Config(
                "Background padding must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Load a model from a JSON file.
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let model: DocumentModel = serde_json::from_slice(&bytes)
            .map_err(|e| LayoutError::Config(format!("Failed to parse document: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    /// Save the model to a JSON file.
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize document: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

impl Default for MarginConfig {
    fn default() -> Self {
        // 0.3 cm bleed is the document default; `safe` overrides to 0.5 cm.
        MarginConfig::uniform(0.3 * POINTS_PER_CM)
    }
}

// The two margin categories have different default distances, so the
// DocumentModel default can't lean on `MarginConfig::default` for both.
impl DocumentModel {
    pub fn with_defaults() -> Self {
        Self {
            safe: MarginConfig::uniform(0.5 * POINTS_PER_CM),
            ..Self::default()
        }
    }
}
