//! PDF page assembly.
//!
//! `PageSurface` is the print-side implementation of the drawing surface:
//! it receives canonical (top-left origin) coordinates from the shared
//! pipeline and applies the single vertical flip — and the matching
//! rotation-sense mirror — at the moment each content-stream operator is
//! emitted. No layout formula lives here.

use crate::rows::valid_row_count;
use crate::types::{ExportError, Result};
use card_layout::geometry::{Point, Rect};
use card_layout::metrics;
use card_layout::render::{RenderAssets, RenderOptions, RenderSurface, flip_point, flip_rect, render_card};
use card_layout::{Color, DataRow, DocumentModel, FontFamily, FontSpec, FontWeight, Rotation};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbaImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;

/// Resolution used for code rasters embedded in the PDF.
pub const EXPORT_PIXELS_PER_PT: f32 = 4.0;

/// Control point factor for approximating quarter circles with one cubic
/// Bezier: 4 * (sqrt(2) - 1) / 3.
const BEZIER_CIRCLE_FACTOR: f32 = 0.552284749831;

/// Shared assets decoded once for the whole batch.
#[derive(Debug, Clone, Default)]
pub struct ExportAssets {
    pub base_image: Option<RgbaImage>,
    pub logo: Option<RgbaImage>,
}

/// Render every valid row to one PDF page each and return the document
/// bytes.
///
/// Fails with `NoValidRows` before any assembly work when nothing would be
/// exported. The progress callback fires once per input row, skipped rows
/// included, as `(current, total)`.
pub fn export_pdf_bytes(
    model: &DocumentModel,
    rows: &[DataRow],
    assets: &ExportAssets,
    mut on_progress: Option<&mut dyn FnMut(usize, usize)>,
) -> Result<Vec<u8>> {
    if valid_row_count(rows) == 0 {
        return Err(ExportError::NoValidRows);
    }
    model.validate()?;

    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();

    let base_id = match assets.base_image.as_ref() {
        Some(img) => Some(embed_image(&mut output, img)?),
        None => None,
    };
    let logo_id = match assets.logo.as_ref() {
        Some(img) => Some(embed_image(&mut output, img)?),
        None => None,
    };

    let mut font_ids: HashMap<&'static str, ObjectId> = HashMap::new();
    let mut page_refs = Vec::new();
    let total = rows.len();

    for (i, row) in rows.iter().enumerate() {
        if let Some(cb) = on_progress.as_mut() {
            cb(i + 1, total);
        }
        if !row.is_valid() {
            log::warn!("Skipping row {} due to errors: {:?}", row.index, row.errors);
            continue;
        }

        // A failing code raster costs the code, not the page.
        let code_raster =
            match card_raster::render_code_raster(&row.payload, &model.code, EXPORT_PIXELS_PER_PT) {
                Ok(img) => Some(img),
                Err(e) => {
                    log::error!("Row {}: failed to rasterize code: {e}", row.index);
                    None
                }
            };
        let code_id = match code_raster.as_ref() {
            Some(img) => Some(embed_image(&mut output, img)?),
            None => None,
        };

        let mut surface = PageSurface::new(model.page.height_pts);
        if let (Some(img), Some(id)) = (assets.base_image.as_ref(), base_id) {
            surface.register_image(img, "Bg", id);
        }
        if let (Some(img), Some(id)) = (assets.logo.as_ref(), logo_id) {
            surface.register_image(img, "Logo", id);
        }
        if let (Some(img), Some(id)) = (code_raster.as_ref(), code_id) {
            surface.register_image(img, "Code", id);
        }

        render_card(
            &mut surface,
            model,
            Some(row),
            &RenderAssets {
                base_image: assets.base_image.as_ref(),
                code_raster: code_raster.as_ref(),
                logo: assets.logo.as_ref(),
            },
            &RenderOptions::print(),
        );

        let page_id = finish_page(&mut output, surface, model, pages_tree_id, &mut font_ids);
        page_refs.push(Object::Reference(page_id));
    }

    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    output.trailer.set("Root", catalog_id);

    let mut writer = Vec::new();
    output.save_to(&mut writer)?;
    Ok(writer)
}

/// Async wrapper: render off the runtime, then write the file.
pub async fn export_pdf(
    model: &DocumentModel,
    rows: &[DataRow],
    assets: &ExportAssets,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    let model = model.clone();
    let rows = rows.to_vec();
    let assets = assets.clone();
    let output_path = output_path.as_ref().to_owned();

    let bytes =
        tokio::task::spawn_blocking(move || export_pdf_bytes(&model, &rows, &assets, None))
            .await??;
    tokio::fs::write(&output_path, bytes).await?;
    Ok(())
}

fn finish_page(
    output: &mut Document,
    surface: PageSurface,
    model: &DocumentModel,
    parent_pages_id: ObjectId,
    font_ids: &mut HashMap<&'static str, ObjectId>,
) -> ObjectId {
    let (ops, used_images, used_fonts, image_ids) = surface.finish();

    let mut xobjects = Dictionary::new();
    for name in &used_images {
        if let Some(&id) = image_ids.get(name.as_str()) {
            xobjects.set(name.as_bytes(), Object::Reference(id));
        }
    }

    let mut fonts = Dictionary::new();
    for (resource, base_font) in used_fonts {
        let id = *font_ids.entry(resource).or_insert_with(|| {
            let mut font_dict = Dictionary::new();
            font_dict.set("Type", Object::Name(b"Font".to_vec()));
            font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
            font_dict.set("BaseFont", Object::Name(base_font.as_bytes().to_vec()));
            output.add_object(font_dict)
        });
        fonts.set(resource.as_bytes(), Object::Reference(id));
    }

    let mut resources = Dictionary::new();
    if !xobjects.is_empty() {
        resources.set("XObject", Object::Dictionary(xobjects));
    }
    if !fonts.is_empty() {
        resources.set("Font", Object::Dictionary(fonts));
    }

    let content_id = output.add_object(Stream::new(Dictionary::new(), ops.into_bytes()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(model.page.width_pts),
            Object::Real(model.page.height_pts),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    output.add_object(page_dict)
}

/// Embed an RGBA raster as an image XObject with a grayscale soft mask for
/// the alpha channel. Both streams are Flate-compressed.
fn embed_image(doc: &mut Document, img: &RgbaImage) -> Result<ObjectId> {
    let (width, height) = img.dimensions();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in img.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let mut smask_dict = Dictionary::new();
    smask_dict.set("Type", Object::Name(b"XObject".to_vec()));
    smask_dict.set("Subtype", Object::Name(b"Image".to_vec()));
    smask_dict.set("Width", Object::Integer(width as i64));
    smask_dict.set("Height", Object::Integer(height as i64));
    smask_dict.set("ColorSpace", Object::Name(b"DeviceGray".to_vec()));
    smask_dict.set("BitsPerComponent", Object::Integer(8));
    smask_dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    let smask_id = doc.add_object(Stream::new(smask_dict, deflate(&alpha)?));

    let mut image_dict = Dictionary::new();
    image_dict.set("Type", Object::Name(b"XObject".to_vec()));
    image_dict.set("Subtype", Object::Name(b"Image".to_vec()));
    image_dict.set("Width", Object::Integer(width as i64));
    image_dict.set("Height", Object::Integer(height as i64));
    image_dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    image_dict.set("BitsPerComponent", Object::Integer(8));
    image_dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    image_dict.set("SMask", Object::Reference(smask_id));
    Ok(doc.add_object(Stream::new(image_dict, deflate(&rgb)?)))
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Content-stream generator for one page. Bottom-left origin; the flip
/// happens here and nowhere else.
struct PageSurface {
    page_height: f32,
    ops: String,
    image_names: HashMap<usize, String>,
    image_ids: HashMap<&'static str, ObjectId>,
    used_images: BTreeSet<String>,
    used_fonts: BTreeSet<(&'static str, &'static str)>,
}

impl PageSurface {
    fn new(page_height: f32) -> Self {
        Self {
            page_height,
            ops: String::new(),
            image_names: HashMap::new(),
            image_ids: HashMap::new(),
            used_images: BTreeSet::new(),
            used_fonts: BTreeSet::new(),
        }
    }

    /// Associate a decoded raster with its embedded XObject so `draw_image`
    /// can reference it by resource name.
    fn register_image(&mut self, img: &RgbaImage, name: &'static str, id: ObjectId) {
        self.image_names
            .insert(img.as_ptr() as usize, name.to_string());
        self.image_ids.insert(name, id);
    }

    #[allow(clippy::type_complexity)]
    fn finish(
        self,
    ) -> (
        String,
        BTreeSet<String>,
        BTreeSet<(&'static str, &'static str)>,
        HashMap<&'static str, ObjectId>,
    ) {
        (self.ops, self.used_images, self.used_fonts, self.image_ids)
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ops
            .push_str(&format!("{} {} {} rg\n", color.r, color.g, color.b));
    }

    fn font_resource(&mut self, font: &FontSpec) -> &'static str {
        let entry = match (font.family, font.weight) {
            (FontFamily::Helvetica, FontWeight::Regular) => ("F1", "Helvetica"),
            (FontFamily::Helvetica, FontWeight::Bold) => ("F2", "Helvetica-Bold"),
            (FontFamily::TimesRoman, FontWeight::Regular) => ("F3", "Times-Roman"),
            (FontFamily::TimesRoman, FontWeight::Bold) => ("F4", "Times-Bold"),
            (FontFamily::Courier, FontWeight::Regular) => ("F5", "Courier"),
            (FontFamily::Courier, FontWeight::Bold) => ("F6", "Courier-Bold"),
        };
        self.used_fonts.insert(entry);
        entry.0
    }

    /// Baseline position for a line box whose top-left is `origin`,
    /// converted to bottom-left-origin space.
    fn baseline(&self, origin: Point, font: &FontSpec) -> Point {
        let canonical = Point::new(origin.x, origin.y + metrics::baseline_offset(font));
        flip_point(self.page_height, canonical)
    }

    fn text_ops(&mut self, text: &str, origin: Point, font: &FontSpec) {
        let baseline = self.baseline(origin, font);
        let resource = self.font_resource(font);
        self.ops
            .push_str(&format!("/{} {} Tf\n", resource, font.size_pts));
        if font.letter_spacing_pts != 0.0 {
            self.ops
                .push_str(&format!("{} Tc\n", font.letter_spacing_pts));
        }
        self.ops.push_str(&format!(
            "{} {} Td\n({}) Tj\n",
            baseline.x,
            baseline.y,
            escape_pdf_string(text)
        ));
    }
}

impl RenderSurface for PageSurface {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        metrics::measure_text(text, font)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, corner_radius_pts: f32) {
        let r = flip_rect(self.page_height, rect);
        self.ops.push_str("q\n");
        self.set_fill_color(color);
        let radius = corner_radius_pts
            .max(0.0)
            .min(r.width.min(r.height) / 2.0);
        if radius > 0.0 {
            self.rounded_rect_path(r, radius);
            self.ops.push_str("f\n");
        } else {
            self.ops
                .push_str(&format!("{} {} {} {} re\nf\n", r.x, r.y, r.width, r.height));
        }
        self.ops.push_str("Q\n");
    }

    fn draw_image(&mut self, image: &RgbaImage, rect: Rect) {
        let Some(name) = self.image_names.get(&(image.as_ptr() as usize)).cloned() else {
            log::warn!("Image drawn without being embedded, skipping");
            return;
        };
        let r = flip_rect(self.page_height, rect);
        self.ops.push_str(&format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            r.width, r.height, r.x, r.y, name
        ));
        self.used_images.insert(name);
    }

    fn draw_text(&mut self, text: &str, origin: Point, font: &FontSpec) {
        self.ops.push_str("q\n");
        self.set_fill_color(font.color);
        self.ops.push_str("BT\n");
        self.text_ops(text, origin, font);
        self.ops.push_str("ET\nQ\n");
    }

    fn stroke_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        color: Color,
        width_pts: f32,
    ) {
        self.ops.push_str("q\n");
        self.ops
            .push_str(&format!("{} {} {} RG\n{} w\n", color.r, color.g, color.b, width_pts));
        self.ops.push_str("BT\n1 Tr\n");
        self.text_ops(text, origin, font);
        self.ops.push_str("ET\nQ\n");
    }

    fn push_rotation(&mut self, rotation: Rotation, center: Point) {
        // Clockwise on screen is a negative angle in Y-up page space.
        let (cos, sin): (f32, f32) = match rotation {
            Rotation::None => (1.0, 0.0),
            Rotation::Clockwise90 => (0.0, -1.0),
            Rotation::Clockwise180 => (-1.0, 0.0),
            Rotation::Clockwise270 => (0.0, 1.0),
        };
        let c = flip_point(self.page_height, center);
        let e = c.x - (cos * c.x - sin * c.y);
        let f = c.y - (sin * c.x + cos * c.y);
        self.ops.push_str(&format!(
            "q\n{} {} {} {} {} {} cm\n",
            cos, sin, -sin, cos, e, f
        ));
    }

    fn pop_rotation(&mut self) {
        self.ops.push_str("Q\n");
    }
}

impl PageSurface {
    fn rounded_rect_path(&mut self, r: Rect, radius: f32) {
        let k = radius * BEZIER_CIRCLE_FACTOR;
        let (x0, y0) = (r.x, r.y);
        let (x1, y1) = (r.right(), r.y + r.height);
        let ops = [
            format!("{} {} m\n", x0 + radius, y0),
            format!("{} {} l\n", x1 - radius, y0),
            format!(
                "{} {} {} {} {} {} c\n",
                x1 - radius + k,
                y0,
                x1,
                y0 + radius - k,
                x1,
                y0 + radius
            ),
            format!("{} {} l\n", x1, y1 - radius),
            format!(
                "{} {} {} {} {} {} c\n",
                x1,
                y1 - radius + k,
                x1 - radius + k,
                y1,
                x1 - radius,
                y1
            ),
            format!("{} {} l\n", x0 + radius, y1),
            format!(
                "{} {} {} {} {} {} c\n",
                x0 + radius - k,
                y1,
                x0,
                y1 - radius + k,
                x0,
                y1 - radius
            ),
            format!("{} {} l\n", x0, y0 + radius),
            format!(
                "{} {} {} {} {} {} c\n",
                x0,
                y0 + radius - k,
                x0 + radius - k,
                y0,
                x0 + radius,
                y0
            ),
            "h\n".to_string(),
        ];
        for op in ops {
            self.ops.push_str(&op);
        }
    }
}

fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
