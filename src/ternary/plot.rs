//! Ternary diagram rendering with `plotters`.
//!
//! The triangle is drawn in pixel coordinates: the first component sits at
//! the bottom-left vertex, the second at the top and the third at the
//! bottom-right. PNG output is rasterized by the bitmap backend, SVG output
//! comes from the SVG backend and PDF output is converted from that SVG.
//! All text uses an embedded typeface, so no system fonts are needed.

use log::{debug, info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use svg2pdf::usvg::{self, fontdb, PostProcessingSteps, TreeParsing, TreePostProc};

use super::{TernaryDataset, TernaryError, TernarySystem};
use crate::metadata::ProjectMetadata;

/// Image width and height in pixels
const CANVAS_SIZE: (u32, u32) = (800, 800);

/// Horizontal margin around the triangle
const MARGIN: i32 = 100;

/// Distance from the top edge to the apex
const TOP: i32 = 110;

/// Family every text element is drawn with
const FONT_FAMILY: &str = "sans-serif";

/// Typeface registered under [`FONT_FAMILY`]
const FONT_DATA: &[u8] = epaint_default_fonts::UBUNTU_LIGHT;

/// Colour scheme of the diagram
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridStyle {
    /// Black lines on a white background
    #[default]
    BlackOnWhite,
    /// Gray lines on a white background
    GrayOnWhite,
    /// White lines on a black background
    WhiteOnBlack,
}

impl GridStyle {
    fn background(&self) -> RGBColor {
        match self {
            GridStyle::BlackOnWhite | GridStyle::GrayOnWhite => WHITE,
            GridStyle::WhiteOnBlack => BLACK,
        }
    }

    fn foreground(&self) -> RGBColor {
        match self {
            GridStyle::BlackOnWhite => BLACK,
            GridStyle::GrayOnWhite => RGBColor(90, 90, 90),
            GridStyle::WhiteOnBlack => WHITE,
        }
    }

    fn grid(&self) -> RGBColor {
        match self {
            GridStyle::BlackOnWhite => RGBColor(170, 170, 170),
            GridStyle::GrayOnWhite => RGBColor(205, 205, 205),
            GridStyle::WhiteOnBlack => RGBColor(110, 110, 110),
        }
    }
}

/// Presentation options of a diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Colour scheme
    pub grid_style: GridStyle,
    /// Marker radius in pixels
    pub marker_size: u32,
    /// Draw the sample label next to each point
    pub show_labels: bool,
    /// Text printed below the diagram
    pub caption: Option<String>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            grid_style: GridStyle::BlackOnWhite,
            marker_size: 6,
            show_labels: false,
            caption: None,
        }
    }
}

/// Image formats the renderer can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Raster image
    Png,
    /// Vector image
    Svg,
    /// Single-page vector document
    Pdf,
}

/// Image format from a file extension.
///
/// Unknown extensions fall back to PNG.
pub fn image_format<P: AsRef<Path>>(path: P) -> ImageFormat {
    let extension = path
        .as_ref()
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "svg" => ImageFormat::Svg,
        "pdf" => ImageFormat::Pdf,
        "png" => ImageFormat::Png,
        other => {
            warn!("Unknown image extension '{}', writing PNG data", other);
            ImageFormat::Png
        }
    }
}

/// `<system>_<client>_<project>.png` for saving a diagram
pub fn suggested_filename(system: &TernarySystem, metadata: &ProjectMetadata) -> String {
    let client = match metadata.client_name.trim() {
        "" => "Client",
        name => name,
    };
    let project = match metadata.project_name.trim() {
        "" => "Project",
        name => name,
    };
    format!("{}_{}_{}.png", system.file_stem(), client, project)
}

/// Diagram title
pub fn title(system: &TernarySystem) -> String {
    format!("Ternary Diagram: {}", system.name)
}

/// Triangle geometry in pixels
struct Triangle {
    left: i32,
    base: i32,
    side: f64,
    height: f64,
}

impl Triangle {
    fn new(width: u32) -> Self {
        let side = (width as i32 - 2 * MARGIN) as f64;
        let height = side * 3f64.sqrt() / 2.0;
        Self {
            left: MARGIN,
            base: TOP + height.round() as i32,
            side,
            height,
        }
    }

    /// Pixel position of a composition (components in percent)
    fn project(&self, [_, b, c]: [f64; 3]) -> (i32, i32) {
        let x = self.left as f64 + self.side * (b * 0.5 + c) / 100.0;
        let y = self.base as f64 - self.height * b / 100.0;
        (x.round() as i32, y.round() as i32)
    }

    fn vertices(&self) -> [(i32, i32); 3] {
        [
            self.project([100.0, 0.0, 0.0]),
            self.project([0.0, 100.0, 0.0]),
            self.project([0.0, 0.0, 100.0]),
        ]
    }

    /// Lines of constant composition every 10 %
    fn gridlines(&self) -> Vec<[(i32, i32); 2]> {
        let mut lines = Vec::new();
        for step in 1..10 {
            let f = step as f64 * 10.0;
            let r = 100.0 - f;
            lines.push([self.project([f, r, 0.0]), self.project([f, 0.0, r])]);
            lines.push([self.project([r, f, 0.0]), self.project([0.0, f, r])]);
            lines.push([self.project([r, 0.0, f]), self.project([0.0, r, f])]);
        }
        lines
    }
}

fn draw_error<E: std::fmt::Display>(e: E) -> TernaryError {
    TernaryError::DrawingError(e.to_string())
}

fn register_fonts() -> Result<(), TernaryError> {
    register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA)
        .map_err(|_| TernaryError::DrawingError("embedded typeface is not a valid font".to_string()))
}

fn draw_diagram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dataset: &TernaryDataset,
    options: &PlotOptions,
) -> Result<(), TernaryError> {
    let style = options.grid_style;
    let (width, height) = root.dim_in_pixel();
    let triangle = Triangle::new(width);

    root.fill(&style.background()).map_err(draw_error)?;

    for line in triangle.gridlines() {
        root.draw(&PathElement::new(line.to_vec(), style.grid().stroke_width(1)))
            .map_err(draw_error)?;
    }

    let [a, b, c] = triangle.vertices();
    root.draw(&PathElement::new(vec![a, b, c, a], style.foreground().stroke_width(2)))
        .map_err(draw_error)?;

    let marker = RGBColor(31, 119, 180);
    for point in &dataset.points {
        let center = triangle.project(point.values);
        root.draw(&Circle::new(center, options.marker_size, marker.mix(0.8).filled()))
            .map_err(draw_error)?;
        root.draw(&Circle::new(center, options.marker_size, style.foreground().stroke_width(1)))
            .map_err(draw_error)?;
    }

    let fg = style.foreground();
    let text = |size: i32, h: HPos, v: VPos| {
        (FONT_FAMILY, size)
            .into_font()
            .color(&fg)
            .pos(Pos::new(h, v))
    };

    root.draw(&Text::new(
        title(dataset.system),
        (width as i32 / 2, 40),
        text(24, HPos::Center, VPos::Center),
    ))
    .map_err(draw_error)?;

    let labels = dataset.system.labels();
    root.draw(&Text::new(labels[0], (a.0 - 10, a.1 + 25), text(18, HPos::Right, VPos::Center)))
        .map_err(draw_error)?;
    root.draw(&Text::new(labels[1], (b.0, b.1 - 25), text(18, HPos::Center, VPos::Center)))
        .map_err(draw_error)?;
    root.draw(&Text::new(labels[2], (c.0 + 10, c.1 + 25), text(18, HPos::Left, VPos::Center)))
        .map_err(draw_error)?;

    for step in 1..10 {
        let value = step * 10;
        let f = value as f64;
        let (x, y) = triangle.project([100.0 - f, 0.0, f]);
        root.draw(&Text::new(value.to_string(), (x, y + 12), text(11, HPos::Center, VPos::Center)))
            .map_err(draw_error)?;
    }

    if options.show_labels {
        for point in &dataset.points {
            let (x, y) = triangle.project(point.values);
            let offset = options.marker_size as i32 + 4;
            root.draw(&Text::new(
                point.label.as_str(),
                (x + offset, y - offset),
                text(12, HPos::Left, VPos::Bottom),
            ))
            .map_err(draw_error)?;
        }
    }

    root.draw(&Text::new(
        format!("Samples (n = {})", dataset.len()),
        (width as i32 - 20, 80),
        text(14, HPos::Right, VPos::Center),
    ))
    .map_err(draw_error)?;

    if let Some(caption) = options.caption.as_deref().filter(|c| !c.trim().is_empty()) {
        root.draw(&Text::new(
            caption,
            (width as i32 / 2, height as i32 - 50),
            text(14, HPos::Center, VPos::Center),
        ))
        .map_err(draw_error)?;
    }

    Ok(())
}

fn svg_document(dataset: &TernaryDataset, options: &PlotOptions) -> Result<String, TernaryError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CANVAS_SIZE).into_drawing_area();
        draw_diagram(&root, dataset, options)?;
        root.present().map_err(draw_error)?;
    }
    Ok(svg)
}

fn png_pixels(dataset: &TernaryDataset, options: &PlotOptions) -> Result<Vec<u8>, TernaryError> {
    let (width, height) = CANVAS_SIZE;
    let mut pixels = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, CANVAS_SIZE).into_drawing_area();
        draw_diagram(&root, dataset, options)?;
        root.present().map_err(draw_error)?;
    }
    Ok(pixels)
}

/// Convert an SVG document to PDF, laying text out with the embedded typeface
fn pdf_document(svg: &str) -> Result<Vec<u8>, TernaryError> {
    let mut tree = usvg::Tree::from_str(svg, &usvg::Options::default()).map_err(draw_error)?;

    let mut fonts = fontdb::Database::new();
    fonts.load_font_data(FONT_DATA.to_vec());
    let family = fonts
        .faces()
        .next()
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone());
    if let Some(family) = family {
        debug!("Laying out PDF text with '{}'", family);
        fonts.set_sans_serif_family(family);
    }

    tree.postprocess(PostProcessingSteps::default(), &fonts);
    Ok(svg2pdf::convert_tree(&tree, svg2pdf::Options::default()))
}

/// Render a diagram to PNG, SVG or PDF, chosen by the file extension
pub fn render<P: AsRef<Path>>(
    dataset: &TernaryDataset,
    path: P,
    options: &PlotOptions,
) -> Result<(), TernaryError> {
    let path = path.as_ref();
    if dataset.is_empty() {
        return Err(TernaryError::NoData(dataset.system.name.to_string()));
    }
    register_fonts()?;

    match image_format(path) {
        ImageFormat::Svg => fs::write(path, svg_document(dataset, options)?)?,
        ImageFormat::Pdf => fs::write(path, pdf_document(&svg_document(dataset, options)?)?)?,
        ImageFormat::Png => {
            let (width, height) = CANVAS_SIZE;
            image::save_buffer_with_format(
                path,
                &png_pixels(dataset, options)?,
                width,
                height,
                image::ColorType::Rgb8,
                image::ImageFormat::Png,
            )?;
        }
    }

    info!(
        "Saved {} with {} point(s) to {}",
        title(dataset.system),
        dataset.len(),
        path.display()
    );
    Ok(())
}
