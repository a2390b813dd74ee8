//! Page and draw-operation model produced by the layout compiler.
//!
//! Coordinates are millimeters with the origin at the top-left of an A4
//! page; the PDF writer owns the conversion into PDF user space. Text
//! alignment is resolved by the layout engine, so every operation here is
//! absolutely positioned.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// Decoded raster image ready for embedding: tightly packed 8-bit RGB rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Axis-aligned rectangle, optionally rounded; filled and/or stroked.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        corner_radius: f32,
        fill: Option<Color>,
        stroke: Option<Color>,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
        width: f32,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        fill: Color,
    },
    /// A single text run; `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        style: FontStyle,
        size: f32,
        color: Color,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: RasterImage,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// The compiled paginated document, page size in millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDocument {
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Page>,
}

impl LayoutDocument {
    /// All text runs in paint order, for assertions and debugging.
    pub fn text_runs(&self) -> impl Iterator<Item = (usize, &DrawOp)> {
        self.pages.iter().enumerate().flat_map(|(index, page)| {
            page.ops
                .iter()
                .filter(|op| matches!(op, DrawOp::Text { .. }))
                .map(move |op| (index, op))
        })
    }
}
