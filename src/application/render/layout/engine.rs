//! Paginated canvas engine: vertical cursor, page breaks, and the shared
//! palette. The target medium has no flow primitive, so every block is
//! measured before it is placed and the cursor decides when a new page
//! starts.

use crate::application::render::layout::metrics::{text_width, wrap};
use crate::application::render::layout::page::{Color, DrawOp, FontStyle, LayoutDocument, Page};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 25.0;
/// Content below this line forces a page break.
pub const SAFE_BOTTOM: f32 = PAGE_HEIGHT - 25.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - MARGIN * 2.0;

pub const CHARCOAL: Color = Color::rgb(26, 26, 26);
pub const CHARCOAL_LIGHT: Color = Color::rgb(74, 74, 74);
pub const CHARCOAL_MUTED: Color = Color::rgb(138, 138, 138);
pub const SAGE: Color = Color::rgb(124, 144, 130);
pub const SAGE_DARK: Color = Color::rgb(94, 114, 100);
pub const CREAM: Color = Color::rgb(250, 250, 248);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BORDER: Color = Color::rgb(224, 222, 216);
pub const ROW_SHADE: Color = Color::rgb(244, 243, 239);

/// Line advance for 10pt body text, label lines, and wrapped values.
pub const LINE_HEIGHT: f32 = 5.0;

pub(crate) struct LayoutEngine {
    pages: Vec<Page>,
    cursor_y: f32,
    page_count: usize,
    footer_label: String,
}

impl LayoutEngine {
    pub fn new(footer_label: impl Into<String>) -> Self {
        Self {
            pages: Vec::new(),
            cursor_y: MARGIN,
            page_count: 0,
            footer_label: footer_label.into(),
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor_y
    }

    pub fn advance(&mut self, by: f32) {
        self.cursor_y += by;
    }

    pub fn set_cursor(&mut self, y: f32) {
        self.cursor_y = y;
    }

    pub fn op(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Open the unnumbered cover page; it gets a background and a product
    /// footer but no page number.
    pub fn start_cover(&mut self, product_name: &str) {
        self.pages.push(Page::default());
        self.background();
        self.text_centered(
            &format!("Generated with {product_name}"),
            PAGE_WIDTH / 2.0,
            PAGE_HEIGHT - 15.0,
            FontStyle::Regular,
            8.0,
            CHARCOAL_MUTED,
        );
        self.cursor_y = MARGIN;
    }

    /// Open a numbered content page: background, footer, cursor at the top
    /// margin.
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.page_count += 1;
        self.background();
        let footer = format!("{} · Page {}", self.footer_label, self.page_count);
        self.text_centered(
            &footer,
            PAGE_WIDTH / 2.0,
            PAGE_HEIGHT - 10.0,
            FontStyle::Regular,
            7.0,
            CHARCOAL_MUTED,
        );
        self.cursor_y = MARGIN;
    }

    fn background(&mut self) {
        self.op(DrawOp::Rect {
            x: 0.0,
            y: 0.0,
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            corner_radius: 0.0,
            fill: Some(CREAM),
            stroke: None,
        });
    }

    /// Start a new page when `needed` millimeters will not fit above the
    /// safe bottom margin. Returns whether a break happened, so callers such
    /// as the table renderer can repeat their header band.
    pub fn check_break(&mut self, needed: f32) -> bool {
        if self.cursor_y + needed > SAFE_BOTTOM {
            self.new_page();
            return true;
        }
        false
    }

    pub fn text(&mut self, text: &str, x: f32, y: f32, style: FontStyle, size: f32, color: Color) {
        self.op(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            style,
            size,
            color,
        });
    }

    /// Centered text: alignment is resolved here so the writer only ever
    /// sees absolute positions.
    pub fn text_centered(
        &mut self,
        text: &str,
        center_x: f32,
        y: f32,
        style: FontStyle,
        size: f32,
        color: Color,
    ) {
        let x = center_x - text_width(text, style, size) / 2.0;
        self.text(text, x, y, style, size, color);
    }

    /// Wrapped body lines advancing the cursor, each line individually
    /// break-checked so a single long field can span pages.
    pub fn flowing_lines(
        &mut self,
        value: &str,
        x: f32,
        width: f32,
        style: FontStyle,
        size: f32,
        color: Color,
    ) {
        for line in wrap(value, style, size, width) {
            self.check_break(LINE_HEIGHT + 1.0);
            if !line.is_empty() {
                self.text(&line, x, self.cursor_y, style, size, color);
            }
            self.cursor_y += LINE_HEIGHT;
        }
    }

    pub fn divider(&mut self) {
        self.check_break(10.0);
        self.advance(3.0);
        self.op(DrawOp::Line {
            x1: MARGIN,
            y1: self.cursor_y,
            x2: PAGE_WIDTH - MARGIN,
            y2: self.cursor_y,
            color: BORDER,
            width: 0.3,
        });
        self.advance(8.0);
    }

    pub fn finish(self) -> LayoutDocument {
        LayoutDocument {
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
            pages: self.pages,
        }
    }
}
