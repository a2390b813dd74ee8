//! PDF serialization of a compiled layout document.
//!
//! The layout compiler already resolved all geometry, so this writer is a
//! dumb translator: millimeter draw ops become content-stream operators, text
//! uses the base-14 Helvetica faces in WinAnsi encoding (the same metrics the
//! measurement pass used), and decoded signature bitmaps become uncompressed
//! DeviceRGB image XObjects. Output is deterministic for a given document.

use std::fmt::Write as _;

use crate::application::render::layout::page::{
    Color, DrawOp, FontStyle, LayoutDocument, Page, RasterImage,
};

const PT_PER_MM: f32 = 72.0 / 25.4;
/// Circle/rounded-corner approximation constant for cubic Béziers.
const BEZIER_ARC: f32 = 0.552_285;

/// Serialize the document into a complete PDF byte stream.
pub fn write_document(doc: &LayoutDocument) -> Vec<u8> {
    let mut writer = Writer::new();

    let catalog = writer.alloc();
    let pages_root = writer.alloc();
    let font_regular = writer.alloc();
    let font_bold = writer.alloc();

    writer.set(
        font_regular,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    );
    writer.set(
        font_bold,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    );

    let mut page_ids = Vec::new();
    for page in &doc.pages {
        page_ids.push(write_page(
            &mut writer,
            page,
            doc,
            pages_root,
            font_regular,
            font_bold,
        ));
    }

    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    writer.set(
        pages_root,
        format!(
            "<< /Type /Pages /Kids [{kids}] /Count {} >>",
            page_ids.len()
        )
        .into_bytes(),
    );
    writer.set(
        catalog,
        format!("<< /Type /Catalog /Pages {pages_root} 0 R >>").into_bytes(),
    );

    writer.render(catalog)
}

fn write_page(
    writer: &mut Writer,
    page: &Page,
    doc: &LayoutDocument,
    pages_root: usize,
    font_regular: usize,
    font_bold: usize,
) -> usize {
    let mut images = Vec::new();
    for op in &page.ops {
        if let DrawOp::Image { image, .. } = op {
            let id = writer.alloc();
            writer.set(id, image_object(image));
            images.push(id);
        }
    }

    let content = page_content(page, doc.page_height, &images);
    let content_id = writer.alloc();
    writer.set(content_id, stream_object(content.into_bytes()));

    let mut resources = format!(
        "/Resources << /Font << /F1 {font_regular} 0 R /F2 {font_bold} 0 R >>"
    );
    if !images.is_empty() {
        resources.push_str(" /XObject << ");
        for (index, id) in images.iter().enumerate() {
            let _ = write!(resources, "/Im{} {id} 0 R ", index + 1);
        }
        resources.push_str(">>");
    }
    resources.push_str(" >>");

    let width_pt = doc.page_width * PT_PER_MM;
    let height_pt = doc.page_height * PT_PER_MM;
    let page_id = writer.alloc();
    writer.set(
        page_id,
        format!(
            "<< /Type /Page /Parent {pages_root} 0 R /MediaBox [0 0 {width_pt:.2} {height_pt:.2}] \
             {resources} /Contents {content_id} 0 R >>"
        )
        .into_bytes(),
    );
    page_id
}

fn image_object(image: &RasterImage) -> Vec<u8> {
    let mut body = format!(
        "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB \
         /BitsPerComponent 8 /Length {} >>\nstream\n",
        image.width,
        image.height,
        image.rgb.len()
    )
    .into_bytes();
    body.extend_from_slice(&image.rgb);
    body.extend_from_slice(b"\nendstream");
    body
}

fn stream_object(content: Vec<u8>) -> Vec<u8> {
    let mut body = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
    body.extend_from_slice(&content);
    body.extend_from_slice(b"\nendstream");
    body
}

fn page_content(page: &Page, page_height_mm: f32, images: &[usize]) -> String {
    let mut out = String::new();
    let mut image_index = 0usize;
    let k = PT_PER_MM;
    let h = page_height_mm;

    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                corner_radius,
                fill,
                stroke,
            } => {
                let px = x * k;
                let py = (h - y - height) * k;
                let pw = width * k;
                let ph = height * k;
                if let Some(color) = fill {
                    let _ = writeln!(out, "{} rg", rgb(*color));
                }
                if let Some(color) = stroke {
                    let _ = writeln!(out, "0.4 w {} RG", rgb(*color));
                }
                if *corner_radius > 0.0 {
                    rounded_rect_path(&mut out, px, py, pw, ph, corner_radius * k);
                } else {
                    let _ = writeln!(out, "{px:.2} {py:.2} {pw:.2} {ph:.2} re");
                }
                let _ = writeln!(out, "{}", paint_operator(fill.is_some(), stroke.is_some()));
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                let _ = writeln!(
                    out,
                    "{:.2} w {} RG {:.2} {:.2} m {:.2} {:.2} l S",
                    width * k,
                    rgb(*color),
                    x1 * k,
                    (h - y1) * k,
                    x2 * k,
                    (h - y2) * k,
                );
            }
            DrawOp::Circle {
                cx,
                cy,
                radius,
                fill,
            } => {
                let _ = writeln!(out, "{} rg", rgb(*fill));
                circle_path(&mut out, cx * k, (h - cy) * k, radius * k);
                out.push_str("f\n");
            }
            DrawOp::Text {
                x,
                y,
                text,
                style,
                size,
                color,
            } => {
                let font = match style {
                    FontStyle::Regular => "F1",
                    FontStyle::Bold => "F2",
                };
                let _ = writeln!(
                    out,
                    "BT /{font} {size:.1} Tf {} rg {:.2} {:.2} Td ({}) Tj ET",
                    rgb(*color),
                    x * k,
                    (h - y) * k,
                    escape_text(text),
                );
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
                ..
            } => {
                image_index += 1;
                if image_index <= images.len() {
                    let _ = writeln!(
                        out,
                        "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /Im{image_index} Do Q",
                        width * k,
                        height * k,
                        x * k,
                        (h - y - height) * k,
                    );
                }
            }
        }
    }
    out
}

fn paint_operator(fill: bool, stroke: bool) -> &'static str {
    match (fill, stroke) {
        (true, true) => "B",
        (true, false) => "f",
        (false, true) => "S",
        (false, false) => "n",
    }
}

fn rgb(color: Color) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
    )
}

fn rounded_rect_path(out: &mut String, x: f32, y: f32, w: f32, h: f32, r: f32) {
    let r = r.min(w / 2.0).min(h / 2.0);
    let c = r * BEZIER_ARC;
    let _ = writeln!(out, "{:.2} {:.2} m", x + r, y);
    let _ = writeln!(out, "{:.2} {:.2} l", x + w - r, y);
    let _ = writeln!(
        out,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        x + w - r + c,
        y,
        x + w,
        y + r - c,
        x + w,
        y + r
    );
    let _ = writeln!(out, "{:.2} {:.2} l", x + w, y + h - r);
    let _ = writeln!(
        out,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        x + w,
        y + h - r + c,
        x + w - r + c,
        y + h,
        x + w - r,
        y + h
    );
    let _ = writeln!(out, "{:.2} {:.2} l", x + r, y + h);
    let _ = writeln!(
        out,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        x + r - c,
        y + h,
        x,
        y + h - r + c,
        x,
        y + h - r
    );
    let _ = writeln!(out, "{:.2} {:.2} l", x, y + r);
    let _ = writeln!(
        out,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c h",
        x,
        y + r - c,
        x + r - c,
        y,
        x + r,
        y
    );
}

fn circle_path(out: &mut String, cx: f32, cy: f32, r: f32) {
    let c = r * BEZIER_ARC;
    let _ = writeln!(out, "{:.2} {:.2} m", cx + r, cy);
    let _ = writeln!(
        out,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        cx + r,
        cy + c,
        cx + c,
        cy + r,
        cx,
        cy + r
    );
    let _ = writeln!(
        out,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        cx - c,
        cy + r,
        cx - r,
        cy + c,
        cx - r,
        cy
    );
    let _ = writeln!(
        out,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        cx - r,
        cy - c,
        cx - c,
        cy - r,
        cx,
        cy - r
    );
    let _ = writeln!(
        out,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c h",
        cx + c,
        cy - r,
        cx + r,
        cy - c,
        cx + r,
        cy
    );
}

/// Map a character into WinAnsi, falling back to `?` for anything the
/// encoding cannot carry.
fn winansi_byte(c: char) -> u8 {
    let code = c as u32;
    match c {
        '\u{20}'..='\u{7E}' => code as u8,
        '\u{A0}'..='\u{FF}' => code as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        '‰' => 0x89,
        '‹' => 0x8B,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        '›' => 0x9B,
        _ => b'?',
    }
}

/// Escape a text run into an ASCII-safe PDF string literal.
fn escape_text(text: &str) -> String {
    let mut out = String::new();
    for c in text.chars() {
        let byte = winansi_byte(c);
        match byte {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out
}

struct Writer {
    objects: Vec<Option<Vec<u8>>>,
}

impl Writer {
    fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Reserve the next object number; bodies may be filled in later, which
    /// is how the catalog and page tree get their forward references.
    fn alloc(&mut self) -> usize {
        self.objects.push(None);
        self.objects.len()
    }

    fn set(&mut self, id: usize, body: Vec<u8>) {
        self.objects[id - 1] = Some(body);
    }

    fn render(self, root: usize) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        out.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);

        let mut offsets = Vec::with_capacity(self.objects.len());
        for (index, body) in self.objects.iter().enumerate() {
            offsets.push(out.len());
            let _ = write!(
                SliceWriter(&mut out),
                "{} 0 obj\n",
                index + 1
            );
            if let Some(body) = body {
                out.extend_from_slice(body);
            } else {
                out.extend_from_slice(b"null");
            }
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        let _ = write!(
            SliceWriter(&mut out),
            "xref\n0 {}\n0000000000 65535 f \n",
            self.objects.len() + 1
        );
        for offset in &offsets {
            let _ = write!(SliceWriter(&mut out), "{offset:010} 00000 n \n");
        }
        let _ = write!(
            SliceWriter(&mut out),
            "trailer\n<< /Size {} /Root {root} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            self.objects.len() + 1
        );
        out
    }
}

/// `fmt::Write` adapter over the output buffer; everything written through it
/// is ASCII.
struct SliceWriter<'a>(&'a mut Vec<u8>);

impl std::fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render::layout::page::LayoutDocument;

    fn document_with(ops: Vec<DrawOp>) -> LayoutDocument {
        LayoutDocument {
            page_width: 210.0,
            page_height: 297.0,
            pages: vec![Page { ops }],
        }
    }

    fn find(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle.as_bytes())
    }

    #[test]
    fn output_has_pdf_framing() {
        let bytes = write_document(&document_with(vec![]));
        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(find(&bytes, "%%EOF"));
        assert!(find(&bytes, "/Type /Catalog"));
        assert!(find(&bytes, "/Count 1"));
    }

    #[test]
    fn text_runs_are_escaped_and_encoded() {
        let bytes = write_document(&document_with(vec![DrawOp::Text {
            x: 10.0,
            y: 10.0,
            text: "A (tricky) — value".to_string(),
            style: FontStyle::Bold,
            size: 10.0,
            color: Color::rgb(0, 0, 0),
        }]));
        assert!(find(&bytes, "\\(tricky\\)"));
        assert!(find(&bytes, "\\227"), "em dash maps into WinAnsi");
        assert!(find(&bytes, "/F2"));
    }

    #[test]
    fn images_become_rgb_xobjects() {
        let bytes = write_document(&document_with(vec![DrawOp::Image {
            x: 25.0,
            y: 40.0,
            width: 50.0,
            height: 20.0,
            image: RasterImage {
                width: 2,
                height: 2,
                rgb: vec![255; 12],
            },
        }]));
        assert!(find(&bytes, "/Subtype /Image"));
        assert!(find(&bytes, "/ColorSpace /DeviceRGB"));
        assert!(find(&bytes, "/Im1 Do"));
    }

    #[test]
    fn page_count_matches_document() {
        let doc = LayoutDocument {
            page_width: 210.0,
            page_height: 297.0,
            pages: vec![Page::default(), Page::default(), Page::default()],
        };
        let bytes = write_document(&doc);
        assert!(find(&bytes, "/Count 3"));
    }
}
