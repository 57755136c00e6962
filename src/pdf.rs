//! PDF assembly – takes a paginated [`DocumentLayout`] and produces PDF
//! bytes using `printpdf` (v0.8 ops-based API).
//!
//! Each page is built in two layers: the chrome raster from the
//! [`PageRasterizer`] is embedded full-bleed (pages have zero margin), then
//! text runs are written as vector ops with the builtin WinAnsi faces, so
//! glyphs stay sharp at any zoom while panels and rules keep their exact
//! on-screen colours.

use std::io::Cursor;

use printpdf::*;

use crate::export::ExportError;
use crate::fonts::FontClass;
use crate::page::{DocumentLayout, LayoutBox};
use crate::raster::PageRasterizer;

/// CSS px (96 dpi) → PDF pt (72 dpi).
pub const PX_TO_PT: f32 = 0.75;

const PT_TO_MM: f32 = 0.352778;

/// Assemble the final PDF: one full-bleed chrome raster per page plus the
/// vector text layer.
pub fn assemble_pdf(
    layout: &DocumentLayout,
    rasterizer: &dyn PageRasterizer,
    scale: f32,
) -> Result<Vec<u8>, ExportError> {
    let page_w_pt = layout.page_width_px * PX_TO_PT;
    let page_h_pt = layout.page_height_px * PX_TO_PT;
    let page_w = Mm(page_w_pt * PT_TO_MM);
    let page_h = Mm(page_h_pt * PT_TO_MM);

    let mut doc = PdfDocument::new(&layout.title);
    let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();
    let mut pages = Vec::new();

    for page_layout in &layout.pages {
        let raster = rasterizer.rasterize(
            page_layout,
            layout.page_width_px,
            layout.page_height_px,
            scale,
        )?;
        let (raster_w, raster_h) = raster.dimensions();

        let mut png_bytes: Vec<u8> = Vec::new();
        ::image::DynamicImage::ImageRgba8(raster)
            .write_to(&mut Cursor::new(&mut png_bytes), ::image::ImageFormat::Png)
            .map_err(|e| ExportError::Assembly(format!("chrome raster encode failed: {e}")))?;

        let raw = RawImage::decode_from_bytes(&png_bytes, &mut img_warnings)
            .map_err(|e| ExportError::Assembly(format!("chrome raster embed failed: {e}")))?;
        let xobj_id = doc.add_image(&raw);

        let mut ops = Vec::new();
        // At dpi=72 printpdf renders 1 px = 1 pt, so scaling the raster to
        // the page is desired_pt / raster_px.
        ops.push(Op::UseXobject {
            id: xobj_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                dpi: Some(72.0),
                scale_x: Some(if raster_w > 0 {
                    page_w_pt / raster_w as f32
                } else {
                    1.0
                }),
                scale_y: Some(if raster_h > 0 {
                    page_h_pt / raster_h as f32
                } else {
                    1.0
                }),
                rotate: None,
            },
        });

        for lbox in &page_layout.boxes {
            write_text_ops(&mut ops, lbox, page_h_pt);
        }

        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }
    log::debug!("assembled pdf: {} page(s)", pages.len());

    doc.with_pages(pages);
    Ok(doc.save(&PdfSaveOptions::default(), &mut Vec::new()))
}

/// Pick the builtin face for a font stack.
fn builtin_font(family: &str, bold: bool, italic: bool) -> BuiltinFont {
    match (FontClass::of_family(family), bold, italic) {
        (FontClass::Serif, true, true) => BuiltinFont::TimesBoldItalic,
        (FontClass::Serif, true, false) => BuiltinFont::TimesBold,
        (FontClass::Serif, false, true) => BuiltinFont::TimesItalic,
        (FontClass::Serif, false, false) => BuiltinFont::TimesRoman,
        (FontClass::Sans, true, true) => BuiltinFont::HelveticaBoldOblique,
        (FontClass::Sans, true, false) => BuiltinFont::HelveticaBold,
        (FontClass::Sans, false, true) => BuiltinFont::HelveticaOblique,
        (FontClass::Sans, false, false) => BuiltinFont::Helvetica,
    }
}

/// Recursively write the text runs of a box tree into PDF ops.
///
/// Box coordinates are page-absolute px with a top-left origin; PDF wants
/// pt with a bottom-left origin.
fn write_text_ops(ops: &mut Vec<Op>, lbox: &LayoutBox, page_h_pt: f32) {
    if let Some(text) = &lbox.text {
        let font = builtin_font(&text.font_family, text.bold, text.italic);
        let font_size_pt = text.font_size * PX_TO_PT;

        for tline in &text.lines {
            if tline.text.is_empty() {
                continue;
            }
            let text_x = (lbox.x + tline.x_offset) * PX_TO_PT;
            // Baseline ≈ top of line + ascender (approx 0.75 × font size).
            let text_y =
                page_h_pt - (lbox.y + tline.y_offset) * PX_TO_PT - font_size_pt * 0.75;

            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(text_x),
                    y: Pt(text_y),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(font_size_pt),
                font,
            });
            ops.push(Op::SetLineHeight {
                lh: Pt(text.line_height * PX_TO_PT),
            });
            ops.push(Op::SetFillColor {
                col: Color::Rgb(Rgb {
                    r: text.color[0],
                    g: text.color[1],
                    b: text.color[2],
                    icc_profile: None,
                }),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(to_winlatin(&tline.text))],
                font,
            });
            ops.push(Op::EndTextSection);
        }

        // List marker in the left gutter.
        if let Some(marker) = &text.list_marker {
            let marker_x = (lbox.x - 14.0) * PX_TO_PT;
            let marker_y = page_h_pt - lbox.y * PX_TO_PT - font_size_pt * 0.75;
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(marker_x),
                    y: Pt(marker_y),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(font_size_pt),
                font,
            });
            ops.push(Op::SetFillColor {
                col: Color::Rgb(Rgb {
                    r: text.color[0],
                    g: text.color[1],
                    b: text.color[2],
                    icc_profile: None,
                }),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(to_winlatin(marker))],
                font,
            });
            ops.push(Op::EndTextSection);
        }
    }

    for child in &lbox.children {
        write_text_ops(ops, child, page_h_pt);
    }
}

/// Convert a UTF-8 string to raw Windows-1252 bytes wrapped in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts
/// use WinAnsiEncoding: one byte per glyph, 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{25C6}' => 0x95, // diamond marker -> bullet
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for the 0x80-0x9F range; printpdf
    // passes these bytes straight through, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{BoxPainter, RASTER_SCALE};

    #[test]
    fn empty_layout_still_produces_a_pdf() {
        let layout = DocumentLayout::a4();
        let bytes = assemble_pdf(&layout, &BoxPainter, RASTER_SCALE).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn serif_stacks_map_to_times() {
        assert!(matches!(
            builtin_font("'Georgia', serif", false, false),
            BuiltinFont::TimesRoman
        ));
        assert!(matches!(
            builtin_font("'Segoe UI', sans-serif", true, false),
            BuiltinFont::HelveticaBold
        ));
    }

    #[test]
    fn winlatin_substitutes_out_of_range_glyphs() {
        let s = to_winlatin("a\u{2022}b\u{4E2D}");
        let bytes = s.as_bytes();
        assert_eq!(bytes[0], b'a');
        assert_eq!(bytes[1], 0x95);
        assert_eq!(bytes[3], b'?');
    }
}
