//! Page-chrome rasterisation.
//!
//! The paginated-image export draws each page in two layers: the chrome
//! (panel fills, rules, badges) is painted into an RGBA raster here, then
//! the PDF assembler lays vector text on top. Rasterising at
//! [`RASTER_SCALE`] keeps the chrome crisp in print while the text stays
//! sharp at any zoom.
//!
//! [`PageRasterizer`] is the injectable seam: tests swap in a failing
//! implementation to exercise the pipeline's cleanup guarantees.

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::page::{BorderStyle, LayoutBox, PageLayout};

/// Fixed rasterisation fidelity: 2× the 96-dpi page raster, i.e. 192 dpi
/// chrome. Kept at or above 2.0 for print sharpness.
pub const RASTER_SCALE: f32 = 2.0;

/// Rasterisation failure, surfaced through the export pipeline.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct RasterError(pub String);

/// Turns one laid-out page into a chrome raster.
pub trait PageRasterizer {
    fn rasterize(
        &self,
        page: &PageLayout,
        page_width_px: f32,
        page_height_px: f32,
        scale: f32,
    ) -> Result<RgbaImage, RasterError>;
}

/// Default rasteriser: paints box fills and border rules with source-over
/// alpha blending. Text is left to the vector layer.
#[derive(Debug, Default)]
pub struct BoxPainter;

impl PageRasterizer for BoxPainter {
    fn rasterize(
        &self,
        page: &PageLayout,
        page_width_px: f32,
        page_height_px: f32,
        scale: f32,
    ) -> Result<RgbaImage, RasterError> {
        let width = (page_width_px * scale).round() as u32;
        let height = (page_height_px * scale).round() as u32;
        if width == 0 || height == 0 {
            return Err(RasterError(format!(
                "degenerate page raster {width}x{height}"
            )));
        }

        let mut img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        for lbox in &page.boxes {
            paint_box(&mut img, lbox, scale);
        }
        Ok(img)
    }
}

fn paint_box(img: &mut RgbaImage, lbox: &LayoutBox, scale: f32) {
    if let Some(bg) = &lbox.background_color {
        fill_rect(
            img,
            lbox.x * scale,
            lbox.y * scale,
            lbox.width * scale,
            lbox.height * scale,
            *bg,
        );
    }

    paint_edges(img, lbox, scale);

    for child in &lbox.children {
        paint_box(img, child, scale);
    }
}

fn paint_edges(img: &mut RgbaImage, lbox: &LayoutBox, scale: f32) {
    let (x, y, w, h) = (lbox.x, lbox.y, lbox.width, lbox.height);
    let edge = |img: &mut RgbaImage, b: &BorderStyle, ex: f32, ey: f32, ew: f32, eh: f32| {
        fill_rect(img, ex * scale, ey * scale, ew * scale, eh * scale, b.color);
    };
    if let Some(b) = &lbox.border_top {
        edge(img, b, x, y, w, b.width);
    }
    if let Some(b) = &lbox.border_bottom {
        edge(img, b, x, y + h - b.width, w, b.width);
    }
    if let Some(b) = &lbox.border_left {
        edge(img, b, x, y, b.width, h);
    }
    if let Some(b) = &lbox.border_right {
        edge(img, b, x + w - b.width, y, b.width, h);
    }
}

/// Source-over fill of an axis-aligned rectangle. Coordinates are clamped
/// to the image; fractional edges round outward by less than a pixel.
fn fill_rect(img: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, rgba: [f32; 4]) {
    if w <= 0.0 || h <= 0.0 || rgba[3] <= 0.0 {
        return;
    }
    let x0 = x.max(0.0).round() as u32;
    let y0 = y.max(0.0).round() as u32;
    let x1 = ((x + w).round() as i64).clamp(0, img.width() as i64) as u32;
    let y1 = ((y + h).round() as i64).clamp(0, img.height() as i64) as u32;

    let src = [
        (rgba[0] * 255.0).round().clamp(0.0, 255.0) as u8,
        (rgba[1] * 255.0).round().clamp(0.0, 255.0) as u8,
        (rgba[2] * 255.0).round().clamp(0.0, 255.0) as u8,
    ];
    let alpha = rgba[3].clamp(0.0, 1.0);

    for py in y0..y1 {
        for px in x0..x1 {
            let dst = img.get_pixel_mut(px, py);
            if alpha >= 1.0 {
                *dst = Rgba([src[0], src[1], src[2], 255]);
            } else {
                for ch in 0..3 {
                    let blended =
                        src[ch] as f32 * alpha + dst.0[ch] as f32 * (1.0 - alpha);
                    dst.0[ch] = blended.round().clamp(0.0, 255.0) as u8;
                }
                dst.0[3] = 255;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::LayoutBox;

    fn page_with(boxes: Vec<LayoutBox>) -> PageLayout {
        PageLayout {
            page_index: 0,
            boxes,
        }
    }

    #[test]
    fn blank_page_is_white() {
        let img = BoxPainter
            .rasterize(&page_with(vec![]), 100.0, 50.0, 2.0)
            .unwrap();
        assert_eq!(img.dimensions(), (200, 100));
        assert_eq!(img.get_pixel(10, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn background_fill_lands_scaled() {
        let mut lbox = LayoutBox::new(10.0, 10.0, 20.0, 20.0);
        lbox.background_color = Some([0.0, 0.0, 1.0, 1.0]);
        let img = BoxPainter
            .rasterize(&page_with(vec![lbox]), 100.0, 100.0, 2.0)
            .unwrap();
        // Inside the box (doubled coordinates).
        assert_eq!(img.get_pixel(30, 30).0, [0, 0, 255, 255]);
        // Outside stays white.
        assert_eq!(img.get_pixel(5, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn translucent_fill_blends_over_base() {
        let mut base = LayoutBox::new(0.0, 0.0, 50.0, 50.0);
        base.background_color = Some([0.0, 0.0, 0.0, 1.0]);
        let mut veil = LayoutBox::new(0.0, 0.0, 50.0, 50.0);
        veil.background_color = Some([1.0, 1.0, 1.0, 0.5]);
        let img = BoxPainter
            .rasterize(&page_with(vec![base, veil]), 50.0, 50.0, 1.0)
            .unwrap();
        let px = img.get_pixel(25, 25).0;
        assert!(px[0] > 100 && px[0] < 155, "expected mid grey, got {px:?}");
    }

    #[test]
    fn border_left_paints_a_rule() {
        let mut lbox = LayoutBox::new(10.0, 0.0, 40.0, 40.0);
        lbox.border_left = Some(crate::page::BorderStyle {
            width: 3.0,
            color: [1.0, 0.0, 0.0, 1.0],
        });
        let img = BoxPainter
            .rasterize(&page_with(vec![lbox]), 60.0, 60.0, 1.0)
            .unwrap();
        assert_eq!(img.get_pixel(11, 20).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(30, 20).0, [255, 255, 255, 255]);
    }

    #[test]
    fn degenerate_page_errors() {
        let err = BoxPainter.rasterize(&page_with(vec![]), 0.0, 10.0, 2.0);
        assert!(err.is_err());
    }
}
