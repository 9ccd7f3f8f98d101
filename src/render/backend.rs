use std::path::{Path, PathBuf};

use kurbo::{Affine, Point};

use crate::assets::color::ColorSpec;
use crate::assets::decode::{OutputFormat, load_image_file, write_image_file};
use crate::effects::composite::over;
use crate::effects::levels::{LevelsOp, apply_levels};
use crate::foundation::core::{Bitmap, Canvas, IntRect, Rgba8Premul};
use crate::foundation::error::ForgeResult;

/// Eight-point glyph box relative to the pen origin: lower-left, lower-right, upper-right,
/// upper-left, each as `x, y` with y growing downwards.
pub type Quad = [i32; 8];

/// Font, pixel size and rotation for one measured or drawn string.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphStyle {
    pub font: PathBuf,
    /// Font size in pixels.
    pub size: f32,
    /// Counter-clockwise rotation in degrees.
    pub angle: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextPaint {
    pub color: ColorSpec,
    pub antialias: bool,
}

/// Pixel primitives the compositing core calls into.
///
/// Measuring and drawing text must be implemented; the remaining primitives have portable
/// software defaults that backends may replace.
pub trait RasterBackend {
    /// Allocate a transparent buffer. Failure here is fatal for the render.
    fn allocate(&mut self, width: u32, height: u32) -> ForgeResult<Bitmap> {
        Bitmap::new(width, height)
    }

    /// Replace the pixels of `rect` with `color`.
    fn fill(&mut self, dst: &mut Bitmap, rect: IntRect, color: Rgba8Premul) {
        dst.fill_rect(rect, color);
    }

    /// Blend a filled rectangle over `dst`.
    fn draw_filled_rect(&mut self, dst: &mut Bitmap, rect: IntRect, color: Rgba8Premul) {
        let Some(r) = rect.intersect(dst.bounds()) else {
            return;
        };
        let src = color.to_array();
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                let d = dst.pixel(x as u32, y as u32);
                dst.set_pixel(x as u32, y as u32, over(d, src, 1.0));
            }
        }
    }

    /// Blend a filled ellipse of `size` (full width/height) centered at `center`.
    fn draw_filled_ellipse(
        &mut self,
        dst: &mut Bitmap,
        center: (i32, i32),
        size: (i32, i32),
        color: Rgba8Premul,
    ) {
        let (rx, ry) = (f64::from(size.0) / 2.0, f64::from(size.1) / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let bounds = IntRect::new(
            center.0 - rx.ceil() as i32,
            center.1 - ry.ceil() as i32,
            size.0 + 2,
            size.1 + 2,
        );
        let Some(r) = bounds.intersect(dst.bounds()) else {
            return;
        };
        let src = color.to_array();
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                let nx = (f64::from(x) + 0.5 - f64::from(center.0)) / rx;
                let ny = (f64::from(y) + 0.5 - f64::from(center.1)) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    let d = dst.pixel(x as u32, y as u32);
                    dst.set_pixel(x as u32, y as u32, over(d, src, 1.0));
                }
            }
        }
    }

    fn load_image(&mut self, path: &Path) -> ForgeResult<Bitmap> {
        load_image_file(path)
    }

    fn write_image(
        &mut self,
        bitmap: &Bitmap,
        path: &Path,
        format: OutputFormat,
        quality: u8,
    ) -> ForgeResult<()> {
        write_image_file(bitmap, path, format, quality)
    }

    /// Glyph box of `text` drawn with `style` at the origin.
    fn measure_text(&mut self, style: &GlyphStyle, text: &str) -> ForgeResult<Quad>;

    /// Draw `text` with its first baseline starting at `origin`.
    fn draw_text(
        &mut self,
        dst: &mut Bitmap,
        style: &GlyphStyle,
        origin: (i32, i32),
        paint: TextPaint,
        text: &str,
    ) -> ForgeResult<()>;

    /// Key `rgb` out: matching opaque pixels become transparent and the canvas remembers it.
    fn set_color_transparent(&mut self, canvas: &mut Canvas, rgb: [u8; 3]) {
        for px in canvas.bitmap.data_mut().chunks_exact_mut(4) {
            if px[3] == 255 && px[..3] == rgb {
                px.copy_from_slice(&[0, 0, 0, 0]);
            }
        }
        canvas.transparent_color = Some(rgb);
    }

    fn levels_adjust(&mut self, bitmap: &mut Bitmap, op: LevelsOp) {
        apply_levels(bitmap, op);
    }
}

/// Counter-clockwise rotation in y-down pixel space.
pub fn text_rotation(angle_deg: i32) -> Affine {
    if angle_deg == 0 {
        Affine::IDENTITY
    } else {
        Affine::rotate(-f64::from(angle_deg).to_radians())
    }
}

/// Glyph-space to canvas transform for a first baseline at `baseline` below the layout top.
pub fn glyph_transform(origin: (i32, i32), angle_deg: i32, baseline: f64) -> Affine {
    Affine::translate((f64::from(origin.0), f64::from(origin.1)))
        * text_rotation(angle_deg)
        * Affine::translate((0.0, -baseline))
}

/// Build a [`Quad`] from an unrotated advance box, rotated counter-clockwise by `angle_deg`.
pub fn text_quad(width: f64, ascent: f64, descent: f64, angle_deg: i32) -> Quad {
    let rotation = text_rotation(angle_deg);
    let corners = [
        Point::new(0.0, descent),
        Point::new(width, descent),
        Point::new(width, -ascent),
        Point::new(0.0, -ascent),
    ];
    let mut out = [0i32; 8];
    for (i, corner) in corners.into_iter().enumerate() {
        let p = rotation * corner;
        out[i * 2] = p.x.round() as i32;
        out[i * 2 + 1] = p.y.round() as i32;
    }
    out
}
