use crate::foundation::error::{ForgeError, ForgeResult};

/// Integer rectangle in canvas pixel space.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IntRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    /// Overlap of two rectangles, `None` when they do not share a pixel.
    pub fn intersect(self, other: IntRect) -> Option<IntRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(IntRect::new(
            x0,
            y0,
            x1.saturating_sub(x0),
            y1.saturating_sub(y0),
        ))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Row-major premultiplied RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Allocate a fully transparent buffer.
    ///
    /// Zero-sized or overflowing dimensions and failed reservations are reported as
    /// [`ForgeError::Allocation`].
    pub fn new(width: u32, height: u32) -> ForgeResult<Self> {
        if width == 0 || height == 0 {
            return Err(ForgeError::allocation(format!(
                "bitmap dimensions must be > 0 (got {width}x{height})"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ForgeError::allocation("bitmap buffer size overflow"))?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            ForgeError::allocation(format!("cannot allocate {width}x{height} bitmap: {e}"))
        })?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Allocate a buffer filled with one pixel value.
    pub fn filled(width: u32, height: u32, px: Rgba8Premul) -> ForgeResult<Self> {
        let mut out = Self::new(width, height)?;
        out.fill(px);
        Ok(out)
    }

    /// Wrap already premultiplied bytes.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> ForgeResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4));
        if width == 0 || height == 0 || expected != Some(data.len()) {
            return Err(ForgeError::validation(format!(
                "bitmap byte len {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> IntRect {
        IntRect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    pub fn fill(&mut self, px: Rgba8Premul) {
        let px = px.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Replace the pixels of `rect` (clipped to the buffer) with `px`.
    pub fn fill_rect(&mut self, rect: IntRect, px: Rgba8Premul) {
        let Some(r) = rect.intersect(self.bounds()) else {
            return;
        };
        let px = px.to_array();
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                self.set_pixel(x as u32, y as u32, px);
            }
        }
    }

    /// Copy `rect` into a new buffer of its size; parts outside this buffer become `background`.
    pub fn crop(&self, rect: IntRect, background: Rgba8Premul) -> ForgeResult<Bitmap> {
        let (w, h) = (rect.w.max(0) as u32, rect.h.max(0) as u32);
        let mut out = Self::filled(w, h, background)?;
        if let Some(r) = rect.intersect(self.bounds()) {
            for y in r.y..r.bottom() {
                for x in r.x..r.right() {
                    let px = self.pixel(x as u32, y as u32);
                    out.set_pixel((x - rect.x) as u32, (y - rect.y) as u32, px);
                }
            }
        }
        Ok(out)
    }

    /// Whether every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }
}

/// The render target owned by the pipeline for the duration of one render.
#[derive(Clone, Debug)]
pub struct Canvas {
    /// Current pixel buffer; replaced wholesale by scale, crop and masked composites.
    pub bitmap: Bitmap,
    /// Whether the canvas keeps a real alpha channel (transparent background).
    pub preserve_alpha: bool,
    /// Color keyed out as transparent during finalization, if any.
    pub transparent_color: Option<[u8; 3]>,
}

impl Canvas {
    pub fn new(bitmap: Bitmap, preserve_alpha: bool) -> Self {
        Self {
            bitmap,
            preserve_alpha,
            transparent_color: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
