use std::io::Cursor;
use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{Bitmap, Rgba8Premul};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::foundation::math::{mul_div255_u16, premultiply, unpremultiply};

/// Raster output formats selectable by file extension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Gif,
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Map a requested extension (`gif`, `png`, `jpg`, `jpeg`) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "gif" => Some(Self::Gif),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Whether the format can carry (at least binary) transparency.
    pub fn supports_transparency(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> ForgeResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    from_straight_rgba(dyn_img.to_rgba8())
}

/// Premultiply a straight-alpha `image` buffer into a [`Bitmap`].
pub(crate) fn from_straight_rgba(rgba: image::RgbaImage) -> ForgeResult<Bitmap> {
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let p = premultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&p);
    }
    Bitmap::from_premul(width, height, data)
}

/// Straight-alpha copy of `bitmap` for `image` codecs and `imageops`.
pub(crate) fn to_straight_rgba(bitmap: &Bitmap) -> ForgeResult<image::RgbaImage> {
    let mut straight = Vec::with_capacity(bitmap.data().len());
    for px in bitmap.data().chunks_exact(4) {
        straight.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
    }
    image::RgbaImage::from_raw(bitmap.width(), bitmap.height(), straight)
        .ok_or_else(|| ForgeError::validation("bitmap dimensions do not match pixel data"))
}

/// Resample to `width`×`height`, ignoring the aspect ratio.
pub fn resize_premul(src: &Bitmap, width: u32, height: u32) -> ForgeResult<Bitmap> {
    let (width, height) = (width.max(1), height.max(1));
    // `imageops::resize` aborts when its buffer cannot be allocated; reserve the target first
    let mut out = Bitmap::new(width, height)?;
    // premultiplied samples resize without color bleeding from transparent pixels
    let premul = image::RgbaImage::from_raw(src.width(), src.height(), src.data().to_vec())
        .ok_or_else(|| ForgeError::validation("bitmap dimensions do not match pixel data"))?;
    let resized =
        image::imageops::resize(&premul, width, height, image::imageops::FilterType::Triangle);
    out.data_mut().copy_from_slice(resized.as_raw());
    Ok(out)
}

pub fn load_image_file(path: &Path) -> ForgeResult<Bitmap> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image bytes from '{}'", path.display()))
        .map_err(|e| ForgeError::resource(format!("{e:#}")))?;
    decode_image(&bytes).map_err(|e| {
        ForgeError::resource(format!("decode image '{}': {e}", path.display()))
    })
}

/// Encode a bitmap. JPEG output is flattened onto `matte` since it has no alpha channel.
pub fn encode_image(
    bitmap: &Bitmap,
    format: OutputFormat,
    quality: u8,
    matte: Rgba8Premul,
) -> ForgeResult<Vec<u8>> {
    let rgba = to_straight_rgba(bitmap)?;

    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            image::DynamicImage::ImageRgba8(rgba)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .context("encode png")?;
        }
        OutputFormat::Gif => {
            let frame = image::Frame::new(binary_alpha(rgba));
            let mut encoder = image::codecs::gif::GifEncoder::new(&mut buf);
            encoder.encode_frame(frame).context("encode gif")?;
        }
        OutputFormat::Jpeg => {
            let flat = flatten(bitmap, matte);
            let rgb = image::DynamicImage::ImageRgba8(flat).to_rgb8();
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
            encoder
                .encode(
                    rgb.as_raw(),
                    bitmap.width(),
                    bitmap.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .context("encode jpeg")?;
        }
    }
    Ok(buf)
}

pub fn write_image_file(
    bitmap: &Bitmap,
    path: &Path,
    format: OutputFormat,
    quality: u8,
) -> ForgeResult<()> {
    let bytes = encode_image(bitmap, format, quality, Rgba8Premul::opaque(255, 255, 255))?;
    std::fs::write(path, bytes)
        .with_context(|| format!("write image to '{}'", path.display()))
        .map_err(|e| ForgeError::resource(format!("{e:#}")))
}

fn binary_alpha(mut rgba: image::RgbaImage) -> image::RgbaImage {
    for px in rgba.pixels_mut() {
        px.0[3] = if px.0[3] >= 128 { 255 } else { 0 };
    }
    rgba
}

fn flatten(bitmap: &Bitmap, matte: Rgba8Premul) -> image::RgbaImage {
    let m = matte.to_array();
    let mut out = Vec::with_capacity(bitmap.data().len());
    for px in bitmap.data().chunks_exact(4) {
        let inv = 255u16 - u16::from(px[3]);
        for c in 0..3 {
            let v = u16::from(px[c]) + mul_div255_u16(u16::from(m[c]), inv);
            out.push(v.min(255) as u8);
        }
        out.push(255);
    }
    image::RgbaImage::from_raw(bitmap.width(), bitmap.height(), out)
        .unwrap_or_else(|| image::RgbaImage::new(bitmap.width(), bitmap.height()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
