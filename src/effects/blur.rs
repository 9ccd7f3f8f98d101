use crate::foundation::core::Bitmap;
use crate::foundation::error::{ForgeError, ForgeResult};

/// Separable gaussian blur over premultiplied RGBA8, with edge pixels clamped.
///
/// `radius == 0` is the identity. Weights are quantized to Q16 so results are deterministic.
pub fn blur_premul(src: &Bitmap, radius: u32, sigma: f32) -> ForgeResult<Bitmap> {
    let kernel = gaussian_kernel_q16(radius, sigma)?;
    if kernel.len() == 1 {
        return Ok(src.clone());
    }

    let (w, h) = (src.width(), src.height());
    let mut tmp = Bitmap::new(w, h)?;
    let mut out = Bitmap::new(w, h)?;
    horizontal_q16(src.data(), tmp.data_mut(), w, h, &kernel);
    vertical_q16(tmp.data(), out.data_mut(), w, h, &kernel);
    Ok(out)
}

/// Kernel radius matching a `radius x sigma` blur request where radius 0 means "derive it".
pub fn effective_radius(radius: f32, sigma: f32) -> u32 {
    if radius >= 1.0 {
        return radius.round() as u32;
    }
    (3.0 * sigma).ceil().max(0.0) as u32
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ForgeResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ForgeError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(ForgeError::validation("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push the rounding residue into the center tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
