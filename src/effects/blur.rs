use crate::foundation::core::AlphaMask;
use crate::foundation::error::{FrameError, FrameResult};

/// Gaussian blur of a mask with standard deviation `sigma` pixels.
///
/// Below [`BOX_BLUR_MIN_SIGMA`] the kernel spans `3 * sigma` taps on each side. From there on
/// three box passes of matching variance stand in for it, costing the same at any sigma.
/// `sigma == 0` is the identity. Edges clamp to the nearest in-bounds sample.
pub fn gaussian_blur(mask: &AlphaMask, sigma: u32) -> FrameResult<AlphaMask> {
    if sigma == 0 {
        return Ok(mask.clone());
    }
    if sigma >= BOX_BLUR_MIN_SIGMA {
        let data = box_blur_gray8(&mask.data, mask.width, mask.height, f64::from(sigma))?;
        return AlphaMask::from_raw(mask.width, mask.height, data);
    }
    let radius = sigma.saturating_mul(3);
    let data = blur_gray8(&mask.data, mask.width, mask.height, radius, sigma as f32)?;
    AlphaMask::from_raw(mask.width, mask.height, data)
}

/// Sigma at which [`gaussian_blur`] switches to the box approximation.
pub const BOX_BLUR_MIN_SIGMA: u32 = 8;

pub fn blur_gray8(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> FrameResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| FrameError::geometry("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(FrameError::geometry(
            "blur_gray8 expects src matching width*height",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Three box blurs approximating a Gaussian of `sigma`, each O(1) per pixel.
pub fn box_blur_gray8(src: &[u8], width: u32, height: u32, sigma: f64) -> FrameResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| FrameError::geometry("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(FrameError::geometry(
            "box_blur_gray8 expects src matching width*height",
        ));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FrameError::validation("blur sigma must be > 0"));
    }
    if expected_len == 0 {
        return Ok(Vec::new());
    }

    let radii = box_radii(sigma);
    let pad: usize = radii.iter().sum();
    let (w, h) = (width as usize, height as usize);
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];
    let mut samples = Vec::with_capacity(w.max(h));
    let mut line = Vec::new();
    let mut scratch = Vec::new();

    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        smooth_line(row, &radii, pad, &mut line, &mut scratch);
        tmp[y * w..(y + 1) * w].copy_from_slice(&line[pad..pad + w]);
    }
    for x in 0..w {
        samples.clear();
        samples.extend((0..h).map(|y| tmp[y * w + x]));
        smooth_line(&samples, &radii, pad, &mut line, &mut scratch);
        for (y, &v) in line[pad..pad + h].iter().enumerate() {
            out[y * w + x] = v;
        }
    }
    Ok(out)
}

// Box widths for three passes whose variances sum to sigma^2 (odd widths, at most two sizes).
fn box_radii(sigma: f64) -> [usize; 3] {
    const PASSES: f64 = 3.0;
    let var = 12.0 * sigma * sigma;
    let ideal = (var / PASSES + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let lf = lower as f64;
    let small = ((var - PASSES * lf * lf - 4.0 * PASSES * lf - 3.0 * PASSES) / (-4.0 * lf - 4.0))
        .round()
        .clamp(0.0, PASSES) as usize;

    let mut radii = [0usize; 3];
    for (i, r) in radii.iter_mut().enumerate() {
        let width = if i < small { lower } else { upper };
        *r = (width as usize - 1) / 2;
    }
    radii
}

// All three passes over one line. The line is padded once by the combined radius so the
// edge clamps to the original end samples, not to values an earlier pass already smeared.
fn smooth_line(
    samples: &[u8],
    radii: &[usize; 3],
    pad: usize,
    line: &mut Vec<u8>,
    scratch: &mut Vec<u8>,
) {
    let (Some(&first), Some(&last)) = (samples.first(), samples.last()) else {
        line.clear();
        return;
    };
    line.clear();
    line.extend(std::iter::repeat_n(first, pad));
    line.extend_from_slice(samples);
    line.extend(std::iter::repeat_n(last, pad));
    for &radius in radii {
        box_pass(line, scratch, radius);
        std::mem::swap(line, scratch);
    }
}

// Sliding-window mean, rounded, clamping past either end.
fn box_pass(src: &[u8], dst: &mut Vec<u8>, radius: usize) {
    dst.clear();
    let n = src.len() as i64;
    let at = |i: i64| u32::from(src[i.clamp(0, n - 1) as usize]);
    let r = radius as i64;
    let window = 2 * radius as u32 + 1;

    let mut acc: u32 = (-r..=r).map(at).sum();
    for x in 0..n {
        dst.push(((acc + window / 2) / window) as u8);
        acc = acc + at(x + r + 1) - at(x - r);
    }
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> FrameResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FrameError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(FrameError::geometry("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Rounding drift goes into the centre tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    for y in 0..i64::from(height) {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i64 - radius).clamp(0, w - 1) as usize;
                acc += u64::from(kw) * u64::from(src[row + sx]);
            }
            dst[row + x as usize] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = width as usize;
    let h = i64::from(height);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i64 - radius).clamp(0, h - 1) as usize;
                acc += u64::from(kw) * u64::from(src[sy * w + x]);
            }
            dst[y as usize * w + x] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
