//! Corner and feather mask synthesis.
//!
//! Both generators return full-frame [`AlphaMask`]s that start opaque (255) and only carve
//! transparency where their effect applies, so the two can be multiplied together in either
//! order by [`crate::effects::order`].

use kurbo::{Point, RoundedRect, Shape as _};

use crate::foundation::core::AlphaMask;
use crate::foundation::error::FrameResult;
use crate::foundation::math::mul_div255;
use crate::settings::model::FeatheringConfig;

/// Smoothstep `t² (3 - 2t)`, clamped to [0,1].
///
/// Monotonic on [0,1] with zero slope at both ends and `ease(0.5) == 0.5`.
pub fn ease(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Corner radius in pixels: `shortest_side * percent / 100`, truncated.
pub fn corner_radius_px(width: u32, height: u32, radius_percent: u32) -> u32 {
    let shortest = u64::from(width.min(height));
    (shortest * u64::from(radius_percent) / 100) as u32
}

/// Rounded-rectangle mask: 255 inside, 0 outside.
///
/// A pixel is inside when its centre lies inside the rounded rectangle spanning the whole frame.
/// A zero percentage, or one that truncates to a zero-pixel radius, yields an all-255 mask.
pub fn build_corner_mask(width: u32, height: u32, radius_percent: u32) -> FrameResult<AlphaMask> {
    let mut mask = AlphaMask::opaque(width, height)?;
    if radius_percent == 0 {
        return Ok(mask);
    }
    let r = corner_radius_px(width, height, radius_percent);
    if r == 0 {
        return Ok(mask);
    }

    let shape = RoundedRect::new(0.0, 0.0, f64::from(width), f64::from(height), f64::from(r));
    // Only the four r×r corner squares can fall outside the shape.
    let r = r.min(width).min(height);
    let xs = corner_span(width, r);
    let ys = corner_span(height, r);
    let w = width as usize;
    for &y in &ys {
        for &x in &xs {
            let centre = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if !shape.contains(centre) {
                mask.data[y as usize * w + x as usize] = 0;
            }
        }
    }
    Ok(mask)
}

/// Which end of an axis a feather band hugs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandEdge {
    /// Top or left: ramps 0 → 255 moving inward.
    Leading,
    /// Bottom or right: ramps 255 → 0 approaching the edge.
    Trailing,
}

/// Feather band width: `dimension * percent / 100`, truncated and capped at `dimension`.
pub fn band_px(dimension: u32, percent: u32) -> u32 {
    let n = u64::from(dimension) * u64::from(percent) / 100;
    n.min(u64::from(dimension)) as u32
}

/// One-dimensional profile of a single-side feather mask along its ramp axis.
///
/// Entries outside the band are 255. Bands of one pixel or less contribute nothing.
pub fn feather_profile(dimension: u32, percent: u32, edge: BandEdge) -> Vec<u8> {
    let mut profile = vec![255u8; dimension as usize];
    let n = band_px(dimension, percent);
    if n <= 1 {
        return profile;
    }
    let denom = f64::from(n - 1);
    let start = match edge {
        BandEdge::Leading => 0,
        BandEdge::Trailing => (dimension - n) as usize,
    };
    for i in 0..n {
        let e = ease(f64::from(i) / denom);
        let v = match edge {
            BandEdge::Leading => 255.0 * e,
            BandEdge::Trailing => 255.0 * (1.0 - e),
        };
        profile[start + i as usize] = v as u8;
    }
    profile
}

/// Directional feather mask: the product of the four single-side masks.
///
/// Pixels near two converging edges are attenuated by both.
pub fn build_feather_mask(
    width: u32,
    height: u32,
    feather: &FeatheringConfig,
) -> FrameResult<AlphaMask> {
    let mut mask = AlphaMask::opaque(width, height)?;
    if feather.is_none() {
        return Ok(mask);
    }

    let top = feather_profile(height, feather.top, BandEdge::Leading);
    let bottom = feather_profile(height, feather.bottom, BandEdge::Trailing);
    let left = feather_profile(width, feather.left, BandEdge::Leading);
    let right = feather_profile(width, feather.right, BandEdge::Trailing);

    let rows: Vec<u8> = top
        .iter()
        .zip(&bottom)
        .map(|(&t, &b)| mul_div255(t, b))
        .collect();
    let cols: Vec<u8> = left
        .iter()
        .zip(&right)
        .map(|(&l, &r)| mul_div255(l, r))
        .collect();

    for (row, &rv) in mask.data.chunks_exact_mut(width as usize).zip(&rows) {
        if rv == 255 {
            row.copy_from_slice(&cols);
            continue;
        }
        for (px, &cv) in row.iter_mut().zip(&cols) {
            *px = mul_div255(rv, cv);
        }
    }
    Ok(mask)
}

fn corner_span(dimension: u32, r: u32) -> Vec<u32> {
    let mut span: Vec<u32> = (0..r).collect();
    span.extend(dimension.saturating_sub(r).max(r)..dimension);
    span
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mask.rs"]
mod tests;
