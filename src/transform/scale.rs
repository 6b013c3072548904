use image::imageops::FilterType;

use crate::foundation::core::RasterImage;
use crate::foundation::error::{FrameError, FrameResult};
use crate::settings::model::{ScalingConfig, ScalingMode};

/// Target geometry produced by [`compute_target`].
///
/// At most one side is `None`, meaning "derive from the other side, keeping the aspect ratio".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleTarget {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ScaleTarget {
    pub fn exact(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// ffmpeg `scale` filter for this target, `-1` standing in for a derived side.
    ///
    /// Zero-sized sides are treated as unspecified; `None` when neither side is positive.
    pub fn filter_expr(self) -> Option<String> {
        let w = self.width.filter(|&v| v > 0);
        let h = self.height.filter(|&v| v > 0);
        match (w, h) {
            (Some(w), Some(h)) => Some(format!("scale={w}:{h}")),
            (Some(w), None) => Some(format!("scale={w}:-1")),
            (None, Some(h)) => Some(format!("scale=-1:{h}")),
            (None, None) => None,
        }
    }

    /// Concrete `(width, height)` for a source of size `original`.
    ///
    /// A derived side is `floor(other_orig * target / anchor_orig)`.
    pub fn resolve(self, original: (u32, u32)) -> FrameResult<(u32, u32)> {
        let (orig_w, orig_h) = original;
        if orig_w == 0 || orig_h == 0 {
            return Err(FrameError::geometry(format!(
                "cannot resolve scale target for {orig_w}x{orig_h} source"
            )));
        }
        match (self.width, self.height) {
            (Some(w), Some(h)) => Ok((w, h)),
            (Some(w), None) => Ok((w, derive(orig_h, w, orig_w))),
            (None, Some(h)) => Ok((derive(orig_w, h, orig_h), h)),
            (None, None) => Ok((orig_w, orig_h)),
        }
    }
}

/// Compute the target geometry for `original` under `cfg`.
///
/// Returns `None` when scaling is disabled or either original side is zero.
pub fn compute_target(original: (u32, u32), cfg: &ScalingConfig) -> Option<ScaleTarget> {
    if !cfg.enabled {
        return None;
    }
    let (orig_w, orig_h) = original;
    if orig_w == 0 || orig_h == 0 {
        return None;
    }
    Some(target_for_mode(cfg.mode, (orig_w, orig_h), cfg))
}

fn target_for_mode(mode: ScalingMode, original: (u32, u32), cfg: &ScalingConfig) -> ScaleTarget {
    let (w, h) = (f64::from(original.0), f64::from(original.1));
    match mode {
        ScalingMode::WidthAnchored => ScaleTarget {
            width: Some(cfg.a_width),
            height: None,
        },
        ScalingMode::HeightAnchored => ScaleTarget {
            width: None,
            height: Some(cfg.b_height),
        },
        ScalingMode::WidthAnchoredHeightCapped => {
            let (limit_w, limit_h) = (f64::from(cfg.c_width), f64::from(cfg.c_height));
            let (mut new_w, mut new_h) = (limit_w, h * (limit_w / w));
            if new_h > limit_h {
                new_h = limit_h;
                new_w = w * (limit_h / h);
            }
            ScaleTarget::exact(trunc(new_w), trunc(new_h))
        }
        ScalingMode::HeightAnchoredWidthCapped => {
            let (limit_w, limit_h) = (f64::from(cfg.d_width), f64::from(cfg.d_height));
            let (mut new_w, mut new_h) = (w * (limit_h / h), limit_h);
            if new_w > limit_w {
                new_w = limit_w;
                new_h = h * (limit_w / w);
            }
            ScaleTarget::exact(trunc(new_w), trunc(new_h))
        }
        ScalingMode::Percent => {
            let pct = |side: u32| (u64::from(side) * u64::from(cfg.e_percent) / 100) as u32;
            ScaleTarget::exact(pct(original.0), pct(original.1))
        }
    }
}

/// Resolve every mode against `original`, ignoring `cfg.mode` and `cfg.enabled`.
///
/// Empty when either original side is zero.
pub fn preview_all(original: (u32, u32), cfg: &ScalingConfig) -> Vec<(ScalingMode, (u32, u32))> {
    if original.0 == 0 || original.1 == 0 {
        return Vec::new();
    }
    ScalingMode::ALL
        .into_iter()
        .filter_map(|mode| {
            target_for_mode(mode, original, cfg)
                .resolve(original)
                .ok()
                .map(|size| (mode, size))
        })
        .collect()
}

/// Resize an already-decoded frame to `target` (Lanczos3).
///
/// A target that resolves to the frame's own size returns the frame untouched.
pub fn resize(frame: RasterImage, target: ScaleTarget) -> FrameResult<RasterImage> {
    let (w, h) = target.resolve(frame.dimensions())?;
    if w == 0 || h == 0 {
        return Err(FrameError::geometry(format!(
            "scale target {w}x{h} has a zero side"
        )));
    }
    if (w, h) == frame.dimensions() {
        return Ok(frame);
    }
    let src = frame.into_rgba_image()?;
    let out = image::imageops::resize(&src, w, h, FilterType::Lanczos3);
    RasterImage::from_rgba_image(out)
}

fn derive(other_orig: u32, anchor_target: u32, anchor_orig: u32) -> u32 {
    trunc(f64::from(other_orig) * f64::from(anchor_target) / f64::from(anchor_orig))
}

fn trunc(v: f64) -> u32 {
    // `as` saturates; values here are finite and non-negative.
    v.trunc() as u32
}

#[cfg(test)]
#[path = "../../tests/unit/transform/scale.rs"]
mod tests;
