use crate::foundation::core::RasterImage;
use crate::foundation::error::{FrameError, FrameResult};
use crate::foundation::math::percent_to_u8;
use crate::settings::model::CompositionConfig;

/// Top-left placement of a `frame`-sized image centred on a `canvas`-sized one.
///
/// Uses floor division, so offsets go negative when the frame is larger than the canvas.
pub fn paste_offset(canvas: (u32, u32), frame: (u32, u32)) -> (i64, i64) {
    let dx = i64::from(canvas.0) - i64::from(frame.0);
    let dy = i64::from(canvas.1) - i64::from(frame.1);
    (dx.div_euclid(2), dy.div_euclid(2))
}

/// Background canvas for `cfg`: its colour at `round(255 * opacity / 100)` alpha.
pub fn background(cfg: &CompositionConfig) -> FrameResult<RasterImage> {
    if cfg.width == 0 || cfg.height == 0 {
        return Err(FrameError::geometry(format!(
            "canvas must be non-empty, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    let alpha = percent_to_u8(cfg.bg_opacity);
    RasterImage::filled(cfg.width, cfg.height, cfg.bg_color.with_alpha(alpha))
}

/// Centre `frame` on a fresh background canvas with straight-alpha "over".
///
/// The frame's own alpha weights it against the background. Parts of the frame falling outside
/// the canvas are clipped on each axis independently.
pub fn compose(frame: RasterImage, cfg: &CompositionConfig) -> FrameResult<RasterImage> {
    let mut canvas = background(cfg)?;
    paste_masked(&mut canvas, &frame)?;
    Ok(canvas)
}

/// Paste `src` centred over `dst` in place.
pub fn paste_masked(dst: &mut RasterImage, src: &RasterImage) -> FrameResult<()> {
    let (ox, oy) = paste_offset(dst.dimensions(), src.dimensions());
    let Some((sx, dx, run)) = clip_axis(ox, src.width, dst.width) else {
        return Ok(());
    };
    let Some((sy, dy, rows)) = clip_axis(oy, src.height, dst.height) else {
        return Ok(());
    };

    let src_stride = src.width as usize * 4;
    let dst_stride = dst.width as usize * 4;
    for row in 0..rows {
        let s_off = (sy + row) * src_stride + sx * 4;
        let d_off = (dy + row) * dst_stride + dx * 4;
        let s_row = &src.data[s_off..s_off + run * 4];
        let d_row = &mut dst.data[d_off..d_off + run * 4];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            blend_straight(d, s);
        }
    }
    Ok(())
}

/// Porter-Duff source-over on straight (non-premultiplied) RGBA8, rounded once at the end.
pub fn over_straight(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    match sa {
        0 => return dst,
        255 => return src,
        _ => {}
    }
    let da = u32::from(dst[3]);
    // Both terms are at 255² scale; `den / 255` is the output alpha.
    let src_w = sa * 255;
    let dst_w = da * (255 - sa);
    let den = src_w + dst_w;

    let mut out = [0u8; 4];
    for c in 0..3 {
        let num = u32::from(src[c]) * src_w + u32::from(dst[c]) * dst_w;
        out[c] = ((num + den / 2) / den).min(255) as u8;
    }
    out[3] = ((den + 127) / 255) as u8;
    out
}

fn blend_straight(dst: &mut [u8], src: &[u8]) {
    let out = over_straight([dst[0], dst[1], dst[2], dst[3]], [src[0], src[1], src[2], src[3]]);
    dst.copy_from_slice(&out);
}

/// `(src_start, dst_start, len)` of the overlap on one axis, or `None` when disjoint.
fn clip_axis(offset: i64, src_len: u32, dst_len: u32) -> Option<(usize, usize, usize)> {
    let start = offset.max(0);
    let end = (offset + i64::from(src_len)).min(i64::from(dst_len));
    if end <= start {
        return None;
    }
    Some((
        (start - offset) as usize,
        start as usize,
        (end - start) as usize,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/canvas.rs"]
mod tests;
