use crate::effects::blur::gaussian_blur;
use crate::effects::mask::{build_corner_mask, build_feather_mask};
use crate::foundation::core::{AlphaMask, RasterImage};
use crate::foundation::error::FrameResult;
use crate::settings::model::{EffectOrder, ProcessingConfig};

/// Corner × feather, then blur the product. Softens both boundaries ("soft" look).
pub fn corner_feather_blur(
    corner: &AlphaMask,
    feather: &AlphaMask,
    blur_strength: u32,
) -> FrameResult<AlphaMask> {
    let mut mask = AlphaMask::opaque(corner.width, corner.height)?;
    mask.multiply_in_place(corner)?;
    mask.multiply_in_place(feather)?;
    gaussian_blur(&mask, blur_strength)
}

/// Corner, blur, then × feather. Only the corner boundary softens ("contour" look).
pub fn corner_blur_feather(
    corner: &AlphaMask,
    feather: &AlphaMask,
    blur_strength: u32,
) -> FrameResult<AlphaMask> {
    let mut mask = AlphaMask::opaque(corner.width, corner.height)?;
    mask.multiply_in_place(corner)?;
    let mut mask = gaussian_blur(&mask, blur_strength)?;
    mask.multiply_in_place(feather)?;
    Ok(mask)
}

/// Combine the masks in `order` into the final alpha.
pub fn combine(
    corner: &AlphaMask,
    feather: &AlphaMask,
    blur_strength: u32,
    order: EffectOrder,
) -> FrameResult<AlphaMask> {
    match order {
        EffectOrder::CornerFeatherBlur => corner_feather_blur(corner, feather, blur_strength),
        EffectOrder::CornerBlurFeather => corner_blur_feather(corner, feather, blur_strength),
    }
}

/// Replace `frame`'s alpha with the combined mask. Any existing alpha is discarded.
pub fn apply(
    mut frame: RasterImage,
    corner: &AlphaMask,
    feather: &AlphaMask,
    blur_strength: u32,
    order: EffectOrder,
) -> FrameResult<RasterImage> {
    corner.ensure_matches(frame.width, frame.height)?;
    feather.ensure_matches(frame.width, frame.height)?;
    let alpha = combine(corner, feather, blur_strength, order)?;
    frame.put_alpha(&alpha)?;
    Ok(frame)
}

/// Build both masks for `frame`'s size from `cfg` and [`apply`] them.
pub fn apply_processing(frame: RasterImage, cfg: &ProcessingConfig) -> FrameResult<RasterImage> {
    let (w, h) = frame.dimensions();
    let corner = build_corner_mask(w, h, cfg.corner_radius_percent)?;
    let feather = build_feather_mask(w, h, &cfg.feathering)?;
    apply(frame, &corner, &feather, cfg.blur_strength, cfg.order)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/order.rs"]
mod tests;
