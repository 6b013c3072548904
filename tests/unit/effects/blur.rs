use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    let out = blur_gray8(&src, 3, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn sigma_0_mask_blur_is_identity() {
    let mask = AlphaMask::from_raw(2, 2, vec![0, 255, 12, 200]).unwrap();
    assert_eq!(gaussian_blur(&mask, 0).unwrap(), mask);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (6u32, 5u32);
    let src = vec![173u8; (w * h) as usize];
    let out = blur_gray8(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);

    let mask = AlphaMask::opaque(9, 4).unwrap();
    assert!(gaussian_blur(&mask, 5).unwrap().is_uniform(255));
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h) as usize];
    src[(2 * w + 2) as usize] = 255;

    let out = blur_gray8(&src, w, h, 2, 1.2).unwrap();

    let nonzero = out.iter().filter(|&&v| v != 0).count();
    assert!(nonzero > 1);

    let sum: u32 = out.iter().map(|&v| u32::from(v)).sum();
    assert!((sum as i32 - 255).abs() <= 4);
}

#[test]
fn blur_softens_a_hard_edge() {
    let (w, h) = (20u32, 1u32);
    let src: Vec<u8> = (0..w).map(|x| if x < 10 { 0 } else { 255 }).collect();
    let mask = AlphaMask::from_raw(w, h, src).unwrap();
    let out = gaussian_blur(&mask, 2).unwrap();
    assert_eq!(out.get(0, 0), 0);
    assert_eq!(out.get(19, 0), 255);
    assert!(out.get(9, 0) > 0 && out.get(9, 0) < 128);
    assert!(out.get(10, 0) > 128 && out.get(10, 0) < 255);
}

#[test]
fn blur_rejects_mismatched_buffer() {
    assert!(blur_gray8(&[0u8; 5], 3, 2, 1, 1.0).is_err());
}

#[test]
fn box_radii_match_the_gaussian_variance() {
    for sigma in [8.0f64, 10.0, 20.0, 50.0] {
        let radii = box_radii(sigma);
        let var: f64 = radii
            .iter()
            .map(|&r| {
                let w = (2 * r + 1) as f64;
                (w * w - 1.0) / 12.0
            })
            .sum();
        assert!((var - sigma * sigma).abs() / (sigma * sigma) < 0.05, "{sigma}: {radii:?}");
    }
    assert_eq!(box_radii(10.0), [9, 9, 10]);
}

#[test]
fn large_sigma_tracks_the_exact_kernel() {
    // Rounded-corner style mask: hard step plus a dark corner block.
    let (w, h) = (80u32, 60u32);
    let src: Vec<u8> = (0..h)
        .flat_map(|y| (0..w).map(move |x| if x < 10 || (x < 25 && y < 15) { 0 } else { 255 }))
        .collect();
    let mask = AlphaMask::from_raw(w, h, src.clone()).unwrap();

    for sigma in [BOX_BLUR_MIN_SIGMA, 12] {
        let fast = gaussian_blur(&mask, sigma).unwrap();
        let exact = blur_gray8(&src, w, h, sigma * 3, sigma as f32).unwrap();
        let worst = fast
            .data
            .iter()
            .zip(&exact)
            .map(|(&a, &b)| (i16::from(a) - i16::from(b)).abs())
            .max()
            .unwrap();
        assert!(worst <= 6, "sigma {sigma}: off by {worst}");
    }
}

#[test]
fn large_sigma_keeps_constant_masks_and_edges() {
    let mask = AlphaMask::opaque(9, 4).unwrap();
    assert!(gaussian_blur(&mask, 50).unwrap().is_uniform(255));

    // Far from the step the clamped edge value survives all three passes.
    let src: Vec<u8> = (0..200u32).map(|x| if x < 100 { 0 } else { 255 }).collect();
    let out = box_blur_gray8(&src, 200, 1, 10.0).unwrap();
    assert_eq!(out[0], 0);
    assert_eq!(out[199], 255);
    assert!(out.windows(2).all(|p| p[0] <= p[1]));
}

#[test]
fn box_blur_rejects_bad_input() {
    assert!(box_blur_gray8(&[0u8; 5], 3, 2, 10.0).is_err());
    assert!(box_blur_gray8(&[0u8; 6], 3, 2, 0.0).is_err());
}
