use super::*;

#[test]
fn ease_endpoints_midpoint_and_clamp() {
    assert_eq!(ease(0.0), 0.0);
    assert_eq!(ease(1.0), 1.0);
    assert_eq!(ease(0.5), 0.5);
    assert_eq!(ease(-3.0), 0.0);
    assert_eq!(ease(7.0), 1.0);
}

#[test]
fn ease_is_monotonic_and_symmetric() {
    let mut prev = ease(0.0);
    for i in 1..=1000 {
        let t = f64::from(i) / 1000.0;
        let v = ease(t);
        assert!(v >= prev);
        assert!((ease(1.0 - t) - (1.0 - v)).abs() < 1e-12);
        prev = v;
    }
}

#[test]
fn zero_radius_corner_mask_is_opaque() {
    let m = build_corner_mask(37, 19, 0).unwrap();
    assert_eq!(m, AlphaMask::opaque(37, 19).unwrap());
}

#[test]
fn radius_truncating_to_zero_is_opaque() {
    // 4 * 20 / 100 = 0.8 -> 0
    let m = build_corner_mask(4, 10, 20).unwrap();
    assert!(m.is_uniform(255));
}

#[test]
fn corner_mask_cuts_only_the_corners() {
    let m = build_corner_mask(500, 500, 20).unwrap();
    assert_eq!(corner_radius_px(500, 500, 20), 100);

    for (x, y) in [(0, 0), (499, 0), (0, 499), (499, 499), (10, 10), (489, 489)] {
        assert_eq!(m.get(x, y), 0, "({x},{y}) should be cut");
    }
    for (x, y) in [(250, 250), (250, 0), (0, 250), (499, 250), (250, 499), (100, 0)] {
        assert_eq!(m.get(x, y), 255, "({x},{y}) should be kept");
    }
    // (29.5, 29.5) is ~99.7px from the arc centre (100,100): inside.
    assert_eq!(m.get(29, 29), 255);
    // (28.5, 28.5) is ~101.1px away: outside.
    assert_eq!(m.get(28, 28), 0);
}

#[test]
fn corner_mask_is_symmetric() {
    let (w, h) = (64u32, 40u32);
    let m = build_corner_mask(w, h, 50).unwrap();
    for y in 0..h {
        for x in 0..w {
            assert_eq!(m.get(x, y), m.get(w - 1 - x, y));
            assert_eq!(m.get(x, y), m.get(x, h - 1 - y));
        }
    }
}

#[test]
fn zero_feather_is_opaque() {
    let m = build_feather_mask(31, 17, &FeatheringConfig::NONE).unwrap();
    assert_eq!(m, AlphaMask::opaque(31, 17).unwrap());
}

#[test]
fn top_band_ramps_from_transparent_edge() {
    let f = FeatheringConfig {
        top: 10,
        ..FeatheringConfig::NONE
    };
    let m = build_feather_mask(1000, 2000, &f).unwrap();
    assert_eq!(band_px(2000, 10), 200);
    assert_eq!(m.get(0, 0), 0);
    assert_eq!(m.get(500, 0), 0);
    assert_eq!(m.get(0, 199), 255);
    assert_eq!(m.get(0, 200), 255);
    assert_eq!(m.get(999, 1999), 255);
    let mid = (255.0 * ease(99.0 / 199.0)) as u8;
    assert_eq!(m.get(3, 99), mid);
}

#[test]
fn trailing_profile_ramps_to_transparent_edge() {
    let p = feather_profile(100, 10, BandEdge::Trailing);
    assert_eq!(p.len(), 100);
    assert!(p[..90].iter().all(|&v| v == 255));
    assert_eq!(p[90], 255);
    assert_eq!(p[99], 0);
    assert!(p[90..].windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn one_pixel_band_contributes_nothing() {
    // 10 * 10 / 100 = 1
    assert!(feather_profile(10, 10, BandEdge::Leading).iter().all(|&v| v == 255));
    assert!(feather_profile(10, 0, BandEdge::Trailing).iter().all(|&v| v == 255));
}

#[test]
fn full_band_spans_whole_axis() {
    let p = feather_profile(50, 100, BandEdge::Leading);
    assert_eq!(p[0], 0);
    assert_eq!(p[49], 255);
}

#[test]
fn converging_edges_attenuate_corner() {
    let f = FeatheringConfig {
        top: 20,
        bottom: 0,
        left: 20,
        right: 0,
    };
    let m = build_feather_mask(100, 100, &f).unwrap();
    let top_only = feather_profile(100, 20, BandEdge::Leading);
    let (x, y) = (10u32, 10u32);
    let expected = mul_div255(top_only[y as usize], top_only[x as usize]);
    assert_eq!(m.get(x, y), expected);
    assert!(m.get(x, y) < m.get(x, 50));
    assert!(m.get(x, y) < m.get(50, y));
    assert_eq!(m.get(99, 99), 255);
}

#[test]
fn left_and_right_bands_mirror() {
    let f = FeatheringConfig {
        left: 25,
        right: 25,
        ..FeatheringConfig::NONE
    };
    let m = build_feather_mask(80, 3, &f).unwrap();
    for x in 0..80 {
        assert_eq!(m.get(x, 1), m.get(79 - x, 1));
    }
    assert_eq!(m.get(0, 0), 0);
    assert_eq!(m.get(40, 2), 255);
}

#[test]
fn feather_product_truncates_at_every_step() {
    let f = FeatheringConfig {
        top: 50,
        bottom: 50,
        left: 50,
        right: 50,
    };
    let (w, h) = (100u32, 100u32);
    let m = build_feather_mask(w, h, &f).unwrap();

    let top = feather_profile(h, 50, BandEdge::Leading);
    let bottom = feather_profile(h, 50, BandEdge::Trailing);
    let left = feather_profile(w, 50, BandEdge::Leading);
    let right = feather_profile(w, 50, BandEdge::Trailing);
    let trunc = |a: u8, b: u8| (u32::from(a) * u32::from(b) / 255) as u8;
    for y in 0..h as usize {
        for x in 0..w as usize {
            let rows = trunc(top[y], bottom[y]);
            let cols = trunc(left[x], right[x]);
            assert_eq!(m.get(x as u32, y as u32), trunc(rows, cols), "pixel ({x},{y})");
        }
    }
    // Rounding would give 1 here.
    assert_eq!(m.get(25, 2), 0);
}
