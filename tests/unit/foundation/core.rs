use super::*;

#[test]
fn raster_rejects_zero_and_short_buffers() {
    assert!(matches!(
        RasterImage::new(0, 4, vec![]),
        Err(FrameError::InvalidGeometry(_))
    ));
    assert!(RasterImage::new(2, 2, vec![0; 15]).is_err());
    assert!(RasterImage::new(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn put_alpha_replaces_existing_alpha() {
    let mut img = RasterImage::filled(2, 1, [10, 20, 30, 200]).unwrap();
    let mask = AlphaMask::from_raw(2, 1, vec![0, 99]).unwrap();
    img.put_alpha(&mask).unwrap();
    assert_eq!(img.pixel(0, 0), [10, 20, 30, 0]);
    assert_eq!(img.pixel(1, 0), [10, 20, 30, 99]);
    assert_eq!(img.alpha(), mask);
}

#[test]
fn put_alpha_rejects_mismatched_mask() {
    let mut img = RasterImage::filled(3, 2, [0, 0, 0, 255]).unwrap();
    let mask = AlphaMask::opaque(2, 3).unwrap();
    assert!(matches!(
        img.put_alpha(&mask),
        Err(FrameError::MaskDimensionMismatch {
            mask_w: 2,
            mask_h: 3,
            frame_w: 3,
            frame_h: 2
        })
    ));
}

#[test]
fn mask_multiply_composes_factors() {
    let mut a = AlphaMask::from_raw(3, 1, vec![255, 128, 0]).unwrap();
    let b = AlphaMask::from_raw(3, 1, vec![128, 128, 255]).unwrap();
    a.multiply_in_place(&b).unwrap();
    assert_eq!(a.data, vec![128, 64, 0]);
}

#[test]
fn mask_multiply_checks_dimensions() {
    let mut a = AlphaMask::opaque(2, 2).unwrap();
    let b = AlphaMask::opaque(4, 1).unwrap();
    assert!(a.multiply_in_place(&b).is_err());
}

#[test]
fn rgb_hex_round_trip_and_errors() {
    let c = Rgb8::parse_hex("#1a2B3c").unwrap();
    assert_eq!(c, Rgb8::new(0x1a, 0x2b, 0x3c));
    assert_eq!(c.to_hex(), "#1A2B3C");
    assert_eq!(Rgb8::parse_hex("ffffff").unwrap(), Rgb8::new(255, 255, 255));
    assert!(Rgb8::parse_hex("#fff").is_err());
    assert!(Rgb8::parse_hex("#gg0000").is_err());
}

#[test]
fn rgb_serializes_as_hex_string() {
    let json = serde_json::to_string(&Rgb8::new(255, 0, 16)).unwrap();
    assert_eq!(json, "\"#FF0010\"");
    let back: Rgb8 = serde_json::from_str("\"#00ff00\"").unwrap();
    assert_eq!(back, Rgb8::new(0, 255, 0));
    assert!(serde_json::from_str::<Rgb8>("\"green\"").is_err());
}
