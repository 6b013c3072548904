use super::*;

#[test]
fn mul_div255_identity_and_zero() {
    for v in [0u8, 1, 77, 128, 254, 255] {
        assert_eq!(mul_div255(v, 255), v);
        assert_eq!(mul_div255(255, v), v);
        assert_eq!(mul_div255(v, 0), 0);
    }
}

#[test]
fn mul_div255_truncates() {
    assert_eq!(mul_div255(128, 128), 64);
    assert_eq!(mul_div255(1, 254), 0);
    assert_eq!(mul_div255(2, 128), 1);
    assert_eq!(mul_div255(200, 200), 156);
}

#[test]
fn percent_to_u8_rounds() {
    assert_eq!(percent_to_u8(0), 0);
    assert_eq!(percent_to_u8(50), 128);
    assert_eq!(percent_to_u8(100), 255);
    assert_eq!(percent_to_u8(250), 255);
}
