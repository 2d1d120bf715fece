use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 128), 64);
    assert_eq!(mul_div255_u8(200, 255), 200);
}

#[test]
fn hash_is_stable_and_position_sensitive() {
    assert_eq!(hash_u32(7, 3, 4), hash_u32(7, 3, 4));
    assert_ne!(hash_u32(7, 3, 4), hash_u32(7, 4, 3));
    assert_ne!(hash_u32(7, 3, 4), hash_u32(8, 3, 4));
}

#[test]
fn unit_to_u8_clamps() {
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(2.0), 255);
    assert_eq!(unit_to_u8(f64::NAN), 0);
}
