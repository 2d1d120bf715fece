use super::*;

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255], 1.0), [9, 8, 7, 255]);
}

#[test]
fn over_transparent_or_zero_opacity_keeps_dst() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 255], 0.0), dst);
}

#[test]
fn half_opacity_white_over_black() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert_eq!(out[3], 255);
    assert!((127..=129).contains(&out[0]));
}

#[test]
fn buffer_over_matches_pixel_over() {
    let mut dst = vec![0u8, 0, 0, 255, 50, 50, 50, 255];
    let src = vec![128u8, 0, 0, 128, 0, 0, 0, 0];
    over_in_place(&mut dst, &src, 1.0).unwrap();
    assert_eq!(&dst[4..], &[50, 50, 50, 255]);
    assert_eq!(dst[3], 255);
    assert_eq!(dst[0], 128);
}

#[test]
fn mismatched_lengths_error() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    assert!(premul_over_in_place(&mut dst, &[0u8; 7]).is_err());
}

#[test]
fn flatten_uses_background_under_transparency() {
    let src = [0u8, 0, 0, 0, 255, 0, 0, 255];
    let out = flatten_over_opaque(&src, [8, 12, 10]);
    assert_eq!(out, vec![8, 12, 10, 255, 255, 0, 0, 255]);
}
