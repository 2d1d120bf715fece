use crate::foundation::error::{FxError, FxResult};
use crate::foundation::math::mul_div255_u8;

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite `src` over `dst` with `opacity`; both buffers are premultiplied RGBA8.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> FxResult<()> {
    check_pair(dst, src, "over_in_place")?;
    if opacity >= 1.0 {
        return premul_over_in_place(dst, src);
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Full-opacity source-over; skips transparent source pixels.
pub fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> FxResult<()> {
    check_pair(dst, src, "premul_over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = s[3].saturating_add(mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            d[c] = s[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
        }
    }
    Ok(())
}

/// Flatten premultiplied pixels over an opaque background, producing opaque straight RGBA8.
pub fn flatten_over_opaque(src: &[u8], bg: [u8; 3]) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    for (d, s) in out.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let inv = 255u16 - u16::from(s[3]);
        for c in 0..3 {
            d[c] = s[c].saturating_add(mul_div255_u8(u16::from(bg[c]), inv));
        }
        d[3] = 255;
    }
    out
}

fn check_pair(dst: &[u8], src: &[u8], what: &str) -> FxResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(FxError::render(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
